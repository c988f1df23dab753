//! Prefix index over user-dictionary words with forward maximum matching.
//!
//! [`Trie`] is a flat map from **every prefix** of every inserted word to an
//! indicator:
//!
//! - `0`: the key is only a prefix of some longer word,
//! - `n > 0`: the key is a genuine entry of `n` chars.
//!
//! Keys are stored as `Box<[char]>` so that lookups take a borrowed
//! `&[char]` window of the input and never allocate. The price is memory:
//! a word of `L` chars stores `L` keys totalling `L(L+1)/2` chars.
//!
//! ## Example
//! ```
//! use lac_fmmseg::dictionary_lib::Trie;
//! use lac_fmmseg::segment::Offset;
//!
//! let mut trie = Trie::new();
//! for word in ["春天", "花开", "秋天的风", "落阳"] {
//!     trie.add(word);
//! }
//! let offsets = trie.search("春天的花开秋天的风以及冬天的落阳");
//! assert_eq!(
//!     offsets,
//!     vec![
//!         Offset::new(0, 2),
//!         Offset::new(3, 5),
//!         Offset::new(5, 9),
//!         Offset::new(14, 16),
//!     ]
//! );
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::segment::Offset;

/// Immutable-after-build word index answering forward-maximum-match queries.
///
/// `Trie` has no interior mutability, so a fully built value can be shared
/// across threads and searched concurrently.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Trie {
    /// Prefix (as chars) → indicator. See the module docs.
    #[serde(default)]
    nodes: FxHashMap<Box<[char]>, usize>,

    /// Number of genuine entries (indicator > 0).
    #[serde(default)]
    entries: usize,

    /// Longest genuine entry in chars; bounds how far a match may extend.
    #[serde(default)]
    max_len: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `word` and all of its proper prefixes.
    ///
    /// Prefixes that are not yet present get indicator `0`; the full word
    /// gets its char count. Empty words are ignored and re-adding a word is a
    /// no-op.
    pub fn add(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let chars: Vec<char> = word.chars().collect();
        self.add_chars(&chars);
    }

    pub fn add_chars(&mut self, chars: &[char]) {
        if chars.is_empty() {
            return;
        }
        let len = chars.len();

        match self.nodes.get_mut(chars) {
            Some(indicator) => {
                if *indicator == 0 {
                    self.entries += 1;
                }
                *indicator = len;
            }
            None => {
                self.nodes.insert(Box::from(chars), len);
                self.entries += 1;
            }
        }

        for i in 1..len {
            if !self.nodes.contains_key(&chars[..i]) {
                self.nodes.insert(Box::from(&chars[..i]), 0);
            }
        }

        if self.max_len < len {
            self.max_len = len;
        }
    }

    /// Returns `true` if `word` was added as a genuine entry.
    pub fn contains(&self, word: &str) -> bool {
        let chars: Vec<char> = word.chars().collect();
        self.get(&chars).map_or(false, |v| v > 0)
    }

    /// Raw indicator lookup for a char window.
    #[inline]
    pub fn get(&self, key: &[char]) -> Option<usize> {
        self.nodes.get(key).copied()
    }

    /// Number of genuine entries.
    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    /// Longest genuine entry, in chars.
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Forward maximum matching over `text`. See [`Trie::search_chars`].
    pub fn search(&self, text: &str) -> Vec<Offset> {
        let chars: Vec<char> = text.chars().collect();
        self.search_chars(&chars)
    }

    /// Forward maximum matching over a char slice.
    ///
    /// Start positions are scanned left to right. From each start the end is
    /// extended one char at a time while the window is a known prefix. A
    /// window that is a genuine entry is accepted when its end lies beyond
    /// the end of the last accepted offset; extension then continues, so a
    /// longer entry from the same start is accepted too.
    ///
    /// The guard only compares ends. An entry that starts inside the previous
    /// match but runs past it is still accepted, so returned offsets can
    /// overlap. Their ends are strictly increasing.
    pub fn search_chars(&self, chars: &[char]) -> Vec<Offset> {
        let mut offsets: Vec<Offset> = Vec::new();
        if self.max_len == 0 {
            return offsets;
        }

        let n = chars.len();
        for start in 0..n {
            let limit = n.min(start + self.max_len);
            for end in start + 1..=limit {
                let Some(indicator) = self.get(&chars[start..end]) else {
                    break;
                };
                if indicator > 0 && offsets.last().map_or(true, |last| end > last.end) {
                    offsets.push(Offset::new(start, end));
                }
            }
        }

        offsets
    }
}
