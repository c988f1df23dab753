//! User-dictionary overrides applied on top of model tags.
//!
//! Each dictionary line lists one or more whitespace-separated fields of the
//! form `word` or `word/POS`. The concatenation of the field words is the
//! **compound key** searched in the text; each field becomes a
//! [`SegmentTemplate`] saying where a word boundary goes and, optionally,
//! which POS to force.
//!
//! ```text
//! 春天/SEASON      one word, POS forced to SEASON
//! 花/n 开/v        "花开" split into two words with explicit POS
//! 秋天的风         one word, POS left to the model
//! 落 阳            "落阳" split into two words, POS left to the model
//! ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_cbor::{from_reader, from_slice};
use std::fs::{self, File};
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;
use tracing::{debug, trace};
use zstd::{Decoder, Encoder};

use crate::dictionary_lib::Trie;
use crate::errors::{LacError, Result};
use crate::segment::Offset;
use crate::tag::{Bio, Tag};

/// zstd level used by [`Customization::save_compressed`].
const ZSTD_LEVEL: i32 = 19;

/// One field of a dictionary entry.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SegmentTemplate {
    pub word: Box<str>,
    /// `None` defers to whatever POS the tag already carries.
    pub pos: Option<Box<str>>,
    /// Position of `word` inside the compound key, in chars.
    pub offset: Offset,
}

/// Loaded user dictionary: compound keys, their templates and the [`Trie`]
/// used to find them.
///
/// Built once, then shared read-only by every [`Customization::parse`] call.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct Customization {
    #[serde(default)]
    items: FxHashMap<Box<[char]>, Box<[SegmentTemplate]>>,
    #[serde(default)]
    trie: Trie,
}

impl Customization {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a dictionary file.
    ///
    /// # Errors
    /// [`LacError::Io`] if the file cannot be opened or read. Malformed lines
    /// never fail the load.
    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LacError::io(path, e))?;

        let before = self.len();
        let mut lines = 0usize;
        for line in BufReader::new(file).lines() {
            let line = line.map_err(|e| LacError::io(path, e))?;
            self.add_line(&line);
            lines += 1;
        }

        debug!(
            path = %path.display(),
            lines,
            added = self.len() - before,
            "loaded user dictionary"
        );
        Ok(())
    }

    /// Builds a dictionary from a file. See [`Customization::load_from_file`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut custom = Self::new();
        custom.load_from_file(path)?;
        Ok(custom)
    }

    /// Loads every line of an in-memory dictionary.
    pub fn load_from_str(&mut self, content: &str) {
        self.load_from_lines(content.lines());
    }

    /// Loads dictionary lines from any iterator.
    pub fn load_from_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for line in lines {
            self.add_line(line.as_ref());
        }
    }

    /// Parses and stores a single dictionary line.
    ///
    /// Returns `false` when the line carries no word (blank, or only empty
    /// `/POS` fields) and was skipped. A repeated compound key replaces the
    /// templates stored for it earlier.
    ///
    /// A field with an empty word such as `/n` is dropped along with its POS,
    /// so in `/n 花` the POS of 花 is still left to the model.
    pub fn add_line(&mut self, line: &str) -> bool {
        let mut key: Vec<char> = Vec::new();
        let mut templates: Vec<SegmentTemplate> = Vec::new();

        for field in line.split_whitespace() {
            let (word, pos) = match field.split_once('/') {
                Some((w, p)) => (w, p),
                None => (field, ""),
            };
            if word.is_empty() {
                trace!(field, "skipping field without a word");
                continue;
            }

            let start = key.len();
            key.extend(word.chars());
            templates.push(SegmentTemplate {
                word: word.into(),
                pos: (!pos.is_empty()).then(|| pos.into()),
                offset: Offset::new(start, key.len()),
            });
        }

        if key.is_empty() {
            return false;
        }

        self.trie.add_chars(&key);
        if self
            .items
            .insert(key.into_boxed_slice(), templates.into_boxed_slice())
            .is_some()
        {
            trace!(line, "dictionary entry replaced by a later line");
        }
        true
    }

    /// Number of distinct compound keys.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Templates stored for an exact compound key.
    pub fn templates(&self, key: &str) -> Option<&[SegmentTemplate]> {
        let chars: Vec<char> = key.chars().collect();
        self.items.get(chars.as_slice()).map(|t| &**t)
    }

    pub fn trie(&self) -> &Trie {
        &self.trie
    }

    /// Applies dictionary overrides to `tags` in place.
    ///
    /// For every match returned by [`Trie::search`], each template marks its
    /// first char `B` and the rest `I`, forcing the template POS when it has
    /// one. The char right after the match, if any, is forced to `B` so the
    /// following word is never glued onto the override.
    ///
    /// # Errors
    /// [`LacError::LengthMismatch`] unless `tags.len()` equals the char count
    /// of `text`.
    ///
    /// # Example
    /// ```
    /// use lac_fmmseg::dictionary_lib::Customization;
    /// use lac_fmmseg::tag::parse_tags;
    ///
    /// let mut custom = Customization::new();
    /// custom.load_from_str("春天/SEASON");
    ///
    /// let mut tags = parse_tags("TIME-B TIME-I");
    /// custom.parse("春天", &mut tags).unwrap();
    /// let labels: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
    /// assert_eq!(labels, vec!["SEASON-B", "SEASON-I"]);
    /// ```
    pub fn parse(&self, text: &str, tags: &mut [Tag]) -> Result<()> {
        let chars: Vec<char> = text.chars().collect();
        self.parse_chars(&chars, tags)
    }

    /// Char-slice form of [`Customization::parse`].
    pub fn parse_chars(&self, chars: &[char], tags: &mut [Tag]) -> Result<()> {
        if chars.len() != tags.len() {
            return Err(LacError::LengthMismatch {
                text_len: chars.len(),
                tags_len: tags.len(),
            });
        }

        for offset in self.trie.search_chars(chars) {
            let Some(templates) = self.items.get(&chars[offset.start..offset.end]) else {
                continue;
            };

            for template in templates.iter() {
                let first = offset.start + template.offset.start;
                let last = offset.start + template.offset.end;
                for (i, tag) in tags[first..last].iter_mut().enumerate() {
                    if let Some(pos) = template.pos.as_deref() {
                        tag.set_pos_if_nonempty(pos);
                    }
                    tag.bio = if i == 0 { Bio::Begin } else { Bio::Inside };
                }
            }

            if let Some(next) = tags.get_mut(offset.end) {
                next.bio = Bio::Begin;
            }
        }

        Ok(())
    }

    /// Serializes the dictionary to a CBOR file.
    pub fn serialize_to_cbor<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let cbor_data = serde_cbor::to_vec(self)?;
        fs::write(path, cbor_data).map_err(|e| LacError::io(path, e))
    }

    /// Deserializes a dictionary written by [`Customization::serialize_to_cbor`].
    pub fn deserialize_from_cbor<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let cbor_data = fs::read(path).map_err(|e| LacError::io(path, e))?;
        Ok(from_slice(&cbor_data)?)
    }

    /// Saves the dictionary as zstd-compressed CBOR.
    pub fn save_compressed<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::create(path).map_err(|e| LacError::io(path, e))?;
        let writer = BufWriter::new(file);
        let mut encoder =
            Encoder::new(writer, ZSTD_LEVEL).map_err(|e| LacError::Serialization(e.to_string()))?;
        serde_cbor::to_writer(&mut encoder, self)?;
        encoder
            .finish()
            .map_err(|e| LacError::Serialization(e.to_string()))?;
        debug!(path = %path.display(), entries = self.len(), "saved compressed dictionary");
        Ok(())
    }

    /// Loads a dictionary written by [`Customization::save_compressed`].
    pub fn load_compressed<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| LacError::io(path, e))?;
        let reader = BufReader::new(file);
        let mut decoder = Decoder::new(reader).map_err(|e| LacError::Serialization(e.to_string()))?;
        let custom: Customization = from_reader(&mut decoder)?;
        debug!(path = %path.display(), entries = custom.len(), "loaded compressed dictionary");
        Ok(custom)
    }
}
