//! Vocabularies sitting between the model and the post-processing core.
//!
//! - [`TagVocab`] turns the model's output ids back into [`Tag`]s.
//! - [`Q2bTable`] is a plain char table mapping full-width and traditional
//!   forms to the half-width/simplified forms the model was trained on.

use rustc_hash::FxHashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::errors::{LacError, Result};
use crate::tag::Tag;

/// Label every id missing from the vocabulary decodes to.
pub const UNKNOWN_TAG: &str = "O";

/// Tag-id vocabulary.
#[derive(Debug, Clone)]
pub struct TagVocab {
    labels: FxHashMap<i64, Tag>,
    unknown: Tag,
}

impl Default for TagVocab {
    fn default() -> Self {
        TagVocab {
            labels: FxHashMap::default(),
            unknown: Tag::new(UNKNOWN_TAG),
        }
    }
}

impl TagVocab {
    /// Builds a vocabulary from `id<TAB>label` lines.
    ///
    /// A line without a tab is taken as a bare label whose id is its
    /// zero-based line index. Blank lines are skipped but still count
    /// towards the line index.
    ///
    /// # Errors
    /// [`LacError::InvalidVocab`] naming the 1-based line number of the first
    /// tabbed line whose id is not an integer.
    pub fn from_str_content(content: &str) -> Result<Self> {
        let mut labels = FxHashMap::default();

        for (index, line) in content.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() {
                continue;
            }
            let (id, label) = match line.split_once('\t') {
                Some((id, label)) => {
                    let id = id.trim().parse::<i64>().map_err(|_| LacError::InvalidVocab {
                        line: index + 1,
                        content: line.to_string(),
                    })?;
                    (id, label.trim())
                }
                None => (index as i64, line.trim()),
            };
            labels.insert(id, Tag::new(label));
        }

        Ok(TagVocab {
            labels,
            unknown: Tag::new(UNKNOWN_TAG),
        })
    }

    /// Loads a vocabulary file. See [`TagVocab::from_str_content`].
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LacError::io(path, e))?;
        let vocab = Self::from_str_content(&content)?;
        debug!(path = %path.display(), labels = vocab.len(), "loaded tag vocabulary");
        Ok(vocab)
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Decodes one id; unknown ids become [`UNKNOWN_TAG`].
    pub fn tag(&self, id: i64) -> &Tag {
        self.labels.get(&id).unwrap_or(&self.unknown)
    }

    /// Decodes a row of model output ids into fresh, mutable tags.
    pub fn decode(&self, ids: &[i64]) -> Vec<Tag> {
        ids.iter().map(|&id| self.tag(id).clone()).collect()
    }
}

/// Full-width → half-width (and traditional → simplified) table.
#[derive(Debug, Clone, Default)]
pub struct Q2bTable {
    map: FxHashMap<String, String>,
}

impl Q2bTable {
    /// Builds a table from `from<TAB>to` lines.
    ///
    /// # Errors
    /// [`LacError::InvalidVocab`] naming the 1-based line number of the first
    /// line that does not split into exactly two fields.
    pub fn from_str_content(content: &str) -> Result<Self> {
        let mut map = FxHashMap::default();
        for (i, line) in content.lines().enumerate() {
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() != 2 {
                return Err(LacError::InvalidVocab {
                    line: i + 1,
                    content: line.to_string(),
                });
            }
            map.insert(fields[0].to_string(), fields[1].to_string());
        }
        Ok(Q2bTable { map })
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LacError::io(path, e))?;
        let table = Self::from_str_content(&content)?;
        debug!(path = %path.display(), entries = table.len(), "loaded q2b table");
        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Looks up a single token.
    pub fn get(&self, token: &str) -> Option<&str> {
        self.map.get(token).map(String::as_str)
    }

    /// Replaces every char found in the table, keeping the rest.
    pub fn normalize(&self, text: &str) -> String {
        let mut out = String::with_capacity(text.len());
        let mut buf = [0u8; 4];
        for ch in text.chars() {
            match self.get(ch.encode_utf8(&mut buf)) {
                Some(mapped) => out.push_str(mapped),
                None => out.push(ch),
            }
        }
        out
    }
}
