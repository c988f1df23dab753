//! Composite `POS-BIO` tag labels.
//!
//! A model emits one label per character, e.g. `n-B`, `TIME-I` or a bare `O`.
//! [`Tag`] splits such a label into its part-of-speech and its
//! Begin/Inside/Outside marker so the two halves can be overridden separately.
//!
//! ```
//! use lac_fmmseg::tag::{Bio, Tag};
//!
//! let tag = Tag::new("TIME-B");
//! assert_eq!(tag.pos, "TIME");
//! assert_eq!(tag.bio, Bio::Begin);
//! assert_eq!(tag.to_string(), "TIME-B");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Begin/Inside/Outside span marker.
///
/// Labels carrying a suffix other than `B`, `I` or `O` keep it verbatim in
/// [`Bio::Other`], so decoding followed by encoding never loses information.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Bio {
    Begin,
    Inside,
    Outside,
    #[default]
    Empty,
    Other(Box<str>),
}

impl Bio {
    pub fn as_str(&self) -> &str {
        match self {
            Bio::Begin => "B",
            Bio::Inside => "I",
            Bio::Outside => "O",
            Bio::Empty => "",
            Bio::Other(s) => &**s,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Bio::Empty)
    }
}

impl From<&str> for Bio {
    fn from(s: &str) -> Self {
        match s {
            "B" => Bio::Begin,
            "I" => Bio::Inside,
            "O" => Bio::Outside,
            "" => Bio::Empty,
            other => Bio::Other(other.into()),
        }
    }
}

impl fmt::Display for Bio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-character tag: part-of-speech plus span marker.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Part-of-speech (or entity type such as `PER`, `LOC`, `TIME`).
    pub pos: String,
    /// Span marker.
    pub bio: Bio,
}

impl Tag {
    /// Decodes a label by splitting on the **first** `-`.
    ///
    /// A label without `-` yields an empty [`Bio`], and the whole label
    /// becomes the POS (this is how a bare `O` from the vocabulary decodes).
    pub fn new(label: &str) -> Self {
        match label.split_once('-') {
            Some((pos, bio)) => Tag {
                pos: pos.to_string(),
                bio: Bio::from(bio),
            },
            None => Tag {
                pos: label.to_string(),
                bio: Bio::Empty,
            },
        }
    }

    /// Replaces the POS unless `pos` is empty.
    #[inline]
    pub fn set_pos_if_nonempty(&mut self, pos: &str) {
        if !pos.is_empty() {
            self.pos.clear();
            self.pos.push_str(pos);
        }
    }
}

impl From<&str> for Tag {
    fn from(label: &str) -> Self {
        Tag::new(label)
    }
}

impl FromStr for Tag {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Tag::new(s))
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.bio.is_empty() {
            f.write_str(&self.pos)
        } else {
            write!(f, "{}-{}", self.pos, self.bio)
        }
    }
}

/// Decodes a whitespace-separated label line such as `"n-B v-I u-B"`.
pub fn parse_tags(labels: &str) -> Vec<Tag> {
    labels.split_whitespace().map(Tag::new).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_splits_on_first_dash_only() {
        let tag = Tag::new("a-b-c");
        assert_eq!(tag.pos, "a");
        assert_eq!(tag.bio, Bio::Other("b-c".into()));
        assert_eq!(tag.to_string(), "a-b-c");
    }

    #[test]
    fn decode_without_dash_has_empty_bio() {
        let tag = Tag::new("O");
        assert_eq!(tag.pos, "O");
        assert!(tag.bio.is_empty());
        assert_eq!(tag.to_string(), "O");
    }

    #[test]
    fn labels_survive_decode_then_encode() {
        for label in ["TIME-B", "n-I", "w-O", "PER", "nz-B"] {
            assert_eq!(Tag::new(label).to_string(), label);
        }
    }

    #[test]
    fn empty_pos_leaves_existing_value() {
        let mut tag = Tag::new("TIME-B");
        tag.set_pos_if_nonempty("");
        assert_eq!(tag.pos, "TIME");
        tag.set_pos_if_nonempty("SEASON");
        assert_eq!(tag.pos, "SEASON");
        assert_eq!(tag.bio, Bio::Begin);
    }

    #[test]
    fn parse_tags_reads_a_label_line() {
        let tags = parse_tags("n-B  v-I\tu-B");
        assert_eq!(tags.len(), 3);
        assert_eq!(tags[1], Tag::new("v-I"));
    }
}
