//! Error types shared by the dictionary, vocabulary and analysis layers.

use std::io;
use std::path::PathBuf;

/// Result type used throughout `lac-fmmseg`.
pub type Result<T, E = LacError> = std::result::Result<T, E>;

/// Represents the failures that can surface from loading resources or
/// analysing text.
///
/// Malformed user-dictionary lines are **not** errors; they are skipped while
/// loading. Only resource I/O, vocabulary format problems, serialization and
/// the tag/text length precondition are reported.
#[derive(Debug, thiserror::Error)]
pub enum LacError {
    /// A dictionary or vocabulary file could not be opened or read.
    #[error("I/O Error: failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A vocabulary line did not have the expected `key<TAB>value` shape.
    #[error("Parse Error: invalid content {content:?} at line {line}")]
    InvalidVocab { line: usize, content: String },

    /// The tag sequence does not have one entry per code point of the text.
    #[error("Length mismatch: text has {text_len} chars but {tags_len} tags were given")]
    LengthMismatch { text_len: usize, tags_len: usize },

    /// A batch was given a different number of texts and tag rows.
    #[error("Batch mismatch: {texts} texts but {rows} tag rows were given")]
    BatchMismatch { texts: usize, rows: usize },

    /// CBOR encoding/decoding or zstd (de)compression failed.
    #[error("Serialization Error: {0}")]
    Serialization(String),

    /// The TOML configuration could not be parsed.
    #[error(transparent)]
    Config(#[from] toml::de::Error),
}

impl LacError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        LacError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<serde_cbor::Error> for LacError {
    fn from(err: serde_cbor::Error) -> Self {
        LacError::Serialization(err.to_string())
    }
}
