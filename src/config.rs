//! Resource configuration for [`crate::Lac`].
//!
//! ```
//! use lac_fmmseg::config::Config;
//!
//! let config = Config::from_toml_str(
//!     r#"
//!     user_dict = "custom.dic"
//!     parallel = false
//!     "#,
//! )
//! .unwrap();
//! assert_eq!(config.user_dict.as_deref(), Some(std::path::Path::new("custom.dic")));
//! assert!(!config.parallel);
//! assert!(config.tag_vocab.is_none());
//! ```

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{LacError, Result};

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// User dictionary text file (`word` / `word/POS` fields per line).
    pub user_dict: Option<PathBuf>,
    /// Zstd-compressed dictionary produced by `dict-compile`; used when
    /// `user_dict` is not set.
    pub compiled_dict: Option<PathBuf>,
    /// Tag-id vocabulary (`id<TAB>label`).
    pub tag_vocab: Option<PathBuf>,
    /// Full-width/traditional → half-width/simplified char table.
    pub q2b_vocab: Option<PathBuf>,
    /// Process batches with rayon.
    pub parallel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_dict: None,
            compiled_dict: None,
            tag_vocab: None,
            q2b_vocab: None,
            parallel: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load_toml<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| LacError::io(path, e))?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from TOML string.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml_string(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}
