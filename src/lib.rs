//! Post-processing for Chinese lexical analysis.
//!
//! A sequence-labeling model emits one `POS-BIO` tag per char. This crate
//! lets a user dictionary override those tags through forward maximum
//! matching and then collapses the tags into word segments with
//! part-of-speech labels and char offsets.
//!
//! ```
//! use lac_fmmseg::dictionary_lib::Customization;
//! use lac_fmmseg::tag::parse_tags;
//! use lac_fmmseg::Lac;
//!
//! let mut custom = Customization::new();
//! custom.load_from_str("花/n 开/v");
//! let lac = Lac::new().with_customization(custom);
//!
//! let segments = lac
//!     .analyze("春天的花开", parse_tags("TIME-B TIME-I u-B n-B v-I"))
//!     .unwrap();
//! assert_eq!(segments.words(), vec!["春天", "的", "花", "开"]);
//! assert_eq!(segments.poss(), vec!["TIME", "u", "n", "v"]);
//! ```

use rayon::prelude::*;
use tracing::debug;

use crate::config::Config;
use crate::dictionary_lib::Customization;
use crate::errors::{LacError, Result};
use crate::segment::{build_segments, Segments};
use crate::tag::Tag;
use crate::vocab::{Q2bTable, TagVocab};

pub mod config;
pub mod dictionary_lib;
pub mod errors;
pub mod segment;
pub mod tag;
pub mod vocab;

/// Analyzer bundling the user dictionary and vocabularies.
///
/// All state is read-only after construction, so one `Lac` can serve any
/// number of threads.
#[derive(Debug, Clone)]
pub struct Lac {
    custom: Customization,
    tag_vocab: TagVocab,
    q2b: Option<Q2bTable>,
    is_parallel: bool,
}

impl Default for Lac {
    fn default() -> Self {
        Self::new()
    }
}

impl Lac {
    /// An analyzer with an empty dictionary and empty tag vocabulary.
    pub fn new() -> Self {
        Lac {
            custom: Customization::new(),
            tag_vocab: TagVocab::default(),
            q2b: None,
            is_parallel: true,
        }
    }

    /// Loads every resource named in `config`.
    ///
    /// A text `user_dict` takes precedence over `compiled_dict`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let custom = match (&config.user_dict, &config.compiled_dict) {
            (Some(path), _) => Customization::from_file(path)?,
            (None, Some(path)) => Customization::load_compressed(path)?,
            (None, None) => Customization::new(),
        };
        let tag_vocab = match &config.tag_vocab {
            Some(path) => TagVocab::from_file(path)?,
            None => TagVocab::default(),
        };
        let q2b = config.q2b_vocab.as_ref().map(Q2bTable::from_file).transpose()?;

        debug!(
            dict_entries = custom.len(),
            tag_labels = tag_vocab.len(),
            parallel = config.parallel,
            "analyzer ready"
        );
        Ok(Lac {
            custom,
            tag_vocab,
            q2b,
            is_parallel: config.parallel,
        })
    }

    pub fn with_customization(mut self, custom: Customization) -> Self {
        self.custom = custom;
        self
    }

    pub fn with_tag_vocab(mut self, tag_vocab: TagVocab) -> Self {
        self.tag_vocab = tag_vocab;
        self
    }

    pub fn with_q2b(mut self, q2b: Q2bTable) -> Self {
        self.q2b = Some(q2b);
        self
    }

    pub fn customization(&self) -> &Customization {
        &self.custom
    }

    pub fn tag_vocab(&self) -> &TagVocab {
        &self.tag_vocab
    }

    pub fn set_parallel(&mut self, is_parallel: bool) {
        self.is_parallel = is_parallel;
    }

    pub fn get_parallel(&self) -> bool {
        self.is_parallel
    }

    /// Maps full-width/traditional chars through the q2b table, if one is
    /// configured; otherwise returns the text unchanged.
    pub fn normalize(&self, text: &str) -> String {
        match &self.q2b {
            Some(table) => table.normalize(text),
            None => text.to_string(),
        }
    }

    /// Applies dictionary overrides to `tags` and builds the segments.
    ///
    /// # Errors
    /// [`LacError::LengthMismatch`] unless there is one tag per char.
    pub fn analyze(&self, text: &str, mut tags: Vec<Tag>) -> Result<Segments> {
        let chars: Vec<char> = text.chars().collect();
        self.custom.parse_chars(&chars, &mut tags)?;
        build_segments(text, &tags)
    }

    /// Decodes a row of model output ids and analyzes it.
    ///
    /// Ids past the text's char count are padding and are ignored.
    pub fn analyze_ids(&self, text: &str, ids: &[i64]) -> Result<Segments> {
        let text_len = text.chars().count();
        if ids.len() < text_len {
            return Err(LacError::LengthMismatch {
                text_len,
                tags_len: ids.len(),
            });
        }
        let tags = self.tag_vocab.decode(&ids[..text_len]);
        self.analyze(text, tags)
    }

    /// Analyzes a batch of texts with their model output id rows.
    ///
    /// Output order matches input order whether or not the batch runs in
    /// parallel.
    pub fn lac<S>(&self, texts: &[S], rows: &[Vec<i64>]) -> Result<Vec<Segments>>
    where
        S: AsRef<str> + Sync,
    {
        check_batch(texts.len(), rows.len())?;
        if self.is_parallel {
            texts
                .par_iter()
                .zip(rows.par_iter())
                .map(|(text, ids)| self.analyze_ids(text.as_ref(), ids))
                .collect()
        } else {
            texts
                .iter()
                .zip(rows)
                .map(|(text, ids)| self.analyze_ids(text.as_ref(), ids))
                .collect()
        }
    }

    /// Like [`Lac::lac`], returning only the words.
    pub fn seg<S>(&self, texts: &[S], rows: &[Vec<i64>]) -> Result<Vec<Vec<String>>>
    where
        S: AsRef<str> + Sync,
    {
        Ok(self
            .lac(texts, rows)?
            .iter()
            .map(Segments::words)
            .collect())
    }

    /// Analyzes a batch whose tags are already decoded.
    pub fn lac_tags<S>(&self, texts: &[S], tags: Vec<Vec<Tag>>) -> Result<Vec<Segments>>
    where
        S: AsRef<str> + Sync,
    {
        check_batch(texts.len(), tags.len())?;
        if self.is_parallel {
            texts
                .par_iter()
                .zip(tags.into_par_iter())
                .map(|(text, tags)| self.analyze(text.as_ref(), tags))
                .collect()
        } else {
            texts
                .iter()
                .zip(tags)
                .map(|(text, tags)| self.analyze(text.as_ref(), tags))
                .collect()
        }
    }
}

fn check_batch(texts: usize, rows: usize) -> Result<()> {
    if texts != rows {
        return Err(LacError::BatchMismatch { texts, rows });
    }
    Ok(())
}
