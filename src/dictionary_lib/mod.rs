//! User-dictionary index and override logic.
//!
//! - [`Trie`]: prefix index with forward maximum matching over chars.
//! - [`Customization`]: dictionary entries plus the trie, applied to tags.

mod customization;
mod trie;

pub use customization::{Customization, SegmentTemplate};
pub use trie::Trie;
