//! Word segments and the builder that collapses a tag sequence into them.
//!
//! Segments produced by [`build_segments`] always **tile** the source text:
//! concatenating every [`Segment::word`] reproduces the input, and the
//! offsets run contiguously from `0` to the text's char count.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

use crate::errors::{LacError, Result};
use crate::tag::{Bio, Tag};

/// Half-open range over a text's Unicode scalar values (`start..end`).
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub start: usize,
    pub end: usize,
}

impl Offset {
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Offset { start, end }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

impl From<(usize, usize)> for Offset {
    fn from((start, end): (usize, usize)) -> Self {
        Offset::new(start, end)
    }
}

/// One word of analysed text with its part-of-speech.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Segment {
    pub word: String,
    pub pos: String,
    pub offset: Offset,
}

/// Ordered segments of a single text.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(transparent)]
pub struct Segments(Vec<Segment>);

impl Segments {
    pub fn new(segments: Vec<Segment>) -> Self {
        Segments(segments)
    }

    /// The words, in order.
    pub fn words(&self) -> Vec<String> {
        self.0.iter().map(|s| s.word.clone()).collect()
    }

    /// The part-of-speech labels, in order.
    pub fn poss(&self) -> Vec<String> {
        self.0.iter().map(|s| s.pos.clone()).collect()
    }

    pub fn into_inner(self) -> Vec<Segment> {
        self.0
    }
}

impl Deref for Segments {
    type Target = [Segment];

    fn deref(&self) -> &[Segment] {
        &self.0
    }
}

impl IntoIterator for Segments {
    type Item = Segment;
    type IntoIter = std::vec::IntoIter<Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Segments {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromIterator<Segment> for Segments {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Segments(iter.into_iter().collect())
    }
}

/// Incremental segment builder fed one `(char, tag)` pair at a time.
///
/// A new word starts when the tag is `B`, or when it is `O` right after a
/// non-`O` tag. The pending word is flushed with the POS of the tag seen
/// just **before** the boundary.
#[derive(Debug, Default)]
pub struct SegmentBuilder<'a> {
    word: String,
    word_len: usize,
    end: usize,
    prev: Option<&'a Tag>,
    segments: Vec<Segment>,
}

impl<'a> SegmentBuilder<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, ch: char, tag: &'a Tag) {
        let boundary = match tag.bio {
            Bio::Begin => true,
            Bio::Outside => self.prev.map_or(false, |p| p.bio != Bio::Outside),
            _ => false,
        };
        if boundary {
            self.flush();
        }

        self.word.push(ch);
        self.word_len += 1;
        self.end += 1;
        self.prev = Some(tag);
    }

    pub fn finish(mut self) -> Segments {
        self.flush();
        Segments(self.segments)
    }

    fn flush(&mut self) {
        if self.word_len == 0 {
            return;
        }
        let pos = self.prev.map(|t| t.pos.clone()).unwrap_or_default();
        self.segments.push(Segment {
            word: std::mem::take(&mut self.word),
            pos,
            offset: Offset::new(self.end - self.word_len, self.end),
        });
        self.word_len = 0;
    }
}

/// Collapses a finalized tag sequence into word segments.
///
/// # Errors
/// [`LacError::LengthMismatch`] when `tags` does not hold exactly one tag per
/// char of `text`.
///
/// # Example
/// ```
/// use lac_fmmseg::segment::build_segments;
/// use lac_fmmseg::tag::parse_tags;
///
/// let tags = parse_tags("r-B u-B n-B n-I");
/// let segments = build_segments("我的想法", &tags).unwrap();
/// assert_eq!(segments.words(), vec!["我", "的", "想法"]);
/// assert_eq!(segments.poss(), vec!["r", "u", "n"]);
/// ```
pub fn build_segments(text: &str, tags: &[Tag]) -> Result<Segments> {
    let text_len = text.chars().count();
    if text_len != tags.len() {
        return Err(LacError::LengthMismatch {
            text_len,
            tags_len: tags.len(),
        });
    }

    let mut builder = SegmentBuilder::new();
    for (ch, tag) in text.chars().zip(tags) {
        builder.push(ch, tag);
    }
    Ok(builder.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tag::parse_tags;

    fn assert_tiles(text: &str, segments: &Segments) {
        let joined: String = segments.iter().map(|s| s.word.as_str()).collect();
        assert_eq!(joined, text);
        let mut expected_start = 0;
        for seg in segments {
            assert_eq!(seg.offset.start, expected_start);
            assert_eq!(seg.offset.len(), seg.word.chars().count());
            expected_start = seg.offset.end;
        }
        assert_eq!(expected_start, text.chars().count());
    }

    #[test]
    fn segments_follow_begin_markers() {
        let text = "LAC是个优秀的分词工具";
        let tags = parse_tags("nz-B nz-I nz-I v-B q-B a-B a-I u-B n-B n-I n-B n-I");
        let segments = build_segments(text, &tags).unwrap();
        assert_eq!(
            segments.words(),
            vec!["LAC", "是", "个", "优秀", "的", "分词", "工具"]
        );
        assert_eq!(segments.poss(), vec!["nz", "v", "q", "a", "u", "n", "n"]);
        assert_eq!(segments[3].offset, Offset::new(5, 7));
        assert_tiles(text, &segments);
    }

    #[test]
    fn pos_comes_from_tag_before_the_boundary() {
        // The second char carries a different POS than the first; the word
        // takes the POS of its last char.
        let tags = parse_tags("n-B v-I u-B");
        let segments = build_segments("花开的", &tags).unwrap();
        assert_eq!(segments.words(), vec!["花开", "的"]);
        assert_eq!(segments.poss(), vec!["v", "u"]);
    }

    #[test]
    fn leaving_a_tagged_span_starts_a_word() {
        let tags = parse_tags("n-B n-I w-O w-O n-B");
        let segments = build_segments("工具。。书", &tags).unwrap();
        // consecutive O chars stay in one word
        assert_eq!(segments.words(), vec!["工具", "。。", "书"]);
        assert_eq!(segments.poss(), vec!["n", "w", "n"]);
        assert_tiles("工具。。书", &segments);
    }

    #[test]
    fn leading_outside_tag_does_not_emit_empty_word() {
        let tags = parse_tags("w-O n-B");
        let segments = build_segments("，书", &tags).unwrap();
        assert_eq!(segments.words(), vec!["，", "书"]);
    }

    #[test]
    fn inside_only_sequence_is_one_word() {
        let tags = parse_tags("n-I n-I n-I");
        let segments = build_segments("冬天的", &tags).unwrap();
        assert_eq!(segments.len(), 1);
        assert_eq!(segments[0].offset, Offset::new(0, 3));
    }

    #[test]
    fn empty_text_yields_no_segments() {
        let segments = build_segments("", &[]).unwrap();
        assert!(segments.is_empty());
    }

    #[test]
    fn length_mismatch_is_reported() {
        let tags = parse_tags("n-B");
        let err = build_segments("冬天", &tags).unwrap_err();
        assert!(matches!(
            err,
            LacError::LengthMismatch {
                text_len: 2,
                tags_len: 1
            }
        ));
    }

    #[test]
    fn segments_serialize_as_a_plain_array() {
        let segments = build_segments("我", &parse_tags("r-B")).unwrap();
        let json = serde_json::to_string(&segments).unwrap();
        assert_eq!(
            json,
            r#"[{"word":"我","pos":"r","offset":{"start":0,"end":1}}]"#
        );
    }
}
