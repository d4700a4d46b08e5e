//! Word-boundary oracle
//!
//! Locale-aware segmentation is a strategy handed to the resolver. The
//! default, [`AlphanumericBoundary`], only looks at transitions between
//! alphanumeric and other chars and ignores the locale; a Unicode (UAX #29)
//! segmenter can be plugged in by implementing [`WordBoundary`].

/// Locale-aware word-boundary predicate over a char buffer
pub trait WordBoundary {
    /// Whether `position` (a char index in `0..=text.len()`) is a word
    /// boundary of `text` for `locale`. The start and the end of the text are
    /// always boundaries.
    fn is_word_boundary(&self, text: &[char], position: usize, locale: &str) -> bool;

    /// Whether `text[start..start + length]` starts and ends on word
    /// boundaries: the last boundary at or before `start` is `start` and the
    /// first boundary after `start + length - 1` is `start + length`.
    fn is_word_bounded(
        &self,
        text: &[char],
        start: usize,
        length: usize,
        start_locale: &str,
        end_locale: &str,
    ) -> bool {
        self.is_word_boundary(text, start, start_locale)
            && self.is_word_boundary(text, start + length, end_locale)
    }
}

/// Word boundaries at every change between alphanumeric and
/// non-alphanumeric chars, plus both ends of the text
#[derive(Debug, Clone, Copy, Default)]
pub struct AlphanumericBoundary;

impl WordBoundary for AlphanumericBoundary {
    fn is_word_boundary(&self, text: &[char], position: usize, _locale: &str) -> bool {
        if position == 0 || position >= text.len() {
            return true;
        }
        text[position - 1].is_alphanumeric() != text[position].is_alphanumeric()
    }
}

impl<W: WordBoundary + ?Sized> WordBoundary for &W {
    fn is_word_boundary(&self, text: &[char], position: usize, locale: &str) -> bool {
        (**self).is_word_boundary(text, position, locale)
    }
}
