//! Unit segmentation.
//!
//! A *unit* is the atom the chunker accumulates: a paragraph, a sentence,
//! or the whole text. Units are never merged mid-way; a chunk boundary can
//! only fall between two units (or inside a unit that is too large to fit
//! any chunk on its own, see [`slice`](crate::slice)).
//!
//! ## Boundaries
//!
//! ```text
//! Paragraph:  "\n" + any whitespace + "\n"
//!             "Intro.\n\nBody.\n  \nEnd."  →  ["Intro.", "Body.", "End."]
//!
//! Sentence:   whitespace following '.', '!' or '?'
//!             "One. Two! Three?"          →  ["One.", "Two!", "Three?"]
//! ```
//!
//! The separating whitespace is dropped; the punctuation stays with its
//! sentence. This is a plain punctuation rule, not UAX #29: "Dr. Smith"
//! splits after "Dr.". That keeps segmentation predictable for callers who
//! reason about token counts per unit.
//!
//! Units that are empty after trimming are skipped.

use once_cell::sync::Lazy;
use regex::Regex;

static PARAGRAPH_BREAK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("Invalid paragraph break regex"));

static SENTENCE_END: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[.!?]\s+").expect("Invalid sentence end regex"));

/// How text is segmented into units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitMode {
    /// Split on blank lines.
    Paragraph,
    /// Split after sentence-ending punctuation.
    Sentence,
    /// The whole text is one unit.
    Whole,
}

/// Split `text` into ordered, non-blank units.
///
/// ```rust
/// use parcels::units::{segment, UnitMode};
///
/// let units = segment("Sentence one. Sentence two.", UnitMode::Sentence);
/// assert_eq!(units, vec!["Sentence one.", "Sentence two."]);
/// ```
#[must_use]
pub fn segment(text: &str, mode: UnitMode) -> Vec<&str> {
    let units: Vec<&str> = match mode {
        UnitMode::Paragraph => PARAGRAPH_BREAK.split(text).collect(),
        UnitMode::Sentence => split_sentences(text),
        UnitMode::Whole => vec![text],
    };

    units
        .into_iter()
        .filter(|unit| !unit.trim().is_empty())
        .collect()
}

fn split_sentences(text: &str) -> Vec<&str> {
    let mut units = Vec::new();
    let mut start = 0;

    for m in SENTENCE_END.find_iter(text) {
        // Punctuation is a single ASCII byte; keep it, drop the whitespace.
        let end = m.start() + 1;
        units.push(&text[start..end]);
        start = m.end();
    }
    units.push(&text[start..]);

    units
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_sentences() {
        let units = segment("Hello world. How are you? I am fine!", UnitMode::Sentence);
        assert_eq!(units, vec!["Hello world.", "How are you?", "I am fine!"]);
    }

    #[test]
    fn test_sentence_needs_trailing_whitespace() {
        // "3.14" has no whitespace after the period
        let units = segment("Pi is 3.14 roughly. Yes.", UnitMode::Sentence);
        assert_eq!(units, vec!["Pi is 3.14 roughly.", "Yes."]);
    }

    #[test]
    fn test_sentence_newlines_are_whitespace() {
        let units = segment("First.\nSecond.\n\n\tThird.", UnitMode::Sentence);
        assert_eq!(units, vec!["First.", "Second.", "Third."]);
    }

    #[test]
    fn test_paragraphs() {
        let text = "Para one. Still one.\n\nPara two.\n   \nPara three.";
        let units = segment(text, UnitMode::Paragraph);
        assert_eq!(
            units,
            vec!["Para one. Still one.", "Para two.", "Para three."]
        );
    }

    #[test]
    fn test_single_newline_is_not_a_paragraph() {
        let units = segment("Line one\nLine two", UnitMode::Paragraph);
        assert_eq!(units, vec!["Line one\nLine two"]);
    }

    #[test]
    fn test_whole() {
        let units = segment("One. Two.\n\nThree.", UnitMode::Whole);
        assert_eq!(units, vec!["One. Two.\n\nThree."]);
    }

    #[test]
    fn test_trailing_whitespace_yields_no_blank_unit() {
        let units = segment("Done.   ", UnitMode::Sentence);
        assert_eq!(units, vec!["Done."]);
    }

    #[test]
    fn test_whitespace_only() {
        assert!(segment("   \n\t  ", UnitMode::Sentence).is_empty());
        assert!(segment("\n\n\n", UnitMode::Paragraph).is_empty());
        assert!(segment("  ", UnitMode::Whole).is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert!(segment("", UnitMode::Sentence).is_empty());
    }

    #[test]
    fn test_unicode_text() {
        let units = segment("Grüße aus Köln. 日本語のテキスト? Ja!", UnitMode::Sentence);
        assert_eq!(units, vec!["Grüße aus Köln.", "日本語のテキスト?", "Ja!"]);
    }
}
