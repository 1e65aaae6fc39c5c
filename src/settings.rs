//! Chunker configuration.
//!
//! [`ChunkSettings`] is plain data: it deserializes from whatever config
//! file the application uses (every field has a default) and is validated
//! only when handed to [`SourceChunker::new`](crate::SourceChunker::new).
//!
//! ```rust
//! use parcels::ChunkSettings;
//!
//! let settings = ChunkSettings::default()
//!     .with_paragraphs(true)
//!     .with_buffers(4, 4);
//! assert!(settings.preserve_paragraphs);
//! assert_eq!(settings.buffer_before, 4);
//! ```

use serde::Deserialize;

use crate::units::UnitMode;

/// Settings for the chunking process.
///
/// Buffers are signed so that a negative value read from a config file is
/// representable and rejected with a configuration error rather than
/// failing deserialization with an opaque message.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChunkSettings {
    /// Split on blank lines before anything else.
    pub preserve_paragraphs: bool,
    /// Split on sentence-ending punctuation followed by whitespace.
    pub preserve_sentences: bool,
    /// Tokens of preceding context for hard-sliced chunks.
    pub buffer_before: i64,
    /// Tokens of following context for hard-sliced chunks.
    pub buffer_after: i64,
    /// Optional cap below the model's own token limit.
    pub max_length: Option<usize>,
}

impl Default for ChunkSettings {
    fn default() -> Self {
        Self {
            preserve_paragraphs: false,
            preserve_sentences: true,
            buffer_before: 10,
            buffer_after: 10,
            max_length: None,
        }
    }
}

impl ChunkSettings {
    /// Set paragraph preservation.
    #[must_use]
    pub fn with_paragraphs(mut self, preserve: bool) -> Self {
        self.preserve_paragraphs = preserve;
        self
    }

    /// Set sentence preservation.
    #[must_use]
    pub fn with_sentences(mut self, preserve: bool) -> Self {
        self.preserve_sentences = preserve;
        self
    }

    /// Set both context buffers.
    #[must_use]
    pub fn with_buffers(mut self, before: i64, after: i64) -> Self {
        self.buffer_before = before;
        self.buffer_after = after;
        self
    }

    /// Cap the token budget below the model's limit.
    #[must_use]
    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    /// How text is segmented into units. Paragraphs win over sentences.
    #[must_use]
    pub fn unit_mode(&self) -> UnitMode {
        if self.preserve_paragraphs {
            UnitMode::Paragraph
        } else if self.preserve_sentences {
            UnitMode::Sentence
        } else {
            UnitMode::Whole
        }
    }

    /// The token budget to use against a model with `model_max_tokens`.
    ///
    /// A `max_length` larger than the model allows is clamped.
    #[must_use]
    pub fn effective_max_tokens(&self, model_max_tokens: usize) -> usize {
        match self.max_length {
            Some(max_length) if max_length > model_max_tokens => {
                tracing::warn!(
                    max_length,
                    model_max_tokens,
                    "max_length is greater than the model's token limit; using the model limit"
                );
                model_max_tokens
            }
            Some(max_length) => max_length,
            None => model_max_tokens,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = ChunkSettings::default();
        assert!(!settings.preserve_paragraphs);
        assert!(settings.preserve_sentences);
        assert_eq!(settings.buffer_before, 10);
        assert_eq!(settings.buffer_after, 10);
        assert_eq!(settings.unit_mode(), UnitMode::Sentence);
    }

    #[test]
    fn test_paragraphs_take_precedence() {
        let settings = ChunkSettings::default().with_paragraphs(true);
        assert_eq!(settings.unit_mode(), UnitMode::Paragraph);
    }

    #[test]
    fn test_whole_text_mode() {
        let settings = ChunkSettings::default().with_sentences(false);
        assert_eq!(settings.unit_mode(), UnitMode::Whole);
    }

    #[test]
    fn test_max_length_clamped_to_model() {
        let settings = ChunkSettings::default().with_max_length(9000);
        assert_eq!(settings.effective_max_tokens(8191), 8191);

        let settings = ChunkSettings::default().with_max_length(256);
        assert_eq!(settings.effective_max_tokens(8191), 256);

        assert_eq!(ChunkSettings::default().effective_max_tokens(512), 512);
    }

    #[test]
    fn test_deserialize_partial() {
        let settings: ChunkSettings =
            serde_json::from_str(r#"{"preserve_paragraphs": true, "buffer_after": 3}"#).unwrap();
        assert!(settings.preserve_paragraphs);
        assert!(settings.preserve_sentences);
        assert_eq!(settings.buffer_before, 10);
        assert_eq!(settings.buffer_after, 3);
        assert_eq!(settings.max_length, None);
    }

    #[test]
    fn test_deserialize_negative_buffer() {
        let settings: ChunkSettings = serde_json::from_str(r#"{"buffer_before": -1}"#).unwrap();
        assert_eq!(settings.buffer_before, -1);
    }
}
