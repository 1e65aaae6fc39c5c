//! Error types for parcels.

use crate::tokenizer::BoxError;

/// Errors that can occur while chunking, identifying, or persisting text.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A context buffer size was negative.
    #[error("{name} must be >= 0, got {value}")]
    InvalidBuffer {
        /// Which buffer (`buffer_before` or `buffer_after`).
        name: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// The buffers leave no room for chunk text.
    #[error(
        "the available tokens must be greater than the sum of buffer_before and buffer_after \
         (required: {required}, available: {available})"
    )]
    BufferExceedsBudget {
        /// Tokens reserved by `buffer_before + buffer_after`.
        required: usize,
        /// The model's token budget.
        available: usize,
    },

    /// The tokenizer failed on a unit of text.
    #[error("failed to tokenize {unit:?}: {source}")]
    Tokenization {
        /// The offending unit, truncated for diagnostics.
        unit: String,
        /// The tokenizer's error.
        #[source]
        source: BoxError,
    },

    /// Chunk ids cannot be built without a document title.
    #[error("metadata has no title; a title is required to build a chunk id")]
    MissingTitle,

    /// A publish date was not an ISO `YYYY-MM-DD` date.
    #[error("invalid publish date {0:?}")]
    InvalidDate(String),

    /// A required field was absent from a stored record.
    #[error("stored metadata is missing field {0:?}")]
    MissingField(&'static str),

    /// A stored metadata field had the wrong kind or an out-of-range value.
    #[error("invalid metadata field {key:?}: {reason}")]
    InvalidMetadata {
        /// The offending key.
        key: String,
        /// What was wrong with it.
        reason: String,
    },

    /// The embedding provider failed.
    #[error("embedding error: {0}")]
    Embedding(#[source] BoxError),

    /// The storage collaborator failed.
    #[error("storage error: {0}")]
    Storage(#[source] BoxError),
}

/// Result type for parcels operations.
pub type Result<T> = std::result::Result<T, Error>;
