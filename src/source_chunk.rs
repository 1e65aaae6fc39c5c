//! The SourceChunk type: chunk text plus its context buffers.

/// A chunk of text, before it has an id or metadata.
///
/// `before` and `after` are derived context: decoded text that sat next to
/// `text` in the source document. They let a retrieval consumer show a
/// chunk in context without fetching the document again. They are never
/// authoritative and are empty for chunks built by accumulating whole
/// units.
///
/// ```text
/// Document tokens:  … t44 t45 │ t46 … t91 │ t92 t93 …
///                   └before─┘ └── text ──┘ └─after─┘
/// ```
///
/// A `SourceChunk` only lives between the [`SourceChunker`](crate::SourceChunker)
/// and [`Chunk::from_source_chunk`](crate::Chunk::from_source_chunk).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SourceChunk {
    /// The chunk's own content.
    pub text: String,
    /// Context immediately preceding `text`.
    pub before: String,
    /// Context immediately following `text`.
    pub after: String,
}

impl SourceChunk {
    /// Create a chunk with no context buffers.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            before: String::new(),
            after: String::new(),
        }
    }

    /// Create a chunk with context buffers.
    #[must_use]
    pub fn with_buffers(
        text: impl Into<String>,
        before: impl Into<String>,
        after: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            before: before.into(),
            after: after.into(),
        }
    }

    /// The length of the chunk text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether the chunk text is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether either context buffer is populated.
    #[must_use]
    pub fn has_buffers(&self) -> bool {
        !self.before.is_empty() || !self.after.is_empty()
    }
}

impl std::fmt::Display for SourceChunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "SourceChunk {{ len: {}, before: {}, after: {} }}",
            self.len(),
            self.before.len(),
            self.after.len()
        )
    }
}
