//! Chunk assembly: from document text to stored chunks.
//!
//! ```text
//! text ──chunk_text──▶ [SourceChunk] ──from_source_chunk──▶ [Chunk] ──▶ store
//!                        parts = len      part = index + 1        get(id)?
//!                                                                 ├ found → skip
//!                                                                 └ absent → embed + add
//! ```
//!
//! Writes are idempotent per id: re-ingesting identical text at the same
//! position produces the same id and is not embedded again.

use crate::chunk::Chunk;
use crate::chunker::SourceChunker;
use crate::metadata::{ChunkMetadata, DocumentMetadata};
use crate::store::ChunkStore;
use crate::tokenizer::Embedder;
use crate::{Error, Result};

/// Chunks documents and persists the chunks through a [`ChunkStore`].
#[derive(Debug)]
pub struct ChunkWriter<E, S> {
    chunker: SourceChunker<E>,
    store: S,
}

impl<E: Embedder, S: ChunkStore> ChunkWriter<E, S> {
    /// Create a writer. The chunker's tokenizer also provides embeddings.
    #[must_use]
    pub fn new(chunker: SourceChunker<E>, store: S) -> Self {
        Self { chunker, store }
    }

    /// The chunker used to split documents.
    #[must_use]
    pub fn chunker(&self) -> &SourceChunker<E> {
        &self.chunker
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Chunk a document, assign ids, and store any chunks not yet present.
    ///
    /// Returns every chunk of the document, in order, whether or not it was
    /// newly stored. Every chunk carries the same `parts`.
    ///
    /// # Errors
    ///
    /// Tokenizer, identity, embedding, and storage errors propagate
    /// unchanged; chunks stored before the failure stay stored.
    pub fn create_chunks_for_document(
        &self,
        text: &str,
        document: &DocumentMetadata,
    ) -> Result<Vec<Chunk>> {
        let chunks = self.assemble(text, document)?;
        for chunk in &chunks {
            self.store_chunk(chunk)?;
        }
        Ok(chunks)
    }

    /// Chunk a document and assign ids without touching the store.
    ///
    /// # Errors
    ///
    /// Tokenizer and identity errors propagate unchanged.
    pub fn assemble(&self, text: &str, document: &DocumentMetadata) -> Result<Vec<Chunk>> {
        let source_chunks = self.chunker.chunk_text(text)?;
        let parts = source_chunks.len();

        source_chunks
            .into_iter()
            .enumerate()
            .map(|(index, source)| {
                let part = index + 1;
                let metadata = ChunkMetadata::from_document(document)
                    .with_position(part, parts)
                    .with_buffers(source.before.clone(), source.after.clone());
                Chunk::from_source_chunk(source, metadata, part)
            })
            .collect()
    }

    /// Store one chunk unless a record with its id already exists.
    ///
    /// Returns `true` if the chunk was embedded and added.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] or [`Error::Storage`] on collaborator failure.
    pub fn store_chunk(&self, chunk: &Chunk) -> Result<bool> {
        let existing = self.store.get(&[chunk.id.as_str()]).map_err(Error::Storage)?;
        if existing.contains_key(&chunk.id) {
            tracing::info!(id = %chunk.id, "chunk already stored, skipping");
            return Ok(false);
        }

        let embedding = self
            .chunker
            .tokenizer()
            .embed(&[chunk.text.as_str()])
            .map_err(Error::Embedding)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("embedder returned no vector".into()))?;

        self.store
            .add(chunk.to_record(), embedding)
            .map_err(Error::Storage)?;
        tracing::info!(id = %chunk.id, "stored chunk");
        Ok(true)
    }

    /// Remove a stored chunk by id. Returns whether anything was deleted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Storage`] if the store fails.
    pub fn delete_chunk(&self, id: &str) -> Result<bool> {
        let deleted = self.store.delete(id).map_err(Error::Storage)?;
        if deleted {
            tracing::info!(id, "deleted chunk");
        } else {
            tracing::warn!(id, "no chunk to delete");
        }
        Ok(deleted)
    }
}
