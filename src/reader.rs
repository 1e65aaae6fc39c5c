//! Similarity reads and contiguous passage stitching.
//!
//! [`ChunkReader::get_similar`] embeds a query, asks the store for its
//! nearest chunks, and rebuilds each record into a [`ScoredChunk`].
//!
//! When several hits are neighbours in the same document they read better
//! as one passage. [`contiguous_passages`] stitches them:
//!
//! ```text
//! hits:      Doc A part 3, Doc A part 2, Doc B part 1, Doc A part 5
//! passages:  "A2 A3"   "A5"   "B1"
//! ```

use std::collections::BTreeMap;

use crate::chunk::{Chunk, ScoredChunk};
use crate::store::ChunkStore;
use crate::tokenizer::Embedder;
use crate::{Error, Result};

/// Results fetched when the caller does not say.
pub const DEFAULT_N_RESULTS: usize = 3;

/// Hits scoring below this are dropped.
pub const DEFAULT_MIN_SIMILARITY: f32 = 0.5;

/// Reads chunks back out of a [`ChunkStore`] by similarity.
#[derive(Debug, Clone)]
pub struct ChunkReader<E, S> {
    embedder: E,
    store: S,
    n_results: usize,
    min_similarity: f32,
}

impl<E: Embedder, S: ChunkStore> ChunkReader<E, S> {
    /// Create a reader with the default result count and similarity floor.
    #[must_use]
    pub fn new(embedder: E, store: S) -> Self {
        Self {
            embedder,
            store,
            n_results: DEFAULT_N_RESULTS,
            min_similarity: DEFAULT_MIN_SIMILARITY,
        }
    }

    /// Set how many results to fetch by default.
    #[must_use]
    pub fn with_n_results(mut self, n_results: usize) -> Self {
        self.n_results = n_results;
        self
    }

    /// Set the minimum similarity a hit needs to be returned.
    #[must_use]
    pub fn with_min_similarity(mut self, min_similarity: f32) -> Self {
        self.min_similarity = min_similarity;
        self
    }

    /// Chunks most similar to `text`, best first.
    ///
    /// `n_results` overrides the reader's default.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Embedding`] or [`Error::Storage`] on collaborator
    /// failure, or a metadata error if a stored record cannot be decoded.
    pub fn get_similar(&self, text: &str, n_results: Option<usize>) -> Result<Vec<ScoredChunk>> {
        let vector = self
            .embedder
            .embed(&[text])
            .map_err(Error::Embedding)?
            .into_iter()
            .next()
            .ok_or_else(|| Error::Embedding("embedder returned no vector".into()))?;

        let hits = self
            .store
            .query(&vector, n_results.unwrap_or(self.n_results))
            .map_err(Error::Storage)?;

        hits.into_iter()
            .filter(|hit| hit.score >= self.min_similarity)
            .map(|hit| {
                Ok(ScoredChunk {
                    chunk: Chunk::from_record(hit.record)?,
                    score: hit.score,
                })
            })
            .collect()
    }
}

/// Join hits that are consecutive parts of the same document.
///
/// Passages are ordered by document title, then by part. Chunk texts within
/// a passage are joined with a single space.
#[must_use]
pub fn contiguous_passages(hits: &[ScoredChunk]) -> Vec<String> {
    let mut by_title: BTreeMap<&str, Vec<&Chunk>> = BTreeMap::new();
    for hit in hits {
        by_title
            .entry(hit.chunk.metadata.title())
            .or_default()
            .push(&hit.chunk);
    }

    let mut passages = Vec::new();
    for chunks in by_title.values_mut() {
        chunks.sort_by_key(|c| c.metadata.part);
        chunks.dedup_by_key(|c| c.metadata.part);

        let mut passage: Vec<&str> = Vec::new();
        let mut last_part = None;
        for chunk in chunks.iter() {
            if last_part.is_some_and(|last| chunk.metadata.part != last + 1) {
                passages.push(passage.join(" "));
                passage.clear();
            }
            passage.push(&chunk.text);
            last_part = Some(chunk.metadata.part);
        }
        if !passage.is_empty() {
            passages.push(passage.join(" "));
        }
    }
    passages
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{ChunkMetadata, DocumentMetadata};
    use crate::source_chunk::SourceChunk;

    fn hit(title: &str, part: usize, text: &str) -> ScoredChunk {
        let metadata =
            ChunkMetadata::from_document(&DocumentMetadata::new(title)).with_position(part, 9);
        ScoredChunk {
            chunk: Chunk::from_source_chunk(SourceChunk::new(text), metadata, part).unwrap(),
            score: 0.9,
        }
    }

    #[test]
    fn test_contiguous_runs_are_joined() {
        let hits = vec![
            hit("A", 3, "a3"),
            hit("A", 2, "a2"),
            hit("B", 1, "b1"),
            hit("A", 5, "a5"),
        ];
        assert_eq!(contiguous_passages(&hits), vec!["a2 a3", "a5", "b1"]);
    }

    #[test]
    fn test_duplicate_parts_collapse() {
        let hits = vec![hit("A", 1, "a1"), hit("A", 1, "a1"), hit("A", 2, "a2")];
        assert_eq!(contiguous_passages(&hits), vec!["a1 a2"]);
    }

    #[test]
    fn test_no_hits() {
        assert!(contiguous_passages(&[]).is_empty());
    }
}
