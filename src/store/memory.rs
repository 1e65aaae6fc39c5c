//! In-memory [`ChunkStore`] implementation for testing and demos.
//!
//! Uses a `HashMap` behind `std::sync::RwLock`. Queries are brute-force
//! cosine similarity over every stored vector.

use std::collections::HashMap;
use std::sync::RwLock;

use super::{ChunkStore, ScoredRecord};
use crate::chunk::ChunkRecord;
use crate::tokenizer::BoxError;

struct StoredChunk {
    record: ChunkRecord,
    vector: Vec<f32>,
}

/// In-memory chunk store.
#[derive(Default)]
pub struct InMemoryStore {
    chunks: RwLock<HashMap<String, StoredChunk>>,
}

impl InMemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored chunks. A poisoned store reports zero.
    pub fn len(&self) -> usize {
        self.chunks.read().map(|c| c.len()).unwrap_or_default()
    }

    /// Whether the store holds no chunks.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for InMemoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryStore")
            .field("chunks", &self.len())
            .finish()
    }
}

fn poisoned() -> BoxError {
    "in-memory store lock poisoned".into()
}

fn cosine_sim(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let mag_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let mag_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if mag_a < f32::EPSILON || mag_b < f32::EPSILON {
        0.0
    } else {
        dot / (mag_a * mag_b)
    }
}

impl ChunkStore for InMemoryStore {
    fn get(&self, ids: &[&str]) -> Result<HashMap<String, ChunkRecord>, BoxError> {
        let chunks = self.chunks.read().map_err(|_| poisoned())?;
        Ok(ids
            .iter()
            .filter_map(|id| chunks.get(*id))
            .map(|stored| (stored.record.id.clone(), stored.record.clone()))
            .collect())
    }

    fn add(&self, record: ChunkRecord, embedding: Vec<f32>) -> Result<(), BoxError> {
        let mut chunks = self.chunks.write().map_err(|_| poisoned())?;
        chunks.insert(
            record.id.clone(),
            StoredChunk {
                record,
                vector: embedding,
            },
        );
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, BoxError> {
        let mut chunks = self.chunks.write().map_err(|_| poisoned())?;
        Ok(chunks.remove(id).is_some())
    }

    fn query(&self, vector: &[f32], n_results: usize) -> Result<Vec<ScoredRecord>, BoxError> {
        let chunks = self.chunks.read().map_err(|_| poisoned())?;
        let mut scored: Vec<ScoredRecord> = chunks
            .values()
            .map(|stored| ScoredRecord {
                record: stored.record.clone(),
                score: cosine_sim(vector, &stored.vector),
            })
            .collect();

        // Ties broken by id so results are stable across HashMap orderings
        scored.sort_by(|a, b| {
            b.score
                .total_cmp(&a.score)
                .then_with(|| a.record.id.cmp(&b.record.id))
        });
        scored.truncate(n_results);
        Ok(scored)
    }
}
