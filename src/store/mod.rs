//! Storage collaborator.
//!
//! The [`ChunkStore`] trait is the narrow interface the writer and reader
//! need from a vector store. Real backends (Chroma, Qdrant, SQLite) live
//! outside this crate; [`memory::InMemoryStore`] is a brute-force reference
//! implementation for tests and demos.
//!
//! Stores only ever see flat [`ChunkRecord`]s, never nested metadata.
//!
//! | Method | Purpose |
//! |--------|---------|
//! | [`get`](ChunkStore::get) | Fetch existing records by id |
//! | [`add`](ChunkStore::add) | Persist a record with its embedding |
//! | [`delete`](ChunkStore::delete) | Remove a record by id |
//! | [`query`](ChunkStore::query) | Rank records by similarity to a vector |

pub mod memory;

use std::collections::HashMap;

use crate::chunk::ChunkRecord;
use crate::tokenizer::BoxError;

/// A stored record together with its similarity to a query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredRecord {
    /// The stored record.
    pub record: ChunkRecord,
    /// Similarity to the query; higher is closer.
    pub score: f32,
}

/// Abstract storage backend for chunks.
///
/// Calls are synchronous and may block. Implementations must be
/// `Send + Sync` so one store can serve concurrent ingestion runs; two runs
/// racing on the same id simply write the same content twice.
pub trait ChunkStore: Send + Sync {
    /// Fetch the records that exist among `ids`, keyed by id.
    fn get(&self, ids: &[&str]) -> Result<HashMap<String, ChunkRecord>, BoxError>;

    /// Persist a record and its embedding vector.
    fn add(&self, record: ChunkRecord, embedding: Vec<f32>) -> Result<(), BoxError>;

    /// Remove a record. Returns whether anything was deleted.
    fn delete(&self, id: &str) -> Result<bool, BoxError>;

    /// The `n_results` records most similar to `vector`, best first.
    fn query(&self, vector: &[f32], n_results: usize) -> Result<Vec<ScoredRecord>, BoxError>;
}

impl<S: ChunkStore + ?Sized> ChunkStore for std::sync::Arc<S> {
    fn get(&self, ids: &[&str]) -> Result<HashMap<String, ChunkRecord>, BoxError> {
        (**self).get(ids)
    }

    fn add(&self, record: ChunkRecord, embedding: Vec<f32>) -> Result<(), BoxError> {
        (**self).add(record, embedding)
    }

    fn delete(&self, id: &str) -> Result<bool, BoxError> {
        (**self).delete(id)
    }

    fn query(&self, vector: &[f32], n_results: usize) -> Result<Vec<ScoredRecord>, BoxError> {
        (**self).query(vector, n_results)
    }
}
