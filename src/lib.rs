//! # parcels
//!
//! Token-bounded text chunking with context buffers and content-addressed
//! chunk identity, for embedding pipelines.
//!
//! ## The Problem
//!
//! An embedding model takes at most `max_tokens` tokens. Documents are
//! longer. They have to be cut into pieces that:
//!
//! - fit the model's budget, measured in the model's own tokens
//! - end on paragraph or sentence boundaries wherever possible
//! - keep some surrounding context when a boundary had to be forced
//! - get the same identity every time the same document is re-ingested,
//!   so unchanged chunks are not embedded twice
//!
//! ## Pipeline
//!
//! ```text
//! text + DocumentMetadata
//!    │
//!    ▼  SourceChunker::chunk_text         segment → encode → accumulate / hard-slice
//! [SourceChunk { text, before, after }]
//!    │
//!    ▼  Chunk::from_source_chunk          part = i + 1, parts = len, id = make_id(..)
//! [Chunk { text, metadata, id }]
//!    │
//!    ▼  ChunkWriter                       get(id) → skip, or embed + add(record)
//! ChunkStore
//! ```
//!
//! On read, [`ChunkReader`] queries the store and [`metadata::separate`]
//! splits each flat record back into document and chunk metadata.
//!
//! ## Quick Start
//!
//! ```rust
//! use parcels::{BoxError, ChunkSettings, SourceChunker, TokenId, Tokenizer};
//!
//! /// One token per whitespace-separated word (a stand-in for a real BPE).
//! struct Words;
//!
//! impl Tokenizer for Words {
//!     fn encode(&self, text: &str) -> Result<Vec<TokenId>, BoxError> {
//!         Ok(text.split_whitespace().map(|w| w.len() as TokenId).collect())
//!     }
//!     fn decode(&self, tokens: &[TokenId]) -> Result<String, BoxError> {
//!         Ok(tokens.iter().map(|&n| "x".repeat(n as usize)).collect::<Vec<_>>().join(" "))
//!     }
//!     fn max_tokens(&self) -> usize {
//!         30
//!     }
//! }
//!
//! let settings = ChunkSettings::default().with_buffers(2, 2);
//! let chunker = SourceChunker::new(Words, settings).unwrap();
//!
//! let chunks = chunker.chunk_text("One short sentence. Another one.").unwrap();
//! assert_eq!(chunks.len(), 1);
//! ```
//!
//! ## Identity
//!
//! ```text
//! "{title}::{part}:{parts}::{first 8 hex chars of sha256(text)}"
//! ```
//!
//! See [`make_id`].

mod budget;
pub mod chunk;
mod chunker;
mod error;
pub mod metadata;
pub mod reader;
mod settings;
pub mod slice;
mod source_chunk;
pub mod store;
mod tokenizer;
pub mod units;
mod writer;

pub use budget::TokenBudget;
pub use chunk::{make_id, Chunk, ChunkRecord, ScoredChunk};
pub use chunker::SourceChunker;
pub use error::{Error, Result};
pub use metadata::{combine, separate, ChunkMetadata, DocumentMetadata, FlatMetadata, MetadataValue};
pub use reader::{contiguous_passages, ChunkReader};
pub use settings::ChunkSettings;
pub use source_chunk::SourceChunk;
pub use store::memory::InMemoryStore;
pub use store::{ChunkStore, ScoredRecord};
pub use tokenizer::{BoxError, Embedder, TokenId, Tokenizer};
pub use units::UnitMode;
pub use writer::ChunkWriter;
