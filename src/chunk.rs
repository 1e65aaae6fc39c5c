//! Identified chunks and their stored form.
//!
//! A [`Chunk`] is a [`SourceChunk`] that has been given metadata and a
//! content-addressed id:
//!
//! ```text
//! id = "{title}::{part}:{parts}::{sha256(text)[..8]}"
//!
//! "Doc::2:3::2cf24dba"
//!  ─┬─  ─┬─   ───┬───
//!   │    │       └ first 8 hex chars of SHA-256 over the UTF-8 text
//!   │    └ position in the document
//!   └ document title
//! ```
//!
//! The id is a pure function of `(title, part, parts, text)`. Re-chunking
//! the same document with the same settings reproduces the same ids, which
//! is what lets the writer skip chunks that are already stored. Two chunks
//! of one document only collide if both their position and their text
//! hash prefix match.

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::metadata::{combine, separate, ChunkMetadata, FlatMetadata};
use crate::source_chunk::SourceChunk;
use crate::{Error, Result};

/// Hex characters of the text hash kept in a chunk id.
const HASH_PREFIX_LEN: usize = 8;

/// A persisted unit of document text.
///
/// Created once from a [`SourceChunk`] and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Chunk {
    /// The chunk's content.
    pub text: String,
    /// Document and chunk metadata.
    pub metadata: ChunkMetadata,
    /// Content-addressed id, see [`make_id`].
    pub id: String,
}

/// Build the id for a chunk of `text` at `part` of `metadata.parts`.
///
/// ```rust
/// use parcels::{make_id, ChunkMetadata, DocumentMetadata};
///
/// let metadata = ChunkMetadata::from_document(&DocumentMetadata::new("Doc")).with_position(2, 3);
/// let id = make_id("hello", &metadata, 2).unwrap();
///
/// assert_eq!(id, "Doc::2:3::2cf24dba");
/// ```
///
/// # Errors
///
/// Returns [`Error::MissingTitle`] if the document title is empty.
pub fn make_id(text: &str, metadata: &ChunkMetadata, part: usize) -> Result<String> {
    let title = metadata.title();
    if title.trim().is_empty() {
        return Err(Error::MissingTitle);
    }

    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    let hash = format!("{:x}", hasher.finalize());

    Ok(format!(
        "{title}::{part}:{}::{}",
        metadata.parts,
        &hash[..HASH_PREFIX_LEN]
    ))
}

impl Chunk {
    /// Promote a source chunk, setting `metadata.part` and computing the id.
    ///
    /// `metadata` is taken by value, so one metadata instance cannot end up
    /// shared between chunks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingTitle`] if the document title is empty.
    pub fn from_source_chunk(
        source: SourceChunk,
        mut metadata: ChunkMetadata,
        part: usize,
    ) -> Result<Self> {
        metadata.part = part;
        let id = make_id(&source.text, &metadata, part)?;
        Ok(Self {
            text: source.text,
            metadata,
            id,
        })
    }

    /// The flat record a store persists for this chunk.
    #[must_use]
    pub fn to_record(&self) -> ChunkRecord {
        ChunkRecord {
            id: self.id.clone(),
            text: self.text.clone(),
            metadata: combine(&self.metadata),
        }
    }

    /// Rebuild a chunk from a stored record, keeping the stored id.
    ///
    /// # Errors
    ///
    /// Fails if the record's metadata cannot be separated, see
    /// [`separate`](crate::metadata::separate).
    pub fn from_record(record: ChunkRecord) -> Result<Self> {
        let metadata = separate(&record.metadata)?;
        Ok(Self {
            text: record.text,
            metadata,
            id: record.id,
        })
    }
}

impl std::fmt::Display for Chunk {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Chunk {{ id: {}, part: {}/{}, len: {} }}",
            self.id,
            self.metadata.part,
            self.metadata.parts,
            self.text.len()
        )
    }
}

/// What a store keeps for one chunk: no nested metadata.
///
/// Serializes as a single flat object, `{"id", "text", ...combine(..)}`:
///
/// ```rust
/// use parcels::{Chunk, ChunkMetadata, DocumentMetadata, SourceChunk};
///
/// let document = DocumentMetadata::new("Doc").with_extra("lang", "en");
/// let metadata = ChunkMetadata::from_document(&document).with_position(1, 1);
/// let chunk = Chunk::from_source_chunk(SourceChunk::new("hi"), metadata, 1).unwrap();
///
/// let json = serde_json::to_value(chunk.to_record()).unwrap();
/// assert_eq!(json["title"], "Doc");
/// assert_eq!(json["doc.lang"], "en");
/// assert!(json.get("metadata").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChunkRecord {
    /// Chunk id.
    pub id: String,
    /// Chunk text.
    pub text: String,
    /// Combined document and chunk metadata.
    #[serde(flatten)]
    pub metadata: FlatMetadata,
}

/// A chunk returned from a similarity query.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    /// The stored chunk.
    pub chunk: Chunk,
    /// Similarity to the query; higher is closer.
    pub score: f32,
}
