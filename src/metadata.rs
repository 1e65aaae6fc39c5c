//! Document and chunk metadata, and their flat storage form.
//!
//! Most vector stores keep metadata as a flat map of scalars. A chunk's
//! metadata is really two layers, the document it came from and its own
//! position and buffers, so it is flattened on write ([`combine`]) and
//! routed back on read ([`separate`]).
//!
//! ## Flat Layout
//!
//! ```text
//! DocumentMetadata                 ChunkMetadata
//!   title        ─→ "title"          part    ─→ "part"
//!   url          ─→ "url"            parts   ─→ "parts"
//!   author       ─→ "author"         before  ─→ "before"
//!   publish_date ─→ "publish_date"   after   ─→ "after"
//!   extra[k]     ─→ "doc.k"          extra[k] ─→ "k"
//! ```
//!
//! On read, document field names and `doc.`-prefixed keys go back to the
//! document; every other key belongs to the chunk. Optional fields that are
//! `None` are left out of the flat map.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::{Error, Result};

/// Prefix that marks a document-level extra field in a flat map.
pub const DOCUMENT_EXTRA_PREFIX: &str = "doc.";

/// Field names owned by [`DocumentMetadata`].
pub const DOCUMENT_FIELDS: [&str; 4] = ["title", "url", "author", "publish_date"];

/// Field names owned by [`ChunkMetadata`].
pub const CHUNK_FIELDS: [&str; 4] = ["part", "parts", "before", "after"];

/// Field names a [`ChunkRecord`](crate::ChunkRecord) keeps beside its flat metadata.
pub const RECORD_FIELDS: [&str; 2] = ["id", "text"];

/// A scalar metadata value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Text.
    Str(String),
    /// Integer.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Calendar date, serialized as `YYYY-MM-DD`.
    Date(NaiveDate),
}

impl MetadataValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Date(_) => "date",
        }
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<NaiveDate> for MetadataValue {
    fn from(value: NaiveDate) -> Self {
        Self::Date(value)
    }
}

impl std::fmt::Display for MetadataValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
        }
    }
}

/// An open, caller-defined set of metadata fields.
pub type Extra = BTreeMap<String, MetadataValue>;

/// Flat key-value metadata as kept by a store.
pub type FlatMetadata = BTreeMap<String, MetadataValue>;

/// Metadata describing a whole source document.
///
/// `title` takes part in every chunk id, so it must be stable across
/// re-chunking of the same logical document. It is not checked here; an
/// empty title is rejected when a chunk id is built.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DocumentMetadata {
    /// Document title.
    pub title: String,
    /// Where the document came from.
    pub url: Option<String>,
    /// Who wrote it.
    pub author: Option<String>,
    /// When it was published.
    pub publish_date: Option<NaiveDate>,
    /// Caller-defined document fields.
    pub extra: Extra,
}

impl DocumentMetadata {
    /// Create metadata with just a title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    /// Set the source URL.
    #[must_use]
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the author.
    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    /// Set the publish date.
    #[must_use]
    pub fn with_publish_date(mut self, date: NaiveDate) -> Self {
        self.publish_date = Some(date);
        self
    }

    /// Set the publish date from an ISO `YYYY-MM-DD` string.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDate`] if `date` does not parse.
    pub fn with_publish_date_str(self, date: &str) -> Result<Self> {
        Ok(self.with_publish_date(parse_date(date)?))
    }

    /// Add a caller-defined field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Metadata for one chunk: its document plus its place in that document.
///
/// `1 <= part <= parts` once assembled. `parts` is only known after the
/// whole document is chunked and is the same for every chunk of a run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChunkMetadata {
    /// The document this chunk belongs to.
    pub document: DocumentMetadata,
    /// 1-based position of the chunk.
    pub part: usize,
    /// Total chunks in the document.
    pub parts: usize,
    /// Context preceding the chunk.
    pub before: String,
    /// Context following the chunk.
    pub after: String,
    /// Chunk-local fields, distinct from the document's.
    pub extra: Extra,
}

impl ChunkMetadata {
    /// Start chunk metadata from a copy of the document's metadata.
    #[must_use]
    pub fn from_document(document: &DocumentMetadata) -> Self {
        Self {
            document: document.clone(),
            ..Self::default()
        }
    }

    /// The document title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.document.title
    }

    /// Set the chunk's position.
    #[must_use]
    pub fn with_position(mut self, part: usize, parts: usize) -> Self {
        self.part = part;
        self.parts = parts;
        self
    }

    /// Set the context buffers.
    #[must_use]
    pub fn with_buffers(mut self, before: impl Into<String>, after: impl Into<String>) -> Self {
        self.before = before.into();
        self.after = after.into();
        self
    }

    /// Add a chunk-local field.
    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<MetadataValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }
}

/// Flatten chunk metadata and its document metadata into one map.
///
/// Chunk extras whose key collides with a reserved field name (including
/// the record's own `id` and `text`), or that carry the document prefix,
/// cannot round-trip and are dropped with a warning.
#[must_use]
pub fn combine(metadata: &ChunkMetadata) -> FlatMetadata {
    let mut flat = FlatMetadata::new();

    for (key, value) in &metadata.extra {
        if is_reserved(key) {
            tracing::warn!(key = %key, "dropping chunk metadata field that collides with a reserved name");
            continue;
        }
        flat.insert(key.clone(), value.clone());
    }

    let document = &metadata.document;
    for (key, value) in &document.extra {
        flat.insert(format!("{DOCUMENT_EXTRA_PREFIX}{key}"), value.clone());
    }
    flat.insert("title".into(), document.title.clone().into());
    if let Some(url) = &document.url {
        flat.insert("url".into(), url.clone().into());
    }
    if let Some(author) = &document.author {
        flat.insert("author".into(), author.clone().into());
    }
    if let Some(date) = document.publish_date {
        flat.insert("publish_date".into(), date.into());
    }

    flat.insert("part".into(), count(metadata.part));
    flat.insert("parts".into(), count(metadata.parts));
    flat.insert("before".into(), metadata.before.clone().into());
    flat.insert("after".into(), metadata.after.clone().into());

    flat
}

/// Rebuild chunk metadata (and its document metadata) from a flat map.
///
/// The inverse of [`combine`]: `separate(&combine(&m))? == m` whenever no
/// chunk extra collides with a reserved name.
///
/// # Errors
///
/// - [`Error::MissingField`] if `title`, `part`, or `parts` is absent.
/// - [`Error::InvalidMetadata`] if a known field has the wrong kind.
pub fn separate(flat: &FlatMetadata) -> Result<ChunkMetadata> {
    let mut document = DocumentMetadata::default();
    let mut chunk = ChunkMetadata::default();
    let mut title = None;
    let mut part = None;
    let mut parts = None;

    for (key, value) in flat {
        match key.as_str() {
            "title" => title = Some(expect_str(key, value)?),
            "url" => document.url = Some(expect_str(key, value)?),
            "author" => document.author = Some(expect_str(key, value)?),
            "publish_date" => document.publish_date = Some(expect_date(key, value)?),
            "part" => part = Some(expect_count(key, value)?),
            "parts" => parts = Some(expect_count(key, value)?),
            "before" => chunk.before = expect_str(key, value)?,
            "after" => chunk.after = expect_str(key, value)?,
            _ => match key.strip_prefix(DOCUMENT_EXTRA_PREFIX) {
                Some(doc_key) => {
                    document.extra.insert(doc_key.to_string(), value.clone());
                }
                None => {
                    chunk.extra.insert(key.clone(), value.clone());
                }
            },
        }
    }

    document.title = title.ok_or(Error::MissingField("title"))?;
    chunk.part = part.ok_or(Error::MissingField("part"))?;
    chunk.parts = parts.ok_or(Error::MissingField("parts"))?;
    chunk.document = document;
    Ok(chunk)
}

/// Parse an ISO `YYYY-MM-DD` date.
///
/// # Errors
///
/// Returns [`Error::InvalidDate`] if `date` does not parse.
pub fn parse_date(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|_| Error::InvalidDate(date.to_string()))
}

fn is_reserved(key: &str) -> bool {
    DOCUMENT_FIELDS.contains(&key)
        || CHUNK_FIELDS.contains(&key)
        || RECORD_FIELDS.contains(&key)
        || key.starts_with(DOCUMENT_EXTRA_PREFIX)
}

fn count(n: usize) -> MetadataValue {
    MetadataValue::Int(i64::try_from(n).unwrap_or(i64::MAX))
}

fn invalid(key: &str, expected: &str, value: &MetadataValue) -> Error {
    Error::InvalidMetadata {
        key: key.to_string(),
        reason: format!("expected {expected}, got {}", value.kind()),
    }
}

fn expect_str(key: &str, value: &MetadataValue) -> Result<String> {
    match value {
        MetadataValue::Str(s) => Ok(s.clone()),
        other => Err(invalid(key, "string", other)),
    }
}

fn expect_count(key: &str, value: &MetadataValue) -> Result<usize> {
    match value {
        MetadataValue::Int(i) => usize::try_from(*i).map_err(|_| Error::InvalidMetadata {
            key: key.to_string(),
            reason: format!("expected a non-negative count, got {i}"),
        }),
        other => Err(invalid(key, "int", other)),
    }
}

// Stores that only keep strings and numbers hand dates back as text.
fn expect_date(key: &str, value: &MetadataValue) -> Result<NaiveDate> {
    match value {
        MetadataValue::Date(d) => Ok(*d),
        MetadataValue::Str(s) => parse_date(s),
        other => Err(invalid(key, "date", other)),
    }
}
