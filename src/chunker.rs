//! Token-budgeted chunking that honours paragraph and sentence boundaries.
//!
//! ## The Algorithm
//!
//! ```text
//! 1. Segment text into units (paragraphs, sentences, or the whole text)
//! 2. Encode each unit and decide:
//!      unit > buffered_max        → hard-slice it; every slice is a chunk
//!                                   with before/after buffers
//!      running + unit ≤ buffered  → append unit tokens to the running chunk
//!      otherwise                  → flush the running chunk, start a new
//!                                   one with this unit
//! 3. Flush whatever is left
//! ```
//!
//! ## Two Paths, Two Buffer Policies
//!
//! Accumulated chunks end on a unit boundary and get no context buffers.
//! Only a unit that had to be cut mechanically gets `before`/`after` text,
//! because that is where a reader loses the surrounding sentence.
//!
//! ```text
//! Units:   [S1 S2 S3] [S4 ─────── oversized ─────────] [S5 S6]
//!                                 ↓
//! Chunks:  "S4a"+after   before+"S4b"   "S1S2S3S5S6"
//!          ├─ hard slices, buffered ─┤   no buffers
//!                                        (S1..S3 and S5, S6 fit one budget)
//! ```
//!
//! Accumulated chunks are built by concatenating unit *tokens*, so the
//! whitespace that separated the units is whatever the tokenizer's
//! `decode` produces for the joined tokens.
//!
//! ## Ordering
//!
//! An oversized unit's slices are emitted as soon as the unit is seen. The
//! running chunk is left untouched, so small units on both sides of an
//! oversized unit can share one accumulated chunk that is emitted after the
//! slices. Chunk order therefore follows document order only within each
//! path.

use unicode_segmentation::UnicodeSegmentation;

use crate::budget::TokenBudget;
use crate::settings::ChunkSettings;
use crate::slice::slice_tokens;
use crate::source_chunk::SourceChunk;
use crate::tokenizer::{TokenId, Tokenizer};
use crate::units::{segment, UnitMode};
use crate::{Error, Result};

/// Graphemes of an offending unit kept in tokenization errors.
const DIAGNOSTIC_GRAPHEMES: usize = 48;

/// Splits documents into token-bounded [`SourceChunk`]s.
///
/// The chunker holds only immutable configuration and its tokenizer, so one
/// instance can chunk many documents concurrently.
///
/// ## Example
///
/// ```rust
/// use parcels::{BoxError, ChunkSettings, SourceChunker, TokenId, Tokenizer};
///
/// /// One token per byte.
/// struct Bytes;
///
/// impl Tokenizer for Bytes {
///     fn encode(&self, text: &str) -> Result<Vec<TokenId>, BoxError> {
///         Ok(text.bytes().map(TokenId::from).collect())
///     }
///     fn decode(&self, tokens: &[TokenId]) -> Result<String, BoxError> {
///         let bytes: Vec<u8> = tokens.iter().map(|&t| t as u8).collect();
///         Ok(String::from_utf8(bytes)?)
///     }
///     fn max_tokens(&self) -> usize {
///         64
///     }
/// }
///
/// let chunker = SourceChunker::new(Bytes, ChunkSettings::default()).unwrap();
/// let chunks = chunker.chunk_text("Sentence one. Sentence two.").unwrap();
///
/// assert_eq!(chunks.len(), 1);
/// assert_eq!(chunks[0].text, "Sentence one.Sentence two.");
/// assert_eq!(chunks[0].before, "");
/// ```
#[derive(Debug, Clone)]
pub struct SourceChunker<T> {
    tokenizer: T,
    mode: UnitMode,
    budget: TokenBudget,
}

impl<T: Tokenizer> SourceChunker<T> {
    /// Create a chunker, validating `settings` against the tokenizer's budget.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidBuffer`] if either buffer is negative.
    /// - [`Error::BufferExceedsBudget`] if the buffers consume the whole
    ///   token budget.
    pub fn new(tokenizer: T, settings: ChunkSettings) -> Result<Self> {
        let buffer_before = non_negative("buffer_before", settings.buffer_before)?;
        let buffer_after = non_negative("buffer_after", settings.buffer_after)?;
        let max_tokens = settings.effective_max_tokens(tokenizer.max_tokens());
        let budget = TokenBudget::new(max_tokens, buffer_before, buffer_after)?;

        Ok(Self {
            tokenizer,
            mode: settings.unit_mode(),
            budget,
        })
    }

    /// The tokenizer this chunker encodes and decodes with.
    #[must_use]
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }

    /// The validated token budget.
    #[must_use]
    pub fn budget(&self) -> TokenBudget {
        self.budget
    }

    /// How text is segmented into units.
    #[must_use]
    pub fn unit_mode(&self) -> UnitMode {
        self.mode
    }

    /// Split `text` into chunks.
    ///
    /// See the [module docs](self) for how slices and accumulated chunks
    /// interleave. Empty text, or text with no non-blank units, yields no chunks.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Tokenization`] if the tokenizer fails. Chunking of
    /// the document stops at the first failure.
    pub fn chunk_text(&self, text: &str) -> Result<Vec<SourceChunk>> {
        if text.is_empty() {
            return Ok(Vec::new());
        }

        let units = segment(text, self.mode);
        let max = self.budget.buffered_max_tokens();
        let mut chunks = Vec::new();
        let mut current: Vec<TokenId> = Vec::new();
        // Units whose tokens are in `current`, for error context
        let mut pending: Vec<&str> = Vec::new();

        for &unit in &units {
            let unit_tokens = self.encode(unit)?;

            if !self.budget.fits(unit_tokens.len()) {
                tracing::debug!(
                    tokens = unit_tokens.len(),
                    max,
                    "hard-slicing oversized unit"
                );
                self.push_slices(&unit_tokens, unit, &mut chunks)?;
            } else if !self.budget.would_overflow(current.len(), unit_tokens.len()) {
                current.extend(unit_tokens);
                pending.push(unit);
            } else {
                chunks.push(self.accumulated(&current, &pending)?);
                current = unit_tokens;
                pending.clear();
                pending.push(unit);
            }
        }

        if !current.is_empty() {
            chunks.push(self.accumulated(&current, &pending)?);
        }

        tracing::debug!(
            units = units.len(),
            chunks = chunks.len(),
            "chunked text"
        );
        Ok(chunks)
    }

    fn push_slices(
        &self,
        tokens: &[TokenId],
        unit: &str,
        chunks: &mut Vec<SourceChunk>,
    ) -> Result<()> {
        let slices = slice_tokens(
            tokens,
            self.budget.buffered_max_tokens(),
            self.budget.buffer_before(),
            self.budget.buffer_after(),
        );

        for slice in slices {
            chunks.push(SourceChunk {
                text: self.decode(slice.tokens, &[unit])?,
                before: self.decode(slice.before, &[unit])?,
                after: self.decode(slice.after, &[unit])?,
            });
        }
        Ok(())
    }

    fn accumulated(&self, tokens: &[TokenId], context: &[&str]) -> Result<SourceChunk> {
        Ok(SourceChunk::new(self.decode(tokens, context)?))
    }

    fn encode(&self, unit: &str) -> Result<Vec<TokenId>> {
        self.tokenizer
            .encode(unit)
            .map_err(|source| Error::Tokenization {
                unit: truncate(unit),
                source,
            })
    }

    /// `context` names the units the tokens came from.
    fn decode(&self, tokens: &[TokenId], context: &[&str]) -> Result<String> {
        if tokens.is_empty() {
            return Ok(String::new());
        }
        self.tokenizer
            .decode(tokens)
            .map_err(|source| Error::Tokenization {
                unit: truncate(&context.join(" ")),
                source,
            })
    }
}

fn non_negative(name: &'static str, value: i64) -> Result<usize> {
    usize::try_from(value).map_err(|_| Error::InvalidBuffer { name, value })
}

fn truncate(unit: &str) -> String {
    let mut graphemes = unit.graphemes(true);
    let head: String = graphemes.by_ref().take(DIAGNOSTIC_GRAPHEMES).collect();
    if graphemes.next().is_some() {
        format!("{head}…")
    } else {
        head
    }
}
