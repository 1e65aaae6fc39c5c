//! Token budget arithmetic.
//!
//! ## The Problem
//!
//! An embedding model accepts at most `max_tokens` tokens. Each chunk also
//! carries context buffers, borrowed from its neighbours, that are meant to
//! travel with it to the model:
//!
//! ```text
//! max_tokens = 512, buffer_before = 10, buffer_after = 10
//!
//! ┌──────────┬──────────────────────────────────┬──────────┐
//! │ before 10│        chunk text ≤ 492          │ after 10 │
//! └──────────┴──────────────────────────────────┴──────────┘
//! ```
//!
//! So the chunk text itself only gets what the buffers leave over:
//! `buffered_max_tokens = max_tokens - buffer_before - buffer_after`.
//! A budget where the buffers eat everything is rejected up front.

use crate::{Error, Result};

/// Validated token budget for a chunker.
///
/// # Examples
///
/// ```rust
/// use parcels::TokenBudget;
///
/// let budget = TokenBudget::new(50, 2, 2).unwrap();
/// assert_eq!(budget.buffered_max_tokens(), 46);
/// assert!(budget.fits(46));
/// assert!(!budget.fits(47));
///
/// // Buffers that consume the whole budget are a configuration error
/// assert!(TokenBudget::new(20, 10, 10).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenBudget {
    max_tokens: usize,
    buffer_before: usize,
    buffer_after: usize,
}

impl TokenBudget {
    /// Build a budget, failing if the buffers leave no room for text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::BufferExceedsBudget`] if
    /// `buffer_before + buffer_after >= max_tokens`.
    pub fn new(max_tokens: usize, buffer_before: usize, buffer_after: usize) -> Result<Self> {
        let required = buffer_before.saturating_add(buffer_after);
        if required >= max_tokens {
            return Err(Error::BufferExceedsBudget {
                required,
                available: max_tokens,
            });
        }
        Ok(Self {
            max_tokens,
            buffer_before,
            buffer_after,
        })
    }

    /// The model's total token budget.
    #[must_use]
    pub const fn max_tokens(&self) -> usize {
        self.max_tokens
    }

    /// Tokens of preceding context attached to hard-sliced chunks.
    #[must_use]
    pub const fn buffer_before(&self) -> usize {
        self.buffer_before
    }

    /// Tokens of following context attached to hard-sliced chunks.
    #[must_use]
    pub const fn buffer_after(&self) -> usize {
        self.buffer_after
    }

    /// Tokens available to chunk text once buffers are reserved. Always > 0.
    #[must_use]
    pub const fn buffered_max_tokens(&self) -> usize {
        self.max_tokens - self.buffer_before - self.buffer_after
    }

    /// Whether a unit of `len` tokens fits a chunk on its own (inclusive).
    #[must_use]
    pub const fn fits(&self, len: usize) -> bool {
        len <= self.buffered_max_tokens()
    }

    /// Check if adding `additional` tokens to `current` would exceed the budget.
    #[must_use]
    pub fn would_overflow(&self, current: usize, additional: usize) -> bool {
        current.saturating_add(additional) > self.buffered_max_tokens()
    }
}
