//! The tokenizer and embedding capability the chunker is built on.
//!
//! Parcels never tokenizes or embeds text itself. Callers plug in a
//! provider (a `tiktoken`-style BPE, a HuggingFace tokenizer, a remote
//! embedding API) by implementing [`Tokenizer`] and, for ingestion,
//! [`Embedder`]. One implementation per provider, picked when the chunker
//! is built:
//!
//! ```text
//! SourceChunker<OpenAiAdapter>      SourceChunker<HfAdapter>
//!          │                                 │
//!          └──── encode / decode / max_tokens ┘
//! ```
//!
//! ## Contract
//!
//! - `encode` is deterministic for a fixed model version.
//! - `decode(encode(s)) == s` for text the tokenizer was given. The chunker
//!   assumes this and does not re-check it.
//! - `embed` returns exactly one vector per input, in input order.

use std::sync::Arc;

/// An opaque token identifier.
pub type TokenId = u32;

/// Boxed error raised by a provider or store.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Text ⇄ token conversion for a single model.
pub trait Tokenizer: Send + Sync {
    /// Split text into an ordered sequence of tokens.
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, BoxError>;

    /// Turn tokens produced by [`encode`](Self::encode) back into text.
    fn decode(&self, tokens: &[TokenId]) -> Result<String, BoxError>;

    /// The model's context window, in tokens.
    fn max_tokens(&self) -> usize;
}

/// A tokenizer that can also produce embedding vectors.
pub trait Embedder: Tokenizer {
    /// Embed each text, returning one vector per input in the same order.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, BoxError> {
        (**self).encode(text)
    }

    fn decode(&self, tokens: &[TokenId]) -> Result<String, BoxError> {
        (**self).decode(tokens)
    }

    fn max_tokens(&self) -> usize {
        (**self).max_tokens()
    }
}

impl<T: Embedder + ?Sized> Embedder for &T {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
        (**self).embed(texts)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Arc<T> {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, BoxError> {
        (**self).encode(text)
    }

    fn decode(&self, tokens: &[TokenId]) -> Result<String, BoxError> {
        (**self).decode(tokens)
    }

    fn max_tokens(&self) -> usize {
        (**self).max_tokens()
    }
}

impl<T: Embedder + ?Sized> Embedder for Arc<T> {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
        (**self).embed(texts)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, BoxError> {
        (**self).encode(text)
    }

    fn decode(&self, tokens: &[TokenId]) -> Result<String, BoxError> {
        (**self).decode(tokens)
    }

    fn max_tokens(&self) -> usize {
        (**self).max_tokens()
    }
}

impl<T: Embedder + ?Sized> Embedder for Box<T> {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
        (**self).embed(texts)
    }
}
