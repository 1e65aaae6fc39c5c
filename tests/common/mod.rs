//! Shared test doubles: a word-level tokenizer/embedder and a failing store.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use parcels::{BoxError, ChunkRecord, ChunkStore, Embedder, ScoredRecord, TokenId, Tokenizer};

/// Embedding dimension of [`Vocab`].
pub const DIMS: usize = 16;

/// Whitespace word tokenizer with a growing vocabulary.
///
/// `decode` joins words with single spaces, so round trips normalize
/// whitespace but keep every word.
pub struct Vocab {
    max_tokens: usize,
    words: Mutex<(HashMap<String, TokenId>, Vec<String>)>,
}

impl Vocab {
    pub fn new(max_tokens: usize) -> Self {
        Self {
            max_tokens,
            words: Mutex::new((HashMap::new(), Vec::new())),
        }
    }

    /// Token count of `text`, for budget assertions.
    pub fn count(&self, text: &str) -> usize {
        self.encode(text).unwrap().len()
    }
}

impl Tokenizer for Vocab {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, BoxError> {
        let mut guard = self.words.lock().map_err(|_| "vocab lock poisoned")?;
        let (ids, words) = &mut *guard;
        Ok(text
            .split_whitespace()
            .map(|word| {
                *ids.entry(word.to_string()).or_insert_with(|| {
                    words.push(word.to_string());
                    (words.len() - 1) as TokenId
                })
            })
            .collect())
    }

    fn decode(&self, tokens: &[TokenId]) -> Result<String, BoxError> {
        let guard = self.words.lock().map_err(|_| "vocab lock poisoned")?;
        let words = &guard.1;
        let decoded: Option<Vec<&str>> = tokens
            .iter()
            .map(|&t| words.get(t as usize).map(String::as_str))
            .collect();
        Ok(decoded.ok_or("unknown token")?.join(" "))
    }

    fn max_tokens(&self) -> usize {
        self.max_tokens
    }
}

impl Embedder for Vocab {
    /// Bag of words folded into [`DIMS`] buckets.
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
        texts
            .iter()
            .map(|text| -> Result<Vec<f32>, BoxError> {
                let mut vector = vec![0.0f32; DIMS];
                for token in self.encode(text)? {
                    vector[token as usize % DIMS] += 1.0;
                }
                Ok(vector)
            })
            .collect()
    }
}

/// A store whose every call fails.
pub struct BrokenStore;

impl ChunkStore for BrokenStore {
    fn get(&self, _ids: &[&str]) -> Result<HashMap<String, ChunkRecord>, BoxError> {
        Err("connection refused".into())
    }

    fn add(&self, _record: ChunkRecord, _embedding: Vec<f32>) -> Result<(), BoxError> {
        Err("connection refused".into())
    }

    fn delete(&self, _id: &str) -> Result<bool, BoxError> {
        Err("connection refused".into())
    }

    fn query(&self, _vector: &[f32], _n_results: usize) -> Result<Vec<ScoredRecord>, BoxError> {
        Err("connection refused".into())
    }
}

/// `Word1 Word2 … WordN`.
pub fn words(n: usize) -> String {
    (1..=n)
        .map(|i| format!("Word{i}"))
        .collect::<Vec<_>>()
        .join(" ")
}
