//! Ingest a Document
//!
//! Chunk a document, store it, re-ingest it, and query it back.
//!
//! ```bash
//! cargo run --example ingest_document
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use parcels::{
    contiguous_passages, BoxError, ChunkReader, ChunkSettings, ChunkWriter, DocumentMetadata,
    Embedder, InMemoryStore, SourceChunker, TokenId, Tokenizer,
};

/// Toy word tokenizer. A real deployment plugs in its model's tokenizer.
#[derive(Default)]
struct Words {
    vocab: Mutex<(HashMap<String, TokenId>, Vec<String>)>,
}

impl Tokenizer for Words {
    fn encode(&self, text: &str) -> Result<Vec<TokenId>, BoxError> {
        let mut guard = self.vocab.lock().map_err(|_| "vocab lock poisoned")?;
        let (ids, words) = &mut *guard;
        Ok(text
            .split_whitespace()
            .map(|w| {
                *ids.entry(w.to_string()).or_insert_with(|| {
                    words.push(w.to_string());
                    (words.len() - 1) as TokenId
                })
            })
            .collect())
    }

    fn decode(&self, tokens: &[TokenId]) -> Result<String, BoxError> {
        let guard = self.vocab.lock().map_err(|_| "vocab lock poisoned")?;
        Ok(tokens
            .iter()
            .filter_map(|&t| guard.1.get(t as usize).map(String::as_str))
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn max_tokens(&self) -> usize {
        24
    }
}

impl Embedder for Words {
    fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, BoxError> {
        texts
            .iter()
            .map(|text| -> Result<Vec<f32>, BoxError> {
                let mut v = vec![0.0f32; 32];
                for t in self.encode(text)? {
                    v[t as usize % 32] += 1.0;
                }
                Ok(v)
            })
            .collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let document = "Mosses are small, non-vascular flowering plants. \
        They typically form dense green clumps or mats, often in damp or shady locations. \
        The individual plants are usually composed of simple leaves that are generally only one cell thick, \
        attached to a stem that may be branched or unbranched and has only a limited role in conducting water and nutrients. \
        Mosses do not have seeds.";

    let words = Arc::new(Words::default());
    let store = Arc::new(InMemoryStore::new());
    let settings = ChunkSettings::default().with_buffers(3, 3);
    let chunker = SourceChunker::new(words.clone(), settings)?;
    let writer = ChunkWriter::new(chunker, store.clone());

    let metadata = DocumentMetadata::new("Mosses")
        .with_author("Field Guide")
        .with_publish_date_str("2024-05-01")?;

    let chunks = writer.create_chunks_for_document(document, &metadata)?;
    println!("Document: {} chars", document.len());
    println!("Chunks: {}\n", chunks.len());
    for chunk in &chunks {
        println!("[{}] \"{}\"", chunk.id, chunk.text);
        if !chunk.metadata.before.is_empty() || !chunk.metadata.after.is_empty() {
            println!("    before: \"{}\"  after: \"{}\"", chunk.metadata.before, chunk.metadata.after);
        }
    }

    // Same text, same ids: nothing new is embedded
    writer.create_chunks_for_document(document, &metadata)?;
    println!("\nStored after re-ingest: {}", store.len());

    let reader = ChunkReader::new(words, store).with_min_similarity(0.2);
    let hits = reader.get_similar("Where do mosses grow?", Some(3))?;
    println!("\nTop hits:");
    for hit in &hits {
        println!("  {:.3}  {}", hit.score, hit.chunk.id);
    }
    for passage in contiguous_passages(&hits) {
        println!("\nPassage: {passage}");
    }

    Ok(())
}
