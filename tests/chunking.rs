//! End-to-end chunking scenarios.
//!
//! These tests run the chunker against a word-level tokenizer and check
//! coverage, ordering, buffers, and the token budget.

mod common;

use common::{words, Vocab};
use parcels::{ChunkSettings, SourceChunk, SourceChunker};

fn chunker(max_tokens: usize, settings: ChunkSettings) -> SourceChunker<Vocab> {
    SourceChunker::new(Vocab::new(max_tokens), settings).unwrap()
}

/// Every input word appears exactly once, in order, across chunk texts.
///
/// Only holds when accumulated and sliced chunks do not interleave.
fn covers_input(chunks: &[SourceChunk], text: &str) -> bool {
    let emitted: Vec<&str> = chunks
        .iter()
        .flat_map(|c| c.text.split_whitespace())
        .collect();
    let expected: Vec<&str> = text.split_whitespace().collect();
    emitted == expected
}

/// Every input word appears exactly once across chunk texts, in any order.
fn covers_words(chunks: &[SourceChunk], text: &str) -> bool {
    let mut emitted: Vec<&str> = chunks
        .iter()
        .flat_map(|c| c.text.split_whitespace())
        .collect();
    let mut expected: Vec<&str> = text.split_whitespace().collect();
    emitted.sort_unstable();
    expected.sort_unstable();
    emitted == expected
}

// =============================================================================
// Accumulation
// =============================================================================

#[test]
fn two_short_sentences_make_one_chunk() {
    let chunker = chunker(100, ChunkSettings::default());
    let chunks = chunker.chunk_text("Sentence one. Sentence two.").unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Sentence one. Sentence two.");
    assert_eq!(chunks[0].before, "");
    assert_eq!(chunks[0].after, "");
}

#[test]
fn short_paragraphs_make_one_chunk() {
    let settings = ChunkSettings::default().with_paragraphs(true);
    let chunker = chunker(100, settings);
    let chunks = chunker.chunk_text("Paragraph 1.\n\nParagraph 2.").unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Paragraph 1. Paragraph 2.");
}

#[test]
fn no_preservation_keeps_short_text_whole() {
    let settings = ChunkSettings::default().with_sentences(false);
    let chunker = chunker(100, settings);
    let chunks = chunker.chunk_text("Word1 Word2 Word3").unwrap();

    assert_eq!(chunks.len(), 1);
    assert_eq!(chunks[0].text, "Word1 Word2 Word3");
}

#[test]
fn sentences_accumulate_until_budget() {
    // buffered max = 30 - 5 - 5 = 20; each sentence is 8 words
    let sentence = "one two three four five six seven eight.";
    let text = vec![sentence; 5].join(" ");
    let chunker = chunker(30, ChunkSettings::default().with_buffers(5, 5));
    let chunks = chunker.chunk_text(&text).unwrap();

    // Two sentences (16 tokens) fit, a third would make 24
    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text.split_whitespace().count(), 16);
    assert_eq!(chunks[2].text.split_whitespace().count(), 8);
    assert!(chunks.iter().all(|c| !c.has_buffers()));
    assert!(covers_input(&chunks, &text));
}

// =============================================================================
// Hard slicing
// =============================================================================

#[test]
fn oversized_sentences_are_sliced_with_buffers() {
    // buffered max = 50 - 10 - 10 = 30; each sentence is 75 words → 30, 30, 15
    let sentence = format!("{}.", words(75));
    let text = vec![sentence.as_str(); 100].join(" ");
    let vocab = Vocab::new(50);
    let chunker = SourceChunker::new(&vocab, ChunkSettings::default()).unwrap();
    let chunks = chunker.chunk_text(&text).unwrap();

    assert_eq!(chunks.len(), 300);
    for unit in chunks.chunks(3) {
        assert_eq!(unit[0].before, "");
        assert_eq!(unit[0].after, "Word31 Word32 Word33 Word34 Word35 Word36 Word37 Word38 Word39 Word40");
        assert_eq!(unit[1].before, "Word21 Word22 Word23 Word24 Word25 Word26 Word27 Word28 Word29 Word30");
        assert!(!unit[1].after.is_empty());
        assert!(!unit[2].before.is_empty());
        assert_eq!(unit[2].after, "");
    }
    for chunk in &chunks {
        assert!(vocab.count(&chunk.text) <= 30);
    }
    assert!(covers_input(&chunks, &text));
}

#[test]
fn long_paragraphs_split_into_many_chunks() {
    let paragraph = "This is a very long paragraph. ".repeat(100);
    let text = format!("{paragraph}\n\n{paragraph}");
    let settings = ChunkSettings::default().with_paragraphs(true);
    let chunker = chunker(50, settings);
    let chunks = chunker.chunk_text(&text).unwrap();

    assert!(chunks.len() > 2);
    assert!(covers_input(&chunks, &text));
}

#[test]
fn buffers_never_leak_into_chunk_text() {
    let text = words(120);
    let chunker = chunker(50, ChunkSettings::default().with_buffers(2, 2));
    let chunks = chunker.chunk_text(&text).unwrap();

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, words(46));
    assert_eq!(chunks[0].after, "Word47 Word48");
    assert_eq!(chunks[1].before, "Word45 Word46");
    assert_eq!(chunks[1].after, "Word93 Word94");
    assert!(covers_input(&chunks, &text));
}

// =============================================================================
// Ordering and determinism
// =============================================================================

#[test]
fn small_units_accumulate_across_an_oversized_unit() {
    // buffered max = 26: the 40-word sentence is sliced 26 + 14, the short
    // sentences on either side share the running chunk
    let text = format!("Short opener. {}. Short closer.", words(40));
    let chunker = chunker(30, ChunkSettings::default().with_buffers(2, 2));
    let chunks = chunker.chunk_text(&text).unwrap();

    assert_eq!(chunks.len(), 3);
    assert_eq!(chunks[0].text, words(26));
    assert_eq!(chunks[0].after, "Word27 Word28");
    assert_eq!(chunks[1].text.split_whitespace().count(), 14);
    assert_eq!(chunks[1].before, "Word25 Word26");
    assert_eq!(chunks[2].text, "Short opener. Short closer.");
    assert!(!chunks[2].has_buffers());
    assert!(covers_words(&chunks, &text));
}

#[test]
fn oversized_unit_between_overflowing_units() {
    // buffered max = 6: the opener fills the running chunk, the closer
    // overflows it, so the opener is flushed after the slices
    let text = format!("a b c d e. {}. f g h i j.", words(8));
    let chunker = chunker(10, ChunkSettings::default().with_buffers(2, 2));
    let texts: Vec<String> = chunker
        .chunk_text(&text)
        .unwrap()
        .into_iter()
        .map(|c| c.text)
        .collect();

    assert_eq!(
        texts,
        vec![
            words(6),
            "Word7 Word8.".to_string(),
            "a b c d e.".to_string(),
            "f g h i j.".to_string(),
        ]
    );
}

#[test]
fn rechunking_is_idempotent() {
    let text = format!("{} {}. Tail sentence here.", "Intro sentence.", words(70));
    let chunker = chunker(40, ChunkSettings::default().with_buffers(3, 3));

    let first = chunker.chunk_text(&text).unwrap();
    let second = chunker.chunk_text(&text).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_and_blank_input() {
    let chunker = chunker(40, ChunkSettings::default());
    assert!(chunker.chunk_text("").unwrap().is_empty());
    assert!(chunker.chunk_text("   \n\n  ").unwrap().is_empty());
}
