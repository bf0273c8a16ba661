//! Property tests for chunk overlap, reconstruction and count.

use docqa_rag::chunking::{BoundaryChunker, Chunker, FixedSizeChunker};
use proptest::prelude::*;

/// Text with words, line breaks, paragraph breaks and some multibyte chars.
fn arb_text() -> impl Strategy<Value = String> {
    proptest::collection::vec(
        prop_oneof![
            4 => "[a-zé]{1,9}",
            3 => Just(" ".to_string()),
            1 => Just("\n".to_string()),
            1 => Just("\n\n".to_string()),
            1 => Just("日本".to_string()),
        ],
        0..200,
    )
    .prop_map(|parts| parts.concat())
}

/// Chunk size and an overlap strictly below it.
fn arb_sizes() -> impl Strategy<Value = (usize, usize)> {
    (1usize..60).prop_flat_map(|size| (Just(size), 0..size))
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

fn prefix(s: &str, n: usize) -> String {
    s.chars().take(n).collect()
}

fn suffix(s: &str, n: usize) -> String {
    let len = char_len(s);
    s.chars().skip(len.saturating_sub(n)).collect()
}

fn reconstruct(chunks: &[String], overlap: usize) -> String {
    let mut text = String::new();
    for (i, chunk) in chunks.iter().enumerate() {
        if i == 0 {
            text.push_str(chunk);
        } else {
            text.extend(chunk.chars().skip(overlap));
        }
    }
    text
}

fn check_invariants(chunks: &[String], text: &str, size: usize, overlap: usize) -> Result<(), TestCaseError> {
    prop_assert_eq!(chunks.is_empty(), text.is_empty());
    for chunk in chunks {
        prop_assert!(char_len(chunk) <= size);
    }
    for pair in chunks.windows(2) {
        prop_assert_eq!(suffix(&pair[0], overlap), prefix(&pair[1], overlap));
    }
    prop_assert_eq!(reconstruct(chunks, overlap), text);
    Ok(())
}

/// *For any* text and valid sizes, consecutive chunks share exactly
/// `overlap` characters, no chunk exceeds `chunk_size`, and stripping the
/// overlaps reconstructs the text.
mod prop_chunk_invariants {
    use super::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn fixed_size_windows(text in arb_text(), (size, overlap) in arb_sizes()) {
            let chunks = FixedSizeChunker::new(size, overlap).split(&text);
            check_invariants(&chunks, &text, size, overlap)?;
        }

        #[test]
        fn boundary_windows(text in arb_text(), (size, overlap) in arb_sizes()) {
            let chunks = BoundaryChunker::new(size, overlap).split(&text);
            check_invariants(&chunks, &text, size, overlap)?;
        }

        #[test]
        fn fixed_size_count_matches_formula(text in arb_text(), (size, overlap) in arb_sizes()) {
            prop_assume!(!text.is_empty());
            let len = char_len(&text);
            let step = size - overlap;
            let expected = len.saturating_sub(overlap).div_ceil(step).max(1);
            prop_assert_eq!(FixedSizeChunker::new(size, overlap).split(&text).len(), expected);
        }
    }
}

#[test]
fn default_sizes_split_long_text_at_paragraphs() {
    let paragraph = "word ".repeat(150);
    let text = format!("{}\n\n{}\n\n{}", paragraph.trim(), paragraph.trim(), paragraph.trim());
    let chunks = BoundaryChunker::new(1000, 200).split(&text);

    assert_eq!(chunks.len(), 3);
    assert!(chunks[0].ends_with("\n\n"));
    assert!(chunks.iter().all(|c| char_len(c) <= 1000));
}

#[test]
fn short_text_is_a_single_chunk() {
    let text = "Paris is the capital of France.";
    assert_eq!(BoundaryChunker::new(1000, 200).split(text), vec![text.to_string()]);
}
