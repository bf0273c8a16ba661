//! Document chunking strategies.
//!
//! This module provides the [`Chunker`] trait and two implementations:
//!
//! - [`FixedSizeChunker`]: hard character windows with configurable overlap
//! - [`BoundaryChunker`]: the same windows, but each chunk prefers to end at
//!   a paragraph break, a line break, or whitespace near the target length
//!
//! Both strategies measure sizes in characters (Unicode scalar values), never
//! cut inside a UTF-8 sequence, and guarantee that consecutive chunks share
//! exactly `chunk_overlap` characters. Concatenating the first chunk with
//! every following chunk minus its first `chunk_overlap` characters yields
//! the original text.

use crate::config::RagConfig;
use crate::error::{RagError, Result};

/// A strategy for splitting extracted document text into chunks.
///
/// Returns an empty `Vec` for empty text and at least one chunk for any
/// non-empty text.
pub trait Chunker: Send + Sync {
    /// Split text into ordered, overlapping chunks.
    fn split(&self, text: &str) -> Vec<String>;
}

/// Split `text` with the default [`BoundaryChunker`] strategy.
pub fn split(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    BoundaryChunker::new(chunk_size, chunk_overlap).split(text)
}

/// Splits text into fixed-size character windows with overlap.
///
/// Each window starts `chunk_size - chunk_overlap` characters after the
/// previous one. The final chunk may be shorter than `chunk_size`.
///
/// # Example
///
/// ```rust
/// use docqa_rag::{Chunker, FixedSizeChunker};
///
/// let chunks = FixedSizeChunker::new(4, 1).split("abcdefghij");
/// assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);
/// ```
#[derive(Debug, Clone)]
pub struct FixedSizeChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl FixedSizeChunker {
    /// Create a new `FixedSizeChunker`.
    ///
    /// An overlap that is not below `chunk_size` is clamped to
    /// `chunk_size - 1`; use [`FixedSizeChunker::from_config`] to reject it.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Create a chunker from a validated configuration.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        check_sizes(config.chunk_size, config.chunk_overlap)?;
        Ok(Self::new(config.chunk_size, config.chunk_overlap))
    }
}

impl Chunker for FixedSizeChunker {
    fn split(&self, text: &str) -> Vec<String> {
        split_windows(text, self.chunk_size, self.chunk_overlap, false)
    }
}

/// Splits text into overlapping windows that prefer natural break points.
///
/// When a window would end inside the text, the chunk ends right after the
/// last paragraph break (`\n\n`) in the final quarter of the window, or
/// failing that the last line break, or failing that the last whitespace
/// character. If none exists the window is cut at exactly `chunk_size`
/// characters. The next chunk starts `chunk_overlap` characters before the
/// end of the previous one.
///
/// # Example
///
/// ```rust
/// use docqa_rag::{BoundaryChunker, Chunker};
///
/// let chunks = BoundaryChunker::new(12, 3).split("alpha beta gamma delta");
/// assert_eq!(chunks[0], "alpha beta ");
/// ```
#[derive(Debug, Clone)]
pub struct BoundaryChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl BoundaryChunker {
    /// Create a new `BoundaryChunker`.
    ///
    /// An overlap that is not below `chunk_size` is clamped to
    /// `chunk_size - 1`; use [`BoundaryChunker::from_config`] to reject it.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }

    /// Create a chunker from a validated configuration.
    pub fn from_config(config: &RagConfig) -> Result<Self> {
        check_sizes(config.chunk_size, config.chunk_overlap)?;
        Ok(Self::new(config.chunk_size, config.chunk_overlap))
    }
}

impl Chunker for BoundaryChunker {
    fn split(&self, text: &str) -> Vec<String> {
        split_windows(text, self.chunk_size, self.chunk_overlap, true)
    }
}

fn check_sizes(chunk_size: usize, chunk_overlap: usize) -> Result<()> {
    if chunk_size == 0 {
        return Err(RagError::ChunkingError("chunk_size must be greater than zero".to_string()));
    }
    if chunk_overlap >= chunk_size {
        return Err(RagError::ChunkingError(format!(
            "chunk_overlap ({chunk_overlap}) must be less than chunk_size ({chunk_size})"
        )));
    }
    Ok(())
}

fn split_windows(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    prefer_boundaries: bool,
) -> Vec<String> {
    if text.is_empty() || chunk_size == 0 {
        return Vec::new();
    }
    let overlap = chunk_overlap.min(chunk_size - 1);

    // Byte offset of every char boundary, plus the end of the text.
    let offsets: Vec<usize> =
        text.char_indices().map(|(i, _)| i).chain(std::iter::once(text.len())).collect();
    let chars: Vec<char> = text.chars().collect();
    let len = chars.len();

    let mut chunks = Vec::new();
    let mut start = 0;

    loop {
        let hard_end = (start + chunk_size).min(len);
        if hard_end == len {
            chunks.push(text[offsets[start]..].to_string());
            break;
        }

        let end = if prefer_boundaries {
            find_break(&chars, start, hard_end, chunk_size, overlap)
        } else {
            hard_end
        };

        chunks.push(text[offsets[start]..offsets[end]].to_string());
        // end > start + overlap, so every step makes progress
        start = end - overlap;
    }

    chunks
}

/// Pick the chunk end in `[floor, hard_end]`, preferring paragraph breaks,
/// then line breaks, then any whitespace.
fn find_break(
    chars: &[char],
    start: usize,
    hard_end: usize,
    chunk_size: usize,
    overlap: usize,
) -> usize {
    let floor = (start + chunk_size - chunk_size / 4).max(start + overlap + 1);
    if floor > hard_end {
        return hard_end;
    }

    let paragraph = |e: usize| e >= 2 && chars[e - 1] == '\n' && chars[e - 2] == '\n';
    let line = |e: usize| chars[e - 1] == '\n';
    let space = |e: usize| chars[e - 1].is_whitespace();
    let preferences: [&dyn Fn(usize) -> bool; 3] = [&paragraph, &line, &space];

    for is_break in preferences {
        if let Some(end) = (floor..=hard_end).rev().find(|&e| is_break(e)) {
            return end;
        }
    }
    hard_end
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reconstruct(chunks: &[String], overlap: usize) -> String {
        let mut out = String::new();
        for (i, chunk) in chunks.iter().enumerate() {
            if i == 0 {
                out.push_str(chunk);
            } else {
                out.extend(chunk.chars().skip(overlap));
            }
        }
        out
    }

    #[test]
    fn empty_text_produces_no_chunks() {
        assert!(FixedSizeChunker::new(10, 2).split("").is_empty());
        assert!(BoundaryChunker::new(10, 2).split("").is_empty());
    }

    #[test]
    fn short_text_is_a_single_chunk() {
        let chunks = split("Hello, world!", 1000, 200);
        assert_eq!(chunks, vec!["Hello, world!"]);
    }

    #[test]
    fn whitespace_only_text_still_yields_a_chunk() {
        assert_eq!(split("   ", 10, 2).len(), 1);
    }

    #[test]
    fn fixed_windows_step_by_size_minus_overlap() {
        let chunks = FixedSizeChunker::new(4, 1).split("abcdefghij");
        assert_eq!(chunks, vec!["abcd", "defg", "ghij"]);

        let chunks = FixedSizeChunker::new(4, 1).split("abcdefghijk");
        assert_eq!(chunks, vec!["abcd", "defg", "ghij", "jk"]);
    }

    #[test]
    fn fixed_chunk_count_matches_formula() {
        let text = "x".repeat(1600);
        let chunks = FixedSizeChunker::new(1000, 200).split(&text);
        // ceil((1600 - 200) / 800) = 2
        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].len(), 1000);
        assert_eq!(chunks[1].len(), 800);
    }

    #[test]
    fn boundary_chunker_breaks_after_whitespace() {
        let text = "Paris is the capital of France. ".repeat(50);
        let chunks = split(&text, 1000, 200);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].ends_with(' '));
        assert!(chunks[0].chars().count() <= 1000);
        assert_eq!(reconstruct(&chunks, 200), text);
    }

    #[test]
    fn boundary_chunker_prefers_paragraphs() {
        let text = format!("{}\n\n{} tail", "a".repeat(17), "b b b");
        let chunks = BoundaryChunker::new(20, 2).split(&text);
        assert!(chunks[0].ends_with("\n\n"), "got {:?}", chunks[0]);
        assert_eq!(reconstruct(&chunks, 2), text);
    }

    #[test]
    fn boundary_chunker_falls_back_to_hard_cut() {
        let text = "y".repeat(25);
        let chunks = BoundaryChunker::new(10, 3).split(&text);
        assert_eq!(chunks[0].len(), 10);
        assert_eq!(reconstruct(&chunks, 3), text);
    }

    #[test]
    fn adjacent_chunks_share_overlap() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(20);
        let chunks = split(&text, 100, 25);
        for pair in chunks.windows(2) {
            let prev: Vec<char> = pair[0].chars().collect();
            let tail: String = prev[prev.len() - 25..].iter().collect();
            let head: String = pair[1].chars().take(25).collect();
            assert_eq!(tail, head);
        }
    }

    #[test]
    fn multibyte_text_never_splits_inside_a_char() {
        let text = "┌──────────────────┐\n│ Hello wörld  ünïcödé │\n└──────────────────┘";
        let chunks = FixedSizeChunker::new(7, 2).split(text);
        assert_eq!(reconstruct(&chunks, 2), text);
        let chunks = BoundaryChunker::new(7, 2).split(text);
        assert_eq!(reconstruct(&chunks, 2), text);
    }

    #[test]
    fn oversized_overlap_is_clamped() {
        let chunks = FixedSizeChunker::new(3, 5).split("abcdef");
        assert_eq!(chunks, vec!["abc", "bcd", "cde", "def"]);
    }

    #[test]
    fn from_config_rejects_invalid_sizes() {
        let config = RagConfig { chunk_size: 10, chunk_overlap: 10, ..RagConfig::default() };
        assert!(matches!(BoundaryChunker::from_config(&config), Err(RagError::ChunkingError(_))));
        assert!(FixedSizeChunker::from_config(&RagConfig::default()).is_ok());
    }
}
