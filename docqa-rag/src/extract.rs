//! PDF text extraction.
//!
//! Available with the `pdf` feature (enabled by default). Text is extracted
//! page by page with `lopdf`; each page with text contributes a
//! `--- Page n ---` marker followed by its text, so chunk text keeps a hint of
//! where it came from.

use std::path::Path;

use lopdf::Document;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::{RagError, Result};

/// Text extracted from a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedText {
    /// Page-marked text, trimmed.
    pub text: String,
    /// Number of pages in the document, including pages without text.
    pub page_count: usize,
}

fn load(bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(|e| RagError::ExtractionError(format!("invalid PDF: {e}")))
}

/// Check that `bytes` parse as a PDF and return its page count.
///
/// # Errors
///
/// Returns [`RagError::ExtractionError`] if the bytes are not a readable PDF.
pub fn validate_pdf(bytes: &[u8]) -> Result<usize> {
    Ok(load(bytes)?.get_pages().len())
}

/// Extract the text of every page of a PDF.
///
/// Pages whose text cannot be extracted are skipped with a warning. A PDF
/// without any extractable text (for example a scanned image) yields an empty
/// `text`, which indexing then rejects.
///
/// # Errors
///
/// Returns [`RagError::ExtractionError`] if the bytes are not a readable PDF.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<ExtractedText> {
    let document = load(bytes)?;
    let pages = document.get_pages();

    let mut text = String::new();
    for &page_number in pages.keys() {
        match document.extract_text(&[page_number]) {
            Ok(page_text) if !page_text.trim().is_empty() => {
                text.push_str(&format!("\n--- Page {page_number} ---\n"));
                text.push_str(&page_text);
            }
            Ok(_) => debug!(page = page_number, "page has no text"),
            Err(e) => warn!(page = page_number, error = %e, "could not extract text from page"),
        }
    }

    Ok(ExtractedText { text: text.trim().to_string(), page_count: pages.len() })
}

/// Read a PDF from disk and extract its text on the blocking thread pool.
///
/// # Errors
///
/// Returns [`RagError::ExtractionError`] if the file cannot be read or is not
/// a readable PDF.
pub async fn extract_pdf_file(path: impl AsRef<Path>) -> Result<ExtractedText> {
    let path = path.as_ref();
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|e| RagError::ExtractionError(format!("failed to read {}: {e}", path.display())))?;

    tokio::task::spawn_blocking(move || extract_pdf_text(&bytes))
        .await
        .map_err(|e| RagError::ExtractionError(format!("extraction task failed: {e}")))?
}
