//! `docqa`: index documents and ask grounded questions about them.

mod settings;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use docqa_rag::{DocumentId, QueryOutcome, extract_pdf_file, validate_pdf};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::settings::Settings;

/// Ask questions about a single document, answered only from its own content.
#[derive(Parser)]
#[command(name = "docqa", version, about)]
struct Cli {
    #[command(flatten)]
    settings: Settings,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Extract, chunk and embed a document, replacing any previous index.
    ///
    /// PDF files are extracted page by page; anything else is read as UTF-8 text.
    Ingest {
        /// Document ID.
        id: DocumentId,
        /// Path to a PDF or text file.
        path: PathBuf,
    },

    /// Ask a question about an indexed document.
    Ask {
        /// Document ID.
        id: DocumentId,
        /// The question.
        question: String,
        /// Print the full outcome as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Delete a document's index.
    Delete {
        /// Document ID.
        id: DocumentId,
    },

    /// Show whether a document is indexed.
    Status {
        /// Document ID.
        id: DocumentId,
    },

    /// Check that a file is a readable PDF and print its page count.
    Validate {
        /// Path to a PDF file.
        path: PathBuf,
    },
}

fn is_pdf(path: &Path, bytes: &[u8]) -> bool {
    bytes.starts_with(b"%PDF")
        || path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

async fn load_text(path: &Path) -> Result<String> {
    let bytes = tokio::fs::read(path).await.with_context(|| format!("reading {}", path.display()))?;
    if is_pdf(path, &bytes) {
        let extracted = extract_pdf_file(path).await?;
        info!(path = %path.display(), page_count = extracted.page_count, "extracted PDF text");
        return Ok(extracted.text);
    }
    String::from_utf8(bytes).with_context(|| format!("{} is neither a PDF nor UTF-8 text", path.display()))
}

fn print_outcome(outcome: &QueryOutcome, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(outcome)?);
        return Ok(());
    }
    println!("{}", outcome.answer_text());
    if !outcome.sources().is_empty() {
        println!("\nSources: {}", outcome.sources().join(", "));
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Validate { path } => {
            let bytes = tokio::fs::read(&path).await.with_context(|| format!("reading {}", path.display()))?;
            let pages = validate_pdf(&bytes)?;
            println!("{}: valid PDF, {pages} pages", path.display());
        }
        Command::Ingest { id, path } => {
            let text = load_text(&path).await?;
            let qa = cli.settings.document_qa().await?;
            let index = qa.try_ingest(id, &text).await.with_context(|| format!("indexing document {id}"))?;
            println!("Indexed document {id}: {} chunks ({})", index.len(), index.model);
        }
        Command::Ask { id, question, json } => {
            let qa = cli.settings.document_qa().await?;
            let outcome = qa.answer(id, &question).await;
            print_outcome(&outcome, json)?;
            if !outcome.is_success() {
                std::process::exit(1);
            }
        }
        Command::Delete { id } => {
            let qa = cli.settings.document_qa().await?;
            if qa.delete(id).await {
                println!("Deleted index of document {id}");
            } else if qa.is_indexed(id).await {
                bail!("failed to delete index of document {id}");
            } else {
                println!("Document {id} was not indexed");
            }
        }
        Command::Status { id } => {
            let qa = cli.settings.document_qa().await?;
            let status = qa.status(id).await;
            println!("Document {id}: {}", serde_json::to_value(status)?.as_str().unwrap_or("unknown"));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pdf_detection_uses_magic_or_extension() {
        assert!(is_pdf(Path::new("notes.bin"), b"%PDF-1.7\n..."));
        assert!(is_pdf(Path::new("Report.PDF"), b""));
        assert!(!is_pdf(Path::new("notes.txt"), b"plain text"));
    }

    #[tokio::test]
    async fn text_files_are_read_verbatim() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("notes.txt");
        std::fs::write(&path, "Paris is the capital of France.").unwrap();
        assert_eq!(load_text(&path).await.unwrap(), "Paris is the capital of France.");
    }

    #[test]
    fn cli_parses_subcommands() {
        let cli = Cli::try_parse_from(["docqa", "ask", "7", "What is this?", "--json"]).unwrap();
        assert!(matches!(cli.command, Command::Ask { id: 7, json: true, .. }));
    }
}
