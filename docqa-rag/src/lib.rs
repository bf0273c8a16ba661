//! # docqa-rag
//!
//! Per-document retrieval-augmented question answering.
//!
//! Each uploaded document gets its own isolated index: its extracted text is
//! split into overlapping chunks, every chunk is embedded, and the vectors are
//! persisted as one [`DocumentIndex`]. A question about the document embeds
//! the question, ranks that document's chunks by cosine similarity, and asks
//! a language model to answer from the top chunks only, citing them as
//! `"Chunk 1"`, `"Chunk 2"`, ...
//!
//! ## Components
//!
//! - [`Chunker`]: [`BoundaryChunker`] (default) and [`FixedSizeChunker`]
//! - [`IndexStore`]: build, retrieve, delete over a [`VectorStore`]
//!   ([`InMemoryVectorStore`], [`FileVectorStore`])
//! - [`QueryAnswerer`]: grounded answers returned as a [`QueryOutcome`]
//! - [`DocumentQa`]: the facade wiring everything together
//!
//! ## Features
//!
//! | Feature | Adds |
//! |---------|------|
//! | `pdf` (default) | [`extract_pdf_text`], [`validate_pdf`] via `lopdf` |
//! | `openai` | [`openai::OpenAIEmbeddingProvider`] |
//! | `groq` | [`groq::GroqCompletionProvider`] |
//! | `fastembed` | [`fastembed::FastEmbedProvider`], local `all-MiniLM-L6-v2` |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use docqa_rag::{DocumentQa, FileVectorStore, HashingEmbedder, RagConfig};
//! use docqa_rag::groq::GroqCompletionProvider;
//!
//! let qa = DocumentQa::builder()
//!     .config(RagConfig::default())
//!     .embedding_provider(Arc::new(HashingEmbedder::default()))
//!     .completion_provider(Arc::new(GroqCompletionProvider::from_env()?))
//!     .vector_store(Arc::new(FileVectorStore::new("chroma_db")))
//!     .build()?;
//!
//! qa.ingest(1, "Paris is the capital of France.").await;
//! let outcome = qa.answer(1, "What is the capital of France?").await;
//! ```

pub mod answer;
pub mod chunking;
pub mod completion;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod filestore;
pub mod hashing;
pub mod index;
pub mod inmemory;
pub mod pipeline;
pub mod prompt;
pub mod vectorstore;

#[cfg(feature = "pdf")]
pub mod extract;

#[cfg(any(feature = "openai", feature = "groq"))]
mod http;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(feature = "groq")]
pub mod groq;

#[cfg(feature = "fastembed")]
pub mod fastembed;

pub use answer::{NOT_INDEXED_REASON, QueryAnswerer, QueryOutcome};
pub use chunking::{BoundaryChunker, Chunker, FixedSizeChunker, split};
pub use completion::{CompletionProvider, CompletionRequest};
pub use config::{RagConfig, RagConfigBuilder};
pub use document::{Chunk, DocumentId, DocumentIndex, DocumentStatus, SearchResult};
pub use embedding::{EmbeddingProvider, cosine_similarity};
pub use error::{FailureKind, RagError, Result};
pub use filestore::FileVectorStore;
pub use hashing::HashingEmbedder;
pub use index::{IndexStore, rank};
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{DocumentQa, DocumentQaBuilder};
pub use vectorstore::VectorStore;

#[cfg(feature = "pdf")]
pub use extract::{ExtractedText, extract_pdf_file, extract_pdf_text, validate_pdf};
