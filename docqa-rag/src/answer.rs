//! Question answering over a single document's index.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{error, info};

use crate::completion::{CompletionProvider, CompletionRequest};
use crate::config::RagConfig;
use crate::document::{DocumentId, SearchResult};
use crate::error::{FailureKind, RagError};
use crate::index::IndexStore;
use crate::prompt::{build_prompt, source_labels};

/// Reason reported when a question targets a document without an index.
pub const NOT_INDEXED_REASON: &str = "Document not found or not processed yet.";

/// The result of asking a question about a document.
///
/// Failures are values, not errors: answering never panics and never returns
/// a partial answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// The model answered from the retrieved chunks.
    Answered {
        /// The generated answer.
        answer: String,
        /// `"Chunk i"` labels, one per retrieved chunk, by retrieval rank.
        sources: Vec<String>,
        /// The retrieved chunks with their similarity scores.
        chunks: Vec<SearchResult>,
    },
    /// No answer was produced.
    Failed {
        /// Human-readable reason, suitable for showing to the asker.
        reason: String,
        /// Machine-readable failure class.
        kind: FailureKind,
    },
}

impl QueryOutcome {
    fn failed(reason: impl Into<String>, kind: FailureKind) -> Self {
        QueryOutcome::Failed { reason: reason.into(), kind }
    }

    /// Returns `true` for an answered question.
    pub fn is_success(&self) -> bool {
        matches!(self, QueryOutcome::Answered { .. })
    }

    /// The answer, or the failure reason.
    pub fn answer_text(&self) -> &str {
        match self {
            QueryOutcome::Answered { answer, .. } => answer,
            QueryOutcome::Failed { reason, .. } => reason,
        }
    }

    /// Source labels; empty on failure.
    pub fn sources(&self) -> &[String] {
        match self {
            QueryOutcome::Answered { sources, .. } => sources,
            QueryOutcome::Failed { .. } => &[],
        }
    }

    /// Number of chunks the answer was grounded on.
    pub fn context_used(&self) -> usize {
        match self {
            QueryOutcome::Answered { chunks, .. } => chunks.len(),
            QueryOutcome::Failed { .. } => 0,
        }
    }

    /// The failure class, if the question was not answered.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            QueryOutcome::Answered { .. } => None,
            QueryOutcome::Failed { kind, .. } => Some(*kind),
        }
    }
}

/// Answers questions by retrieving a document's most relevant chunks and
/// asking a language model to answer from them alone.
#[derive(Clone)]
pub struct QueryAnswerer {
    index_store: IndexStore,
    completion_provider: Arc<dyn CompletionProvider>,
    config: RagConfig,
}

impl QueryAnswerer {
    /// Create an answerer that retrieves `config.top_k` chunks per question.
    pub fn new(
        index_store: IndexStore,
        completion_provider: Arc<dyn CompletionProvider>,
        config: RagConfig,
    ) -> Self {
        Self { index_store, completion_provider, config }
    }

    /// Answer `question` using only the index of `document_id`.
    pub async fn answer(&self, document_id: DocumentId, question: &str) -> QueryOutcome {
        if question.trim().is_empty() {
            return QueryOutcome::failed("Question must not be empty.", FailureKind::InvalidInput);
        }

        let results = match self.index_store.retrieve(document_id, question, self.config.top_k).await {
            Ok(results) => results,
            Err(RagError::IndexNotFound { .. }) => {
                info!(document.id = document_id, "question for unindexed document");
                return QueryOutcome::failed(NOT_INDEXED_REASON, FailureKind::NotIndexed);
            }
            Err(e) => {
                error!(document.id = document_id, error = %e, "retrieval failed");
                return QueryOutcome::failed(
                    format!("Error processing question: {e}"),
                    e.failure_kind(),
                );
            }
        };

        let request = CompletionRequest {
            prompt: build_prompt(question, &results),
            max_output_tokens: self.config.max_output_tokens,
            temperature: self.config.temperature,
        };
        let answer = match self.completion_provider.complete(&request).await {
            Ok(answer) => answer,
            Err(e) => {
                error!(
                    document.id = document_id,
                    provider = self.completion_provider.name(),
                    error = %e,
                    "completion failed"
                );
                return QueryOutcome::failed(
                    format!("Error processing question: {e}"),
                    FailureKind::UpstreamUnavailable,
                );
            }
        };

        info!(document.id = document_id, result_count = results.len(), "answered question");
        QueryOutcome::Answered { answer, sources: source_labels(results.len()), chunks: results }
    }
}
