//! Runtime settings, read from flags with environment-variable fallbacks.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use async_trait::async_trait;
use clap::{Args, ValueEnum};
use docqa_rag::groq::GroqCompletionProvider;
use docqa_rag::openai::OpenAIEmbeddingProvider;
use docqa_rag::{
    CompletionProvider, CompletionRequest, DocumentQa, EmbeddingProvider, FileVectorStore,
    HashingEmbedder, RagConfig, RagError,
};
use tracing::warn;

/// Which embedding backend builds and queries the indexes.
///
/// Indexes must be queried with the backend that built them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EmbeddingBackend {
    /// Offline feature hashing, no model or network needed.
    Hashing,
    /// OpenAI `/embeddings`; needs `OPENAI_API_KEY`.
    Openai,
    /// Local all-MiniLM-L6-v2; needs the `fastembed` build feature.
    Fastembed,
}

#[derive(Debug, Args)]
pub struct Settings {
    /// Directory holding one index per document.
    #[arg(long, env = "DOCQA_INDEX_DIR", default_value = "chroma_db", global = true)]
    pub index_dir: PathBuf,

    /// Target chunk size in characters.
    #[arg(long, env = "DOCQA_CHUNK_SIZE", default_value_t = 1000, global = true)]
    pub chunk_size: usize,

    /// Characters shared by consecutive chunks.
    #[arg(long, env = "DOCQA_CHUNK_OVERLAP", default_value_t = 200, global = true)]
    pub chunk_overlap: usize,

    /// Chunks retrieved to ground each answer.
    #[arg(long, env = "DOCQA_TOP_K", default_value_t = 3, global = true)]
    pub top_k: usize,

    /// Upper bound on answer length, in tokens.
    #[arg(long, env = "DOCQA_MAX_OUTPUT_TOKENS", default_value_t = 1000, global = true)]
    pub max_output_tokens: u32,

    /// Sampling temperature for answers.
    #[arg(long, env = "DOCQA_TEMPERATURE", default_value_t = 0.3, global = true)]
    pub temperature: f32,

    /// Embedding backend.
    #[arg(long, env = "DOCQA_EMBEDDING", value_enum, default_value_t = EmbeddingBackend::Hashing, global = true)]
    pub embedding: EmbeddingBackend,

    /// Groq API key; questions fail as unavailable without it.
    #[arg(long, env = "GROQ_API_KEY", hide_env_values = true, global = true)]
    pub groq_api_key: Option<String>,

    /// Groq model override.
    #[arg(long, env = "GROQ_MODEL", global = true)]
    pub groq_model: Option<String>,

    /// Base URL of an OpenAI-compatible chat completions server.
    #[arg(long, env = "GROQ_BASE_URL", global = true)]
    pub groq_base_url: Option<String>,

    /// OpenAI API key, used by the `openai` embedding backend.
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true, global = true)]
    pub openai_api_key: Option<String>,
}

impl Settings {
    pub fn rag_config(&self) -> Result<RagConfig> {
        RagConfig::builder()
            .chunk_size(self.chunk_size)
            .chunk_overlap(self.chunk_overlap)
            .top_k(self.top_k)
            .max_output_tokens(self.max_output_tokens)
            .temperature(self.temperature)
            .build()
            .context("invalid configuration")
    }

    async fn embedding_provider(&self) -> Result<Arc<dyn EmbeddingProvider>> {
        match self.embedding {
            EmbeddingBackend::Hashing => Ok(Arc::new(HashingEmbedder::default())),
            EmbeddingBackend::Openai => {
                let key = self.openai_api_key.clone().unwrap_or_default();
                Ok(Arc::new(OpenAIEmbeddingProvider::new(key).context("openai embeddings")?))
            }
            #[cfg(feature = "fastembed")]
            EmbeddingBackend::Fastembed => {
                let provider =
                    tokio::task::spawn_blocking(docqa_rag::fastembed::FastEmbedProvider::try_new)
                        .await??;
                Ok(Arc::new(provider))
            }
            #[cfg(not(feature = "fastembed"))]
            EmbeddingBackend::Fastembed => {
                anyhow::bail!("the fastembed backend requires building with --features fastembed")
            }
        }
    }

    fn completion_provider(&self) -> Result<Arc<dyn CompletionProvider>> {
        let Some(key) = self.groq_api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Ok(Arc::new(Unconfigured));
        };

        let mut provider = GroqCompletionProvider::new(key)?;
        if let Some(model) = &self.groq_model {
            provider = provider.with_model(model);
        }
        if let Some(base_url) = &self.groq_base_url {
            provider = provider.with_base_url(base_url);
        }
        Ok(Arc::new(provider))
    }

    /// Wire up the document QA facade over the on-disk index directory.
    pub async fn document_qa(&self) -> Result<DocumentQa> {
        let qa = DocumentQa::builder()
            .config(self.rag_config()?)
            .embedding_provider(self.embedding_provider().await?)
            .completion_provider(self.completion_provider()?)
            .vector_store(Arc::new(FileVectorStore::new(&self.index_dir)))
            .build()?;
        Ok(qa)
    }
}

/// Stands in for the language model when no API key is configured, so
/// indexing commands work offline and questions fail as unavailable.
struct Unconfigured;

#[async_trait]
impl CompletionProvider for Unconfigured {
    async fn complete(&self, _request: &CompletionRequest) -> docqa_rag::Result<String> {
        warn!("GROQ_API_KEY is not set");
        Err(RagError::CompletionError {
            provider: self.name().to_string(),
            message: "GROQ_API_KEY is not set".to_string(),
        })
    }

    fn name(&self) -> &str {
        "unconfigured"
    }
}
