//! Local embedding provider using `fastembed`.
//!
//! Runs `all-MiniLM-L6-v2` (384 dimensions) on the CPU through ONNX Runtime.
//! The model is downloaded on first use and cached by `fastembed`; after that
//! no network calls are made. This module is only available when the
//! `fastembed` feature is enabled.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use ::fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::debug;

use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};

const PROVIDER: &str = "fastembed";
const MODEL_NAME: &str = "all-MiniLM-L6-v2";
const DIMENSIONS: usize = 384;

/// An [`EmbeddingProvider`] running a sentence-transformer locally.
///
/// Inference is CPU-bound, so every call runs on tokio's blocking pool.
#[derive(Clone)]
pub struct FastEmbedProvider {
    model: Arc<Mutex<TextEmbedding>>,
}

impl FastEmbedProvider {
    /// Load the model, downloading it if it is not cached yet.
    ///
    /// This blocks; call it from `spawn_blocking` inside an async context.
    pub fn try_new() -> Result<Self> {
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .map_err(|e| error(format!("failed to initialize {MODEL_NAME}: {e}")))?;
        Ok(Self { model: Arc::new(Mutex::new(model)) })
    }
}

fn error(message: impl Into<String>) -> RagError {
    RagError::EmbeddingError { provider: PROVIDER.into(), message: message.into() }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text]).await?.into_iter().next().ok_or_else(|| error("no embedding produced"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(provider = PROVIDER, batch_size = texts.len(), "embedding batch");

        let model = Arc::clone(&self.model);
        let texts: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        tokio::task::spawn_blocking(move || {
            let mut model = model.lock().map_err(|_| error("model lock poisoned"))?;
            model.embed(texts, None).map_err(|e| error(format!("inference failed: {e}")))
        })
        .await
        .map_err(|e| error(format!("embedding task failed: {e}")))?
    }

    fn dimensions(&self) -> usize {
        DIMENSIONS
    }

    fn model_name(&self) -> &str {
        MODEL_NAME
    }
}
