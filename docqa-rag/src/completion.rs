//! Language-model completion trait.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// A single-turn completion request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    /// The full prompt, sent as one user message.
    pub prompt: String,
    /// Upper bound on generated tokens.
    pub max_output_tokens: u32,
    /// Sampling temperature; low values favour grounded, repeatable phrasing.
    pub temperature: f32,
}

/// A provider that turns a prompt into generated text.
///
/// Calls may be slow and may fail with network, rate-limit, or malformed
/// response errors, which implementations report as
/// [`RagError::CompletionError`](crate::RagError::CompletionError). No
/// retries or timeouts are applied inside the crate.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    /// Generate a completion for the request.
    async fn complete(&self, request: &CompletionRequest) -> Result<String>;

    /// A short provider/model label used in logs and errors.
    fn name(&self) -> &str;
}
