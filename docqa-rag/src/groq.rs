//! Groq chat-completion provider.
//!
//! Talks to any OpenAI-compatible `/chat/completions` endpoint; the defaults
//! target Groq. This module is only available when the `groq` feature is
//! enabled.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, error};

use crate::completion::{CompletionProvider, CompletionRequest};
use crate::error::{RagError, Result};
use crate::http::{endpoint, error_detail};

/// The default Groq API base URL.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// The default Groq model.
pub const DEFAULT_MODEL: &str = "openai/gpt-oss-120b";

/// A [`CompletionProvider`] sending the prompt as a single user message.
///
/// # Example
///
/// ```rust,ignore
/// use docqa_rag::groq::GroqCompletionProvider;
///
/// let llm = GroqCompletionProvider::from_env()?.with_model("llama-3.3-70b-versatile");
/// ```
pub struct GroqCompletionProvider {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl GroqCompletionProvider {
    /// Create a provider for the default model with the given API key.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `api_key` is empty.
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(RagError::ConfigError("Groq API key must not be empty".into()));
        }
        Ok(Self {
            client: reqwest::Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.into(),
            model: DEFAULT_MODEL.into(),
        })
    }

    /// Create a provider from `GROQ_API_KEY`, honouring `GROQ_MODEL` if set.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("GROQ_API_KEY")
            .map_err(|_| RagError::ConfigError("GROQ_API_KEY environment variable not set".into()))?;
        let provider = Self::new(api_key)?;
        Ok(match std::env::var("GROQ_MODEL") {
            Ok(model) if !model.trim().is_empty() => provider.with_model(model),
            _ => provider,
        })
    }

    /// Set the model name.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Point the provider at another OpenAI-compatible server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    fn error(message: impl Into<String>) -> RagError {
        RagError::CompletionError { provider: "Groq".into(), message: message.into() }
    }
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    #[serde(default)]
    content: Option<String>,
}

#[async_trait]
impl CompletionProvider for GroqCompletionProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<String> {
        debug!(provider = "Groq", model = %self.model, prompt_len = request.prompt.len(), "requesting completion");

        let body = ChatRequest {
            model: &self.model,
            messages: [ChatMessage { role: "user", content: &request.prompt }],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        };
        let response = self
            .client
            .post(endpoint(&self.base_url, "chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                error!(provider = "Groq", error = %e, "request failed");
                Self::error(format!("request failed: {e}"))
            })?;

        let status = response.status();
        if !status.is_success() {
            let detail = error_detail(response.text().await.unwrap_or_default());
            error!(provider = "Groq", %status, "API error");
            return Err(Self::error(format!("API returned {status}: {detail}")));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| Self::error(format!("failed to parse response: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| Self::error("response contained no message content"))
    }

    fn name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_matches_chat_completions_shape() {
        let body = ChatRequest {
            model: DEFAULT_MODEL,
            messages: [ChatMessage { role: "user", content: "prompt" }],
            temperature: 0.3,
            max_tokens: 1000,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "openai/gpt-oss-120b");
        assert_eq!(json["messages"][0]["role"], "user");
        assert_eq!(json["messages"][0]["content"], "prompt");
        assert_eq!(json["max_tokens"], 1000);
    }

    #[test]
    fn response_without_content_is_rejected() {
        let parsed: ChatResponse =
            serde_json::from_str(r#"{"choices":[{"message":{"role":"assistant"}}]}"#).unwrap();
        assert!(parsed.choices[0].message.content.is_none());
    }

    #[test]
    fn empty_key_and_overrides() {
        assert!(GroqCompletionProvider::new("").is_err());
        let provider = GroqCompletionProvider::new("gsk_test")
            .unwrap()
            .with_model("llama-3.3-70b-versatile")
            .with_base_url("http://localhost:1234/v1");
        assert_eq!(provider.name(), "llama-3.3-70b-versatile");
        assert_eq!(provider.base_url, "http://localhost:1234/v1");
    }
}
