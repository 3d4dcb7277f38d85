//! Chat backend trait and the HTTP implementation.
//!
//! [`ChatBackend`] is the only seam between the core and a text-generation
//! service: one call, one list of messages in, one reply string out.
//! [`ApiBackend`] implements it over HTTP for
//!
//! * Ollama's native `/api/chat` endpoint, and
//! * any OpenAI-compatible `/v1/chat/completions` endpoint (OpenAI, Groq,
//!   LM Studio, vLLM, Ollama in OpenAI mode …).
//!
//! All connection details come from [`BackendConfig`]; nothing is hardcoded.

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

use crate::config::{BackendConfig, BackendProvider};

// ---------------------------------------------------------------------------
// BackendError
// ---------------------------------------------------------------------------

/// Errors that can occur while talking to the backend.
#[derive(Debug, Error)]
pub enum BackendError {
    /// HTTP transport or connection error.
    #[error("HTTP request failed: {0}")]
    Request(String),

    /// The request did not complete within the configured timeout.
    #[error("backend request timed out")]
    Timeout,

    /// The backend answered with a non-success HTTP status.
    #[error("backend returned HTTP {0}: {1}")]
    Status(u16, String),

    /// The HTTP response could not be parsed as expected JSON.
    #[error("failed to parse backend response: {0}")]
    Parse(String),

    /// The reply contained no message content.
    #[error("backend returned an empty response")]
    EmptyResponse,
}

impl From<reqwest::Error> for BackendError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            BackendError::Timeout
        } else if let Some(status) = e.status() {
            BackendError::Status(status.as_u16(), e.to_string())
        } else {
            BackendError::Request(e.to_string())
        }
    }
}

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    System,
    User,
    Assistant,
}

/// One chat message, serialised as `{"role": "...", "content": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// ChatBackend trait
// ---------------------------------------------------------------------------

/// A single-turn chat call to a text-generation model.
///
/// Implementors must be `Send + Sync` so they can be shared across tasks
/// behind an `Arc<dyn ChatBackend>`.  Implementations must not retry: a
/// failure is reported once, as an `Err`.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    async fn send_chat(&self, model: &str, messages: &[ChatMessage])
        -> Result<String, BackendError>;
}

// ---------------------------------------------------------------------------
// ApiBackend
// ---------------------------------------------------------------------------

/// HTTP implementation of [`ChatBackend`].
///
/// The `Authorization: Bearer …` header is attached only when
/// `config.api_key` is a non-empty string, so local providers work without
/// credentials.
pub struct ApiBackend {
    client: reqwest::Client,
    config: BackendConfig,
}

impl ApiBackend {
    /// Build a backend whose HTTP client enforces `config.timeout_secs` on
    /// every request.  Falls back to a default client if the builder fails.
    pub fn from_config(config: &BackendConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }

    /// Full URL of the chat endpoint for the configured provider.
    pub fn endpoint(&self) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        match self.config.provider {
            BackendProvider::Ollama => format!("{base}/api/chat"),
            BackendProvider::OpenAiCompatible => format!("{base}/v1/chat/completions"),
        }
    }

    /// JSON request body for the configured provider.
    pub fn request_body(&self, model: &str, messages: &[ChatMessage]) -> serde_json::Value {
        let mut body = serde_json::json!({
            "model":    model,
            "messages": messages,
            "stream":   false,
        });

        if let Some(temperature) = self.config.temperature {
            match self.config.provider {
                BackendProvider::Ollama => {
                    body["options"] = serde_json::json!({ "temperature": temperature });
                }
                BackendProvider::OpenAiCompatible => {
                    body["temperature"] = serde_json::json!(temperature);
                }
            }
        }

        body
    }

    /// Pull the reply text out of a decoded response.
    pub fn extract_reply(&self, json: &serde_json::Value) -> Result<String, BackendError> {
        let content = match self.config.provider {
            BackendProvider::Ollama => &json["message"]["content"],
            BackendProvider::OpenAiCompatible => &json["choices"][0]["message"]["content"],
        };

        content
            .as_str()
            .map(str::to_string)
            .ok_or(BackendError::EmptyResponse)
    }
}

#[async_trait]
impl ChatBackend for ApiBackend {
    async fn send_chat(
        &self,
        model: &str,
        messages: &[ChatMessage],
    ) -> Result<String, BackendError> {
        let url = self.endpoint();
        log::debug!("backend: POST {url} (model={model}, messages={})", messages.len());

        let mut req = self.client.post(&url).json(&self.request_body(model, messages));

        let key = self.config.api_key.as_deref().unwrap_or("");
        if !key.is_empty() {
            req = req.bearer_auth(key);
        }

        let response = req.send().await?.error_for_status()?;

        let json: serde_json::Value = response
            .json()
            .await
            .map_err(|e| BackendError::Parse(e.to_string()))?;

        self.extract_reply(&json)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
