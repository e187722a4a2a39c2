//! LLM Data Models
//!
//! Prompt shape, OpenAI chat completion wire types, and the provider error taxonomy.

use serde::{Deserialize, Serialize};

/// Prompt sent to the provider as a system + user message pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub system: String,
    pub user: String,
}

// ============================================================================
// OpenAI Chat Completion Types
// ============================================================================

#[derive(Debug, Serialize)]
pub(crate) struct ChatCompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    pub top_p: f64,
    pub max_tokens: u32,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatMessage {
    pub role: &'static str,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatCompletionResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatChoice {
    pub message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ResponseMessage {
    pub content: Option<String>,
}

/// `{"error": {"message": "..."}}` as returned by OpenAI-compatible APIs
#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorBody {
    pub error: ProviderErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ProviderErrorDetail {
    pub message: String,
}

// ============================================================================
// LLM Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum LLMError {
    #[error("LLM provider unreachable: {0}")]
    Unreachable(String),

    #[error("LLM API error {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Unexpected response from LLM provider: {0}")]
    UnexpectedResponse(String),

    #[error("HTTP client error: {0}")]
    Client(String),
}

impl LLMError {
    /// Provider HTTP status, when the provider answered at all
    pub fn upstream_status(&self) -> Option<u16> {
        match self {
            Self::Upstream { status, .. } => Some(*status),
            _ => None,
        }
    }
}
