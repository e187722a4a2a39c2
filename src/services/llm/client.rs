//! LLM Client - HTTP client for OpenAI-compatible chat completion APIs
//!
//! One request per generation. No retries and no timeout beyond the reqwest default.

use reqwest::Client;

use super::models::*;
use crate::config::LlmConfig;

/// Tokens some models leak into their output
const CONTROL_TOKENS: &[&str] =
    &["<|endoftext|>", "<|im_start|>", "<|im_end|>", "<|eot_id|>", "</s>", "<s>"];

/// LLM HTTP Client
pub struct LLMClient {
    http_client: Client,
    url: String,
    api_key: String,
    model: String,
    temperature: f64,
    top_p: f64,
    max_tokens_cap: u32,
}

impl LLMClient {
    pub fn new(config: &LlmConfig) -> Result<Self, LLMError> {
        let http_client = Client::builder()
            .build()
            .map_err(|e| LLMError::Client(e.to_string()))?;

        Ok(Self {
            http_client,
            url: format!("{}/chat/completions", config.api_base.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            temperature: config.temperature,
            top_p: config.top_p,
            max_tokens_cap: config.max_tokens,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Output token budget: the target length when given, never above the configured ceiling
    pub fn max_tokens_for(&self, target_length: Option<i64>) -> u32 {
        match target_length {
            Some(n) if n > 0 => u32::try_from(n)
                .unwrap_or(u32::MAX)
                .min(self.max_tokens_cap),
            _ => self.max_tokens_cap,
        }
    }

    /// Call the chat completion API and return the cleaned text of the first choice
    pub async fn complete(
        &self,
        prompt: &Prompt,
        target_length: Option<i64>,
    ) -> Result<String, LLMError> {
        let chat_request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage { role: "system", content: prompt.system.clone() },
                ChatMessage { role: "user", content: prompt.user.clone() },
            ],
            temperature: self.temperature,
            top_p: self.top_p,
            max_tokens: self.max_tokens_for(target_length),
        };

        tracing::debug!(
            "Calling LLM API: {} with model {} (max_tokens={})",
            self.url,
            self.model,
            chat_request.max_tokens
        );

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&chat_request)
            .send()
            .await
            .map_err(|e| LLMError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            tracing::warn!("LLM API returned {}", status);
            return Err(LLMError::Upstream {
                status: status.as_u16(),
                message: provider_error_message(&error_text),
            });
        }

        let chat_response: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| LLMError::UnexpectedResponse(e.to_string()))?;

        extract_text(chat_response)
    }
}

fn extract_text(response: ChatCompletionResponse) -> Result<String, LLMError> {
    let content = response
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message)
        .and_then(|m| m.content)
        .ok_or_else(|| LLMError::UnexpectedResponse("no message content in choices".to_string()))?;

    let text = strip_control_tokens(&content);
    if text.is_empty() {
        return Err(LLMError::UnexpectedResponse("empty completion".to_string()));
    }
    Ok(text)
}

/// Remove provider control tokens and surrounding whitespace
fn strip_control_tokens(text: &str) -> String {
    let mut cleaned = text.to_string();
    for token in CONTROL_TOKENS {
        if cleaned.contains(token) {
            cleaned = cleaned.replace(token, "");
        }
    }
    cleaned.trim().to_string()
}

/// Prefer the provider's own error message over the raw body
fn provider_error_message(body: &str) -> String {
    match serde_json::from_str::<ProviderErrorBody>(body) {
        Ok(parsed) => parsed.error.message,
        Err(_) if body.trim().is_empty() => "no error body".to_string(),
        Err(_) => body.trim().to_string(),
    }
}
