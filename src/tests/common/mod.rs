// Common test utilities and helpers

use crate::AppState;
use crate::config::LlmConfig;
use crate::services::LLMClient;
use serde_json::{Value, json};
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const COMPLETIONS_PATH: &str = "/v1/chat/completions";

/// Create an in-memory SQLite database for testing
pub async fn create_test_db() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .acquire_timeout(Duration::from_secs(3))
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create test database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

/// LLM settings pointing at a mock provider
pub fn mock_llm_config(server: &MockServer) -> LlmConfig {
    LlmConfig {
        api_base: format!("{}/v1", server.uri()),
        api_key: "sk-test".to_string(),
        model: "gpt-3.5-turbo".to_string(),
        temperature: 0.7,
        top_p: 1.0,
        max_tokens: 1024,
    }
}

pub fn create_test_llm_client(server: &MockServer) -> Arc<LLMClient> {
    Arc::new(LLMClient::new(&mock_llm_config(server)).expect("Failed to create LLM client"))
}

pub async fn create_test_state(server: &MockServer) -> Arc<AppState> {
    let pool = create_test_db().await;
    Arc::new(AppState::new(pool, create_test_llm_client(server)))
}

pub fn chat_completion_body(content: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "gpt-3.5-turbo",
        "choices": [{
            "index": 0,
            "message": {"role": "assistant", "content": content},
            "finish_reason": "stop"
        }],
        "usage": {"prompt_tokens": 42, "completion_tokens": 12, "total_tokens": 54}
    })
}

/// Provider that answers every completion with `content`
pub async fn mount_completion(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_completion_body(content)))
        .mount(server)
        .await;
}

/// Provider that fails every completion with `status`
pub async fn mount_failure(server: &MockServer, status: u16, message: &str) {
    Mock::given(method("POST"))
        .and(path(COMPLETIONS_PATH))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "error": {"message": message, "type": "server_error", "code": status}
        })))
        .mount(server)
        .await;
}

/// JSON bodies of every request the provider received
pub async fn received_bodies(server: &MockServer) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .map(|r| serde_json::from_slice(&r.body).expect("Provider request was not JSON"))
        .collect()
}
