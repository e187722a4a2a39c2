//! Email Assistant Library
//!
//! Drafts emails through an LLM provider and keeps a log of every generated email.

use axum::{
    Router,
    routing::{get, post},
};
use sqlx::SqlitePool;
use std::sync::Arc;

pub mod config;
pub mod db;
pub mod handlers;
pub mod models;
pub mod services;
pub mod utils;

pub use config::Config;
pub use services::{EmailLogService, EmailService, LLMClient, LLMError};
pub use utils::{ApiError, ApiResult};

/// Application shared state
///
/// Built once at startup and handed to handlers through axum's `State`.
#[derive(Clone)]
pub struct AppState {
    pub email_service: Arc<EmailService>,
    pub email_log_service: Arc<EmailLogService>,
}

impl AppState {
    pub fn new(db: SqlitePool, llm_client: Arc<LLMClient>) -> Self {
        let email_log_service = Arc::new(EmailLogService::new(db));
        let email_service =
            Arc::new(EmailService::new(llm_client, Arc::clone(&email_log_service)));
        Self { email_service, email_log_service }
    }
}

/// API routes plus `/health`. Both the slash and no-slash forms of the collection paths are served.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/generate/", post(handlers::email::generate_email))
        .route("/generate", post(handlers::email::generate_email))
        .route("/logs/", get(handlers::email_log::list_logs))
        .route("/logs", get(handlers::email_log::list_logs))
        .route("/logs/:id", get(handlers::email_log::get_log))
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}

#[cfg(test)]
mod tests;
