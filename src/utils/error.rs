use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::services::llm::LLMError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Error body returned by every endpoint
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    ValidationError { status: StatusCode, message: String },

    #[error("{0}")]
    ResourceNotFound(String),

    #[error(transparent)]
    Provider(#[from] LLMError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl ApiError {
    pub fn validation_error(message: impl Into<String>) -> Self {
        Self::ValidationError { status: StatusCode::UNPROCESSABLE_ENTITY, message: message.into() }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::ResourceNotFound(message.into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::ValidationError { status, .. } => *status,
            Self::ResourceNotFound(_) => StatusCode::NOT_FOUND,
            Self::Provider(e) => match e.upstream_status() {
                Some(401) => StatusCode::UNAUTHORIZED,
                Some(404) => StatusCode::NOT_FOUND,
                Some(503) => StatusCode::SERVICE_UNAVAILABLE,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn detail(&self) -> String {
        match self {
            Self::Provider(e) => match e.upstream_status() {
                Some(401) => format!("Provider rejected the API key: {}", e),
                Some(404) => format!("Provider model or endpoint not found: {}", e),
                Some(503) => format!("Provider temporarily unavailable: {}", e),
                _ => e.to_string(),
            },
            other => other.to_string(),
        }
    }
}

impl From<axum::extract::rejection::JsonRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::JsonRejection) -> Self {
        Self::ValidationError { status: rejection.status(), message: rejection.body_text() }
    }
}

impl From<axum::extract::rejection::PathRejection> for ApiError {
    fn from(rejection: axum::extract::rejection::PathRejection) -> Self {
        Self::validation_error(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.detail();

        if status.is_server_error() {
            tracing::error!("Request failed with {}: {}", status, detail);
        } else {
            tracing::debug!("Request rejected with {}: {}", status, detail);
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}
