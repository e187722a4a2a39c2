use axum::{
    Json,
    extract::{Path, State, rejection::PathRejection},
};
use std::sync::Arc;

use crate::AppState;
use crate::models::EmailLog;
use crate::utils::{ApiError, ApiResult, ErrorResponse};

// List all logs, oldest first
#[utoipa::path(
    get,
    path = "/logs/",
    responses(
        (status = 200, description = "All email logs in creation order", body = Vec<EmailLog>)
    ),
    tag = "Logs"
)]
pub async fn list_logs(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<EmailLog>>> {
    let logs = state.email_log_service.list().await?;
    tracing::debug!("Retrieved {} email logs", logs.len());
    Ok(Json(logs))
}

// Get log by ID
#[utoipa::path(
    get,
    path = "/logs/{id}",
    params(("id" = i64, Path, description = "Log ID")),
    responses(
        (status = 200, description = "Email log", body = EmailLog),
        (status = 404, description = "Log not found", body = ErrorResponse),
        (status = 422, description = "Invalid log ID", body = ErrorResponse)
    ),
    tag = "Logs"
)]
pub async fn get_log(
    State(state): State<Arc<AppState>>,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<EmailLog>> {
    let Path(id) = id?;
    let log = state
        .email_log_service
        .get(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Log not found"))?;
    Ok(Json(log))
}
