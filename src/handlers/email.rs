use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use std::sync::Arc;

use crate::AppState;
use crate::models::{EmailRequest, EmailResponse};
use crate::utils::{ApiResult, ErrorResponse};

// Generate an email and record it
#[utoipa::path(
    post,
    path = "/generate/",
    request_body = EmailRequest,
    responses(
        (status = 200, description = "Generated email", body = EmailResponse),
        (status = 401, description = "Provider rejected the API key", body = ErrorResponse),
        (status = 404, description = "Provider model or endpoint not found", body = ErrorResponse),
        (status = 422, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Provider or internal failure", body = ErrorResponse),
        (status = 503, description = "Provider unavailable", body = ErrorResponse)
    ),
    tag = "Email"
)]
pub async fn generate_email(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<EmailRequest>, JsonRejection>,
) -> ApiResult<Json<EmailResponse>> {
    let Json(req) = payload?;
    tracing::debug!("Generating email (tone: {}, length: {:?})", req.tone, req.length);

    let generated_email = state.email_service.generate(req).await?;
    Ok(Json(EmailResponse { generated_email }))
}
