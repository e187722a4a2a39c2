use std::sync::Arc;
use std::time::Instant;

use crate::models::{EmailRequest, GENERATED_EMAIL_MAX_CHARS, NewEmailLog};
use crate::services::EmailLogService;
use crate::services::llm::{LLMClient, build_prompt};
use crate::utils::{ApiResult, StringExt};

/// Drafts an email through the provider and records the result.
///
/// A log row is written only after the provider call succeeded.
pub struct EmailService {
    llm_client: Arc<LLMClient>,
    log_service: Arc<EmailLogService>,
}

impl EmailService {
    pub fn new(llm_client: Arc<LLMClient>, log_service: Arc<EmailLogService>) -> Self {
        Self { llm_client, log_service }
    }

    pub async fn generate(&self, req: EmailRequest) -> ApiResult<String> {
        let req = req.validate()?;
        let prompt = build_prompt(&req);

        let started = Instant::now();
        let generated_email = self.llm_client.complete(&prompt, req.length).await?;
        let chars = generated_email.char_count();
        tracing::info!(
            "Generated email with {} in {}ms ({} chars)",
            self.llm_client.model(),
            started.elapsed().as_millis(),
            chars
        );
        if chars > GENERATED_EMAIL_MAX_CHARS {
            tracing::warn!(
                "Generated email exceeds {} characters, storing it unchanged",
                GENERATED_EMAIL_MAX_CHARS
            );
        }

        let log = self
            .log_service
            .create(NewEmailLog::from_request(&req, generated_email))
            .await?;

        Ok(log.generated_email)
    }
}
