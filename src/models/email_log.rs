use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;

use crate::utils::{ApiError, ApiResult, StringExt, non_blank};

pub const USER_INPUT_MAX_CHARS: usize = 1000;
pub const REPLY_TO_MAX_CHARS: usize = 500;
pub const CONTEXT_MAX_CHARS: usize = 1000;
pub const TONE_MAX_CHARS: usize = 100;
pub const GENERATED_EMAIL_MAX_CHARS: usize = 5000;

/// One persisted email generation
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct EmailLog {
    pub id: i64,
    pub user_input: String,
    pub reply_to: Option<String>,
    pub context: Option<String>,
    pub length: Option<i64>,
    pub tone: String,
    pub generated_email: String,
    pub created_at: DateTime<Utc>,
}

/// Row to insert once the provider has produced an email
#[derive(Debug, Clone)]
pub struct NewEmailLog {
    pub user_input: String,
    pub reply_to: Option<String>,
    pub context: Option<String>,
    pub length: Option<i64>,
    pub tone: String,
    pub generated_email: String,
}

impl NewEmailLog {
    pub fn from_request(req: &EmailRequest, generated_email: String) -> Self {
        Self {
            user_input: req.user_input.clone(),
            reply_to: req.reply_to.clone(),
            context: req.context.clone(),
            length: req.length,
            tone: req.tone.clone(),
            generated_email,
        }
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct EmailRequest {
    /// What the email should say
    #[schema(max_length = 1000, example = "ask for a deadline extension")]
    pub user_input: String,
    /// Message being replied to
    #[schema(max_length = 500)]
    pub reply_to: Option<String>,
    #[schema(max_length = 1000)]
    pub context: Option<String>,
    /// Target length hint in characters
    #[schema(minimum = 1, example = 200)]
    pub length: Option<i64>,
    #[schema(max_length = 100, example = "polite")]
    pub tone: String,
}

impl EmailRequest {
    /// Check field bounds and fold blank optional fields into `None`
    pub fn validate(self) -> ApiResult<Self> {
        if self.user_input.is_blank() {
            return Err(ApiError::validation_error("user_input must not be empty"));
        }
        check_max_chars("user_input", &self.user_input, USER_INPUT_MAX_CHARS)?;
        check_max_chars("tone", &self.tone, TONE_MAX_CHARS)?;

        let reply_to = non_blank(self.reply_to);
        if let Some(v) = &reply_to {
            check_max_chars("reply_to", v, REPLY_TO_MAX_CHARS)?;
        }

        let context = non_blank(self.context);
        if let Some(v) = &context {
            check_max_chars("context", v, CONTEXT_MAX_CHARS)?;
        }

        if let Some(length) = self.length
            && length <= 0
        {
            return Err(ApiError::validation_error("length must be greater than 0"));
        }

        Ok(Self { reply_to, context, ..self })
    }
}

fn check_max_chars(field: &str, value: &str, max: usize) -> ApiResult<()> {
    if value.char_count() > max {
        return Err(ApiError::validation_error(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EmailResponse {
    pub generated_email: String,
}
