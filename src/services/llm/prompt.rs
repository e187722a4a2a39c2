//! Prompt construction for email drafting

use super::models::Prompt;
use crate::models::EmailRequest;

const NOT_AVAILABLE: &str = "N/A";

const SYSTEM_PROMPT: &str = "You are a helpful email assistant. \
You get a prompt to write an email, you reply with the email and nothing else.";

/// Build the system + user prompt for a validated request.
/// Absent optional fields are rendered as `N/A`.
pub fn build_prompt(req: &EmailRequest) -> Prompt {
    let length = req
        .length
        .map(|n| format!("{} characters", n))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string());

    let user = format!(
        "Write an email based on the following input:\n\
         - User Input: {}\n\
         - Reply To: {}\n\
         - Context: {}\n\
         - Length: {}\n\
         - Tone: {}",
        req.user_input,
        or_na(req.reply_to.as_deref()),
        or_na(req.context.as_deref()),
        length,
        or_na(Some(req.tone.as_str())),
    );

    Prompt { system: SYSTEM_PROMPT.to_string(), user }
}

fn or_na(value: Option<&str>) -> &str {
    match value {
        Some(v) if !v.trim().is_empty() => v,
        _ => NOT_AVAILABLE,
    }
}
