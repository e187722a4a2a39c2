pub mod email_log_service;
pub mod email_service;
pub mod llm;

pub use email_log_service::EmailLogService;
pub use email_service::EmailService;
pub use llm::{LLMClient, LLMError};
