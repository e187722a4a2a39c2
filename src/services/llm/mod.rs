//! LLM Service Module
//!
//! Talks to one OpenAI-compatible chat completion provider.
//!
//! # Flow
//! ```text
//! EmailRequest ──build_prompt──▶ Prompt ──LLMClient::complete──▶ String
//! ```

mod client;
mod models;
mod prompt;

pub use client::LLMClient;
pub use models::{LLMError, Prompt};
pub use prompt::build_prompt;
