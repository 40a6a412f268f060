//! Grading model gateways.
//!
//! A gateway is pure transport: it sends the four prompt segments to an
//! external text-generation service as a structured conversation (the role
//! segment as the system turn, then context, schema and instructions as
//! sequential user turns) and hands back whatever text comes back. It makes
//! no promise about the reply's shape; that is the parser's problem.
//!
//! Implementations are interchangeable behind [`GradingModel`] and selected
//! by the `GRADING_MODEL` configuration value, never by source substitution.

pub mod gemini;
pub mod openai;

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GraderError;
use crate::prompt::GradingPrompt;

pub use gemini::GeminiModel;
pub use openai::OpenAiModel;

/// Capability interface: generates structured grading text given a prompt of
/// {role, context, instructions, schema}.
#[async_trait]
pub trait GradingModel: Send + Sync {
    /// Sends the conversation and returns the model's raw text reply.
    ///
    /// Fails with [`GraderError::Gateway`] when the call cannot complete
    /// (network failure, auth failure, quota, timeout).
    async fn generate(&self, prompt: &GradingPrompt) -> Result<String, GraderError>;
}

/// Builds the gateway selected by `GRADING_MODEL`.
pub fn from_config() -> Result<Arc<dyn GradingModel>, GraderError> {
    match util::config::grading_model().as_str() {
        "gemini" => Ok(Arc::new(GeminiModel::from_config()?)),
        "openai" => Ok(Arc::new(OpenAiModel::from_config()?)),
        other => Err(GraderError::Gateway(format!(
            "unknown grading model backend '{other}' (expected 'gemini' or 'openai')"
        ))),
    }
}

/// Builds a reqwest client with the configured hard request timeout.
pub(crate) fn http_client() -> Result<reqwest::Client, GraderError> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(
            util::config::grading_timeout_seconds(),
        ))
        .build()
        .map_err(|e| GraderError::Gateway(format!("failed to build HTTP client: {e}")))
}
