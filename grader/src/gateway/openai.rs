//! OpenAI-compatible chat completions gateway.
//!
//! Sends the four prompt segments as one chat conversation: the persona as
//! the system message, then context, schema and instructions as three user
//! messages. Sampling is kept tight (low temperature, reduced top_p) since
//! the task is correction, not creative writing.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GraderError;
use crate::gateway::{GradingModel, http_client};
use crate::prompt::GradingPrompt;

const OPENAI_URL: &str = "https://api.openai.com/v1/chat/completions";
const MAX_TOKENS: u32 = 3500;

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
    top_p: f32,
}

#[derive(Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChatMessage,
}

/// Gateway implementation backed by the OpenAI chat completions API.
pub struct OpenAiModel {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

impl OpenAiModel {
    pub fn from_config() -> Result<Self, GraderError> {
        let api_key = util::config::openai_api_key();
        if api_key.is_empty() {
            return Err(GraderError::Gateway("OPENAI_API_KEY is not set".into()));
        }
        Ok(Self {
            client: http_client()?,
            api_key,
            model: util::config::openai_model(),
        })
    }

    fn message(role: &str, content: &str) -> ChatMessage {
        ChatMessage {
            role: role.to_string(),
            content: content.to_string(),
        }
    }
}

#[async_trait]
impl GradingModel for OpenAiModel {
    async fn generate(&self, prompt: &GradingPrompt) -> Result<String, GraderError> {
        let request_body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Self::message("system", &prompt.role),
                Self::message("user", &prompt.context),
                Self::message("user", &prompt.schema),
                Self::message("user", &prompt.instructions),
            ],
            temperature: 0.2,
            max_tokens: MAX_TOKENS,
            top_p: 0.5,
        };

        let response = self
            .client
            .post(OPENAI_URL)
            .bearer_auth(&self.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GraderError::Gateway(format!("openai request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GraderError::Gateway(format!("openai response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(GraderError::Gateway(format!(
                "openai returned {status}: {response_text}"
            )));
        }

        let response = serde_json::from_str::<ChatResponse>(&response_text).map_err(|e| {
            GraderError::Gateway(format!(
                "error decoding openai response body: {e}. Full response: {response_text}"
            ))
        })?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| GraderError::Gateway("openai reply contained no choices".into()))
    }
}
