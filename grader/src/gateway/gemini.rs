//! Gemini gateway.
//!
//! Talks to Google's `generateContent` endpoint. The persona segment travels
//! as the system instruction; context, schema and instructions follow as
//! three user-role content items. Thinking is disabled for faster replies.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::GraderError;
use crate::gateway::{GradingModel, http_client};
use crate::prompt::GradingPrompt;

const GEMINI_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash:generateContent";

/// Request body for the Gemini API.
#[derive(Serialize)]
struct GeminiRequest {
    system_instruction: Content,
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Serialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Serialize)]
struct GenerationConfig {
    thinking_config: ThinkingConfig,
}

#[derive(Serialize)]
struct ThinkingConfig {
    /// Set to 0 to disable thinking for faster requests.
    thinking_budget: u32,
}

#[derive(Deserialize)]
struct GeminiResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: ContentResponse,
}

#[derive(Deserialize)]
struct ContentResponse {
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: String,
}

/// Gateway implementation backed by Google's Gemini API.
pub struct GeminiModel {
    client: reqwest::Client,
    api_key: String,
}

impl GeminiModel {
    pub fn from_config() -> Result<Self, GraderError> {
        let api_key = util::config::gemini_api_key();
        if api_key.is_empty() {
            return Err(GraderError::Gateway("GEMINI_API_KEY is not set".into()));
        }
        Ok(Self {
            client: http_client()?,
            api_key,
        })
    }

    fn user_content(text: &str) -> Content {
        Content {
            role: Some("user".into()),
            parts: vec![Part { text: text.to_string() }],
        }
    }
}

#[async_trait]
impl GradingModel for GeminiModel {
    async fn generate(&self, prompt: &GradingPrompt) -> Result<String, GraderError> {
        let request_body = GeminiRequest {
            system_instruction: Content {
                role: None,
                parts: vec![Part {
                    text: prompt.role.clone(),
                }],
            },
            contents: vec![
                Self::user_content(&prompt.context),
                Self::user_content(&prompt.schema),
                Self::user_content(&prompt.instructions),
            ],
            generation_config: Some(GenerationConfig {
                thinking_config: ThinkingConfig { thinking_budget: 0 },
            }),
        };

        let response = self
            .client
            .post(format!("{GEMINI_URL}?key={}", self.api_key))
            .json(&request_body)
            .send()
            .await
            .map_err(|e| GraderError::Gateway(format!("gemini request failed: {e}")))?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|e| GraderError::Gateway(format!("gemini response unreadable: {e}")))?;

        if !status.is_success() {
            return Err(GraderError::Gateway(format!(
                "gemini returned {status}: {response_text}"
            )));
        }

        let response = serde_json::from_str::<GeminiResponse>(&response_text).map_err(|e| {
            GraderError::Gateway(format!(
                "error decoding gemini response body: {e}. Full response: {response_text}"
            ))
        })?;

        response
            .candidates
            .first()
            .and_then(|candidate| candidate.content.parts.first())
            .map(|part| part.text.clone())
            .ok_or_else(|| GraderError::Gateway("gemini reply contained no candidates".into()))
    }
}
