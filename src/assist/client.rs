// SPDX-License-Identifier: MIT
// AI writing assistant — completion endpoint client.

//! HTTP client for the chat-completion endpoint.
//!
//! One operation: send the composed prompt pair and return the first
//! choice's message content. Missing keys, transport failures, non-2xx
//! statuses, and empty choice lists all map to [`GenerationError`] — the
//! dialog surfaces them and keeps its content.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::assist::prompt::{user_prompt, SYSTEM_PROMPT};
use crate::assist::{AssistRequest, GenerationError};
use crate::config::CompletionConfig;

// ─── Client seam ──────────────────────────────────────────────────────────────

/// The completion seam. The HTTP client below is the production
/// implementation; tests substitute fakes.
#[async_trait]
pub trait CompletionApi: Send + Sync {
    async fn generate(&self, request: &AssistRequest) -> Result<String, GenerationError>;
}

// ─── Wire types ───────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: String,
}

// ─── HTTP implementation ──────────────────────────────────────────────────────

pub struct HttpCompletionClient {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl HttpCompletionClient {
    pub fn new(config: &CompletionConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.resolve_api_key(),
            model: config.model.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
        })
    }
}

#[async_trait]
impl CompletionApi for HttpCompletionClient {
    async fn generate(&self, request: &AssistRequest) -> Result<String, GenerationError> {
        let key = self
            .api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(GenerationError::MissingApiKey)?;

        let body = ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: user_prompt(request),
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        };

        let url = format!("{}/chat/completions", self.base_url);
        debug!(field = %request.field_name, model = %self.model, "requesting generation");

        let resp = self
            .client
            .post(&url)
            .bearer_auth(key)
            .json(&body)
            .send()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "completion endpoint refused");
            return Err(GenerationError::Status {
                status: status.as_u16(),
            });
        }

        let parsed: ChatCompletionResponse = resp
            .json()
            .await
            .map_err(|e| GenerationError::Transport(e.to_string()))?;
        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or(GenerationError::NoChoices)?;
        Ok(choice.message.content)
    }
}
