//! Local Language Model Integration
//!
//! Forwards mentor questions to a locally running model server and returns
//! its text unchanged. The server speaks the Ollama generate API.

use async_trait::async_trait;
use log::info;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LlmError {
    #[error("Failed to reach language model: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Language model request failed with status {status}: {body}")]
    Status { status: u16, body: String },
}

/// Anything that can answer a free-text question
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Answer `question`; an absent question is passed through untouched
    async fn get_response(&self, question: Option<&str>) -> Result<String, LlmError>;
}

/// Connection settings for the local model server
#[derive(Debug, Clone, PartialEq)]
pub struct LlmConfig {
    pub base_url: String,
    pub model: String,
    pub system_prompt: Option<String>,
}

pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly career mentor for school and college students. \
Answer questions about courses, degrees, colleges and careers clearly and briefly.";

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:11434".to_string(),
            model: "llama3".to_string(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
        }
    }
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    stream: bool,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

/// HTTP client for the local model server
pub struct LocalLlm {
    client: reqwest::Client,
    config: LlmConfig,
}

impl LocalLlm {
    pub fn new(config: LlmConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn endpoint(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl AnswerProvider for LocalLlm {
    async fn get_response(&self, question: Option<&str>) -> Result<String, LlmError> {
        info!(
            "Forwarding question to {} ({} chars)",
            self.config.model,
            question.map(str::len).unwrap_or(0)
        );

        let payload = GenerateRequest {
            model: &self.config.model,
            prompt: question,
            system: self.config.system_prompt.as_deref(),
            stream: false,
        };

        let res = self.client.post(self.endpoint()).json(&payload).send().await?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = res.json().await?;
        Ok(parsed.response)
    }
}
