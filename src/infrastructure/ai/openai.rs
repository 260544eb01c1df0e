use crate::core::errors::LedgerError;
use crate::infrastructure::ai::BudgetPlanner;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

/// Client for an OpenAI-compatible chat completions endpoint.
pub struct OpenAiPlanner {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

impl OpenAiPlanner {
    pub fn new(base_url: String, api_key: String, model: String, timeout: Duration) -> Result<Self, LedgerError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| LedgerError::InternalServerError(format!("HTTP client error: {}", e)))?;
        Ok(OpenAiPlanner {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
            model,
        })
    }
}

fn upstream_failure(e: reqwest::Error) -> LedgerError {
    warn!(error = %e, "chat completion request failed");
    LedgerError::AiGenerationFailed
}

#[async_trait]
impl BudgetPlanner for OpenAiPlanner {
    async fn complete(&self, prompt: &str) -> Result<String, LedgerError> {
        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "system",
                content: prompt,
            }],
        };
        let response: ChatResponse = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(upstream_failure)?
            .json()
            .await
            .map_err(upstream_failure)?;

        response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(LedgerError::AiGenerationFailed)
    }
}
