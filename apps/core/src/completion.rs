//! Completion service client (OpenAI-compatible chat completions API).
//!
//! Unlike the knowledge backends, a completion failure is not degraded: it is
//! the one fatal error class and propagates to the caller of the turn.

use crate::config::CompletionConfig;
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::time::timeout;
use tracing::info;

/// Single-turn text completion.
#[async_trait]
pub trait CompletionService: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AppError>;
}

pub struct OpenAiCompletionService {
    config: CompletionConfig,
    client: Client,
    call_timeout: Duration,
}

impl OpenAiCompletionService {
    pub fn new(config: CompletionConfig, call_timeout: Duration) -> Self {
        Self {
            config,
            client: Client::new(),
            call_timeout,
        }
    }
}

#[async_trait]
impl CompletionService for OpenAiCompletionService {
    async fn complete(&self, prompt: &str) -> Result<String, AppError> {
        info!(model = %self.config.model, prompt_len = prompt.len(), "Requesting completion");

        let payload = json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": [{ "role": "user", "content": prompt }],
        });

        let request = self
            .client
            .post(format!("{}/v1/chat/completions", self.config.base_url))
            .bearer_auth(&self.config.api_key)
            .json(&payload)
            .send();

        let res = timeout(self.call_timeout, request)
            .await
            .map_err(|_| {
                AppError::Timeout(format!(
                    "Completion request exceeded {}s",
                    self.call_timeout.as_secs()
                ))
            })?
            .map_err(|e| AppError::Completion(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Completion(format!(
                "Completion request failed with status {}: {}",
                status, body
            )));
        }

        let body: Value = res
            .json()
            .await
            .map_err(|e| AppError::Completion(e.to_string()))?;

        let content = body["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| {
                AppError::Completion("Completion response missing message content".to_string())
            })?;

        Ok(content.trim().to_string())
    }
}

/// Stand-in used when no completion backend is configured. Quick replies,
/// the direct-URL path and feedback capture still work; any path that needs
/// generation fails with a configuration-shaped completion error.
pub struct UnconfiguredCompletion;

#[async_trait]
impl CompletionService for UnconfiguredCompletion {
    async fn complete(&self, _prompt: &str) -> Result<String, AppError> {
        Err(AppError::Completion(
            "No completion service configured (set OPENAI_API_KEY)".to_string(),
        ))
    }
}
