//! OpenAI-compatible inference provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use annota_core::{defaults, Error, InferenceProvider, Result};

use crate::prompts;

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = defaults::OPENAI_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::OPENAI_GEN_MODEL;

/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = defaults::PROVIDER_TIMEOUT_SECS;

/// Configuration for the OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    /// Base URL for the API endpoint.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    pub api_key: Option<String>,
    /// Model to use for generation.
    pub gen_model: String,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPENAI_URL.to_string(),
            api_key: None,
            gen_model: DEFAULT_GEN_MODEL.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// OpenAI-compatible inference provider.
pub struct OpenAIProvider {
    client: Client,
    config: OpenAIConfig,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct OpenAIErrorResponse {
    error: OpenAIError,
}

#[derive(Debug, Deserialize)]
struct OpenAIError {
    message: String,
}

impl OpenAIProvider {
    /// Create a new provider with the given configuration.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            provider = "openai",
            url = %config.base_url,
            model = %config.gen_model,
            "Initializing OpenAI provider"
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        let config = OpenAIConfig {
            base_url: std::env::var("OPENAI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            api_key: std::env::var("OPENAI_API_KEY").ok(),
            gen_model: std::env::var("OPENAI_GEN_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string()),
            timeout_seconds: std::env::var("OPENAI_TIMEOUT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        };
        Self::new(config)
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    /// True if an API key is configured. Hosted endpoints reject requests
    /// without one, so the server uses this as a startup readiness check.
    pub fn has_credentials(&self) -> bool {
        self.config
            .api_key
            .as_deref()
            .is_some_and(|k| !k.is_empty())
    }

    fn build_request(&self, endpoint: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.config.base_url.trim_end_matches('/'), endpoint);
        let mut req = self.client.post(&url);

        if let Some(ref api_key) = self.config.api_key {
            req = req.header("Authorization", format!("Bearer {}", api_key));
        }

        req.header("Content-Type", "application/json")
    }

    async fn chat(
        &self,
        prompt: prompts::Prompt,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String> {
        let request = ChatCompletionRequest {
            model: self.config.gen_model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: prompt.system,
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: prompt.user,
                },
            ],
            temperature: Some(temperature),
            max_tokens: Some(max_tokens),
        };

        let response = self
            .build_request("/chat/completions")
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body: OpenAIErrorResponse = response.json().await.unwrap_or(OpenAIErrorResponse {
                error: OpenAIError {
                    message: "Unknown error".to_string(),
                },
            });
            warn!(
                subsystem = "inference",
                provider = "openai",
                status = %status,
                "Chat completion rejected"
            );
            return Err(Error::Inference(format!(
                "OpenAI returned {}: {}",
                status, body.error.message
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let answer = result
            .choices
            .first()
            .map(|c| c.message.content.trim().to_string())
            .ok_or_else(|| Error::Inference("Response contained no choices".to_string()))?;

        Ok(answer)
    }
}

#[async_trait]
impl InferenceProvider for OpenAIProvider {
    async fn summarize(&self, title: &str, content: &str, max_chars: usize) -> Result<String> {
        debug!(
            subsystem = "inference",
            provider = "openai",
            op = "summarize",
            content_len = content.len(),
            max_chars,
            "Generating summary"
        );
        // Token budget estimated from the character budget.
        let max_tokens = std::cmp::max(100, max_chars / 3) as u32;
        self.chat(prompts::summarize(title, content, max_chars), max_tokens, 0.3)
            .await
    }

    async fn classify_sentiment(&self, _title: &str, content: &str) -> Result<String> {
        debug!(
            subsystem = "inference",
            provider = "openai",
            op = "sentiment",
            content_len = content.len(),
            "Classifying sentiment"
        );
        self.chat(prompts::sentiment(content), 10, 0.1).await
    }

    async fn suggest_category(
        &self,
        content: &str,
        candidates: &[String],
    ) -> Result<Option<(String, f32)>> {
        if candidates.is_empty() {
            return Ok(None);
        }

        debug!(
            subsystem = "inference",
            provider = "openai",
            op = "suggest_category",
            candidates = candidates.len(),
            "Classifying against candidate categories"
        );

        let answer = self
            .chat(prompts::categorize(content, candidates), 50, 0.2)
            .await?;

        Ok(prompts::match_candidate(&answer, candidates)
            .map(|name| (name, defaults::ZERO_SHOT_ASSUMED_CONFIDENCE)))
    }

    fn model_name(&self) -> &str {
        &self.config.gen_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_uses_hosted_endpoint() {
        let config = OpenAIConfig::default();
        assert_eq!(config.base_url, DEFAULT_OPENAI_URL);
        assert!(config.api_key.is_none());
    }

    #[test]
    fn has_credentials_requires_non_empty_key() {
        let provider = OpenAIProvider::new(OpenAIConfig {
            api_key: Some(String::new()),
            ..Default::default()
        })
        .unwrap();
        assert!(!provider.has_credentials());

        let provider = OpenAIProvider::new(OpenAIConfig {
            api_key: Some("sk-test".to_string()),
            ..Default::default()
        })
        .unwrap();
        assert!(provider.has_credentials());
    }
}
