//! Ollama inference provider implementation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use annota_core::{defaults, Error, InferenceProvider, Result};

use crate::prompts;

/// Default Ollama endpoint.
pub const DEFAULT_OLLAMA_URL: &str = defaults::OLLAMA_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::OLLAMA_GEN_MODEL;

/// Ollama inference provider, speaking the local `/api/chat` endpoint.
pub struct OllamaProvider {
    client: Client,
    base_url: String,
    gen_model: String,
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    options: ChatOptions,
}

#[derive(Debug, Serialize)]
struct ChatOptions {
    temperature: f32,
    num_predict: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: ChatMessage,
}

impl OllamaProvider {
    /// Create a new Ollama provider with default settings.
    pub fn new() -> Result<Self> {
        Self::with_config(
            DEFAULT_OLLAMA_URL.to_string(),
            DEFAULT_GEN_MODEL.to_string(),
            defaults::PROVIDER_TIMEOUT_SECS,
        )
    }

    /// Create a new Ollama provider with custom configuration.
    pub fn with_config(base_url: String, gen_model: String, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "inference",
            provider = "ollama",
            url = %base_url,
            model = %gen_model,
            "Initializing Ollama provider"
        );

        Ok(Self {
            client,
            base_url,
            gen_model,
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("OLLAMA_BASE").unwrap_or_else(|_| DEFAULT_OLLAMA_URL.to_string());
        let gen_model =
            std::env::var("OLLAMA_GEN_MODEL").unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string());
        let timeout_secs = std::env::var("OLLAMA_TIMEOUT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults::PROVIDER_TIMEOUT_SECS);

        Self::with_config(base_url, gen_model, timeout_secs)
    }

    async fn chat(
        &self,
        prompt: prompts::Prompt,
        num_predict: i32,
        temperature: f32,
    ) -> Result<String> {
        let request = ChatRequest {
            model: self.gen_model.clone(),
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
            stream: false,
            options: ChatOptions {
                temperature,
                num_predict,
            },
        };

        let url = format!("{}/api/chat", self.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Inference(format!(
                "Ollama returned {}: {}",
                status, body
            )));
        }

        let result: ChatResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        Ok(result.message.content.trim().to_string())
    }
}

#[async_trait]
impl InferenceProvider for OllamaProvider {
    async fn summarize(&self, title: &str, content: &str, max_chars: usize) -> Result<String> {
        debug!(
            subsystem = "inference",
            provider = "ollama",
            op = "summarize",
            content_len = content.len(),
            max_chars,
            "Generating summary"
        );
        let num_predict = std::cmp::max(100, max_chars / 3) as i32;
        self.chat(prompts::summarize(title, content, max_chars), num_predict, 0.3)
            .await
    }

    async fn classify_sentiment(&self, _title: &str, content: &str) -> Result<String> {
        debug!(
            subsystem = "inference",
            provider = "ollama",
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
            provider = "ollama",
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
        &self.gen_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_config_keeps_model_name() {
        let provider = OllamaProvider::with_config(
            "http://localhost:11434".to_string(),
            "qwen2.5:3b".to_string(),
            5,
        )
        .unwrap();
        assert_eq!(provider.model_name(), "qwen2.5:3b");
    }
}
