//! Mock inference provider for deterministic testing.
//!
//! Scripts per-operation responses and failures, records every call, and
//! exposes call counts so tests can assert exactly which provider operations
//! an enrichment path performed.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;

use annota_core::{Error, InferenceProvider, Result};

/// Mock inference provider for testing.
#[derive(Clone)]
pub struct MockProvider {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

#[derive(Debug, Clone)]
struct MockConfig {
    summary: String,
    sentiment: String,
    category: Option<(String, f32)>,
    fail_summarize: bool,
    fail_sentiment: bool,
    fail_suggest: bool,
    latency: Duration,
    failure_rate: f64,
}

/// One recorded provider invocation.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub operation: String,
    pub input: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            summary: "Mock summary".to_string(),
            sentiment: "Neutral".to_string(),
            category: None,
            fail_summarize: false,
            fail_sentiment: false,
            fail_suggest: false,
            latency: Duration::ZERO,
            failure_rate: 0.0,
        }
    }
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Create a new mock provider with default responses.
    pub fn new() -> Self {
        Self {
            config: Arc::new(MockConfig::default()),
            call_log: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Script the summary text returned by `summarize`.
    pub fn with_summary(mut self, summary: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).summary = summary.into();
        self
    }

    /// Script the raw sentiment label returned by `classify_sentiment`.
    pub fn with_sentiment(mut self, sentiment: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).sentiment = sentiment.into();
        self
    }

    /// Script a category match with confidence.
    pub fn with_category(mut self, name: impl Into<String>, confidence: f32) -> Self {
        Arc::make_mut(&mut self.config).category = Some((name.into(), confidence));
        self
    }

    /// Make `summarize` fail.
    pub fn failing_summarize(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_summarize = true;
        self
    }

    /// Make `classify_sentiment` fail.
    pub fn failing_sentiment(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_sentiment = true;
        self
    }

    /// Make `suggest_category` fail.
    pub fn failing_suggest(mut self) -> Self {
        Arc::make_mut(&mut self.config).fail_suggest = true;
        self
    }

    /// Add artificial latency to every call, for timeout tests.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        Arc::make_mut(&mut self.config).latency = latency;
        self
    }

    /// Make a random fraction of calls fail.
    pub fn with_failure_rate(mut self, rate: f64) -> Self {
        Arc::make_mut(&mut self.config).failure_rate = rate;
        self
    }

    /// All recorded calls, in order.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of calls recorded for one operation.
    pub fn call_count(&self, operation: &str) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation == operation)
            .count()
    }

    /// Total number of calls recorded.
    pub fn total_calls(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    async fn record(&self, operation: &str, input: &str) -> Result<()> {
        self.call_log.lock().unwrap().push(MockCall {
            operation: operation.to_string(),
            input: input.to_string(),
        });

        if !self.config.latency.is_zero() {
            tokio::time::sleep(self.config.latency).await;
        }

        if self.config.failure_rate > 0.0 && rand::random::<f64>() < self.config.failure_rate {
            return Err(Error::Inference("mock: random failure".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl InferenceProvider for MockProvider {
    async fn summarize(&self, _title: &str, content: &str, _max_chars: usize) -> Result<String> {
        self.record("summarize", content).await?;
        if self.config.fail_summarize {
            return Err(Error::Inference("mock: summarize failed".to_string()));
        }
        Ok(self.config.summary.clone())
    }

    async fn classify_sentiment(&self, _title: &str, content: &str) -> Result<String> {
        self.record("classify_sentiment", content).await?;
        if self.config.fail_sentiment {
            return Err(Error::Inference("mock: sentiment failed".to_string()));
        }
        Ok(self.config.sentiment.clone())
    }

    async fn suggest_category(
        &self,
        content: &str,
        candidates: &[String],
    ) -> Result<Option<(String, f32)>> {
        self.record("suggest_category", content).await?;
        if self.config.fail_suggest {
            return Err(Error::Inference("mock: suggest failed".to_string()));
        }

        // A scripted label is only returned if it is actually a candidate,
        // mirroring how the real providers match answers.
        Ok(self
            .config
            .category
            .clone()
            .filter(|(name, _)| candidates.contains(name)))
    }

    fn model_name(&self) -> &str {
        "mock-model"
    }
}
