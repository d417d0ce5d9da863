//! The enrichment pipeline.
//!
//! One operation per enrichment kind. Every operation terminates with an
//! [`EnrichmentResult`]; provider-side failures (transport, auth, rate limit,
//! malformed response, timeout) are converted into fallback results and
//! logged, never surfaced to the caller as errors. The pipeline holds no
//! per-call state, so concurrent invocations need no locking.

use std::sync::Arc;
use std::time::Instant;

use tokio::time::timeout;
use tracing::{debug, warn};

use annota_core::{
    defaults, Category, EnrichmentKind, EnrichmentResult, InferenceProvider, Result, Sentiment,
    SuggestionMethod,
};

use crate::config::{EnrichConfig, SummarizeTrigger};
use crate::keywords;
use crate::similarity;

/// Stateless enrichment pipeline over one inference provider.
#[derive(Clone)]
pub struct EnrichmentPipeline {
    provider: Arc<dyn InferenceProvider>,
    config: EnrichConfig,
}

impl EnrichmentPipeline {
    /// Create a pipeline with explicit configuration.
    pub fn new(provider: Arc<dyn InferenceProvider>, config: EnrichConfig) -> Self {
        Self { provider, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &EnrichConfig {
        &self.config
    }

    /// Bounded provider call: a slow provider counts as a failed one.
    async fn bounded<T>(
        &self,
        op: &'static str,
        fut: impl std::future::Future<Output = Result<T>>,
    ) -> Result<T> {
        let start = Instant::now();
        match timeout(self.config.provider_timeout, fut).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(e)) => {
                warn!(
                    subsystem = "enrich",
                    op,
                    model = self.provider.model_name(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "Provider call failed, taking fallback path"
                );
                Err(e)
            }
            Err(_) => {
                warn!(
                    subsystem = "enrich",
                    op,
                    model = self.provider.model_name(),
                    timeout_secs = self.config.provider_timeout.as_secs(),
                    "Provider call timed out, taking fallback path"
                );
                Err(annota_core::Error::Inference(format!(
                    "{} timed out after {:?}",
                    op, self.config.provider_timeout
                )))
            }
        }
    }

    /// Summarize a note's content.
    ///
    /// Content below the configured word threshold never reaches the
    /// provider; neither does anything when the AI flag is off.
    pub async fn summarize(
        &self,
        title: &str,
        content: &str,
        max_chars: Option<usize>,
    ) -> EnrichmentResult {
        let max_chars = max_chars.unwrap_or(self.config.summary_max_chars);

        if !self.config.ai_enabled {
            debug!(subsystem = "enrich", op = "summarize", "AI disabled, fallback");
            return EnrichmentResult::fallback(
                EnrichmentKind::Summarize,
                defaults::SUMMARY_UNAVAILABLE,
            );
        }

        let word_count = content.split_whitespace().count();
        if word_count < self.config.summary_min_words {
            debug!(
                subsystem = "enrich",
                op = "summarize",
                word_count,
                threshold = self.config.summary_min_words,
                "Content below threshold, fallback"
            );
            return EnrichmentResult::fallback(
                EnrichmentKind::Summarize,
                defaults::SUMMARY_TOO_SHORT,
            );
        }

        match self
            .bounded("summarize", self.provider.summarize(title, content, max_chars))
            .await
        {
            Ok(text) => {
                EnrichmentResult::real(EnrichmentKind::Summarize, truncate(&text, max_chars))
            }
            Err(_) => EnrichmentResult::fallback(
                EnrichmentKind::Summarize,
                defaults::SUMMARY_UNAVAILABLE,
            ),
        }
    }

    /// Classify sentiment. Always yields one of the four canonical labels;
    /// unrecognized provider output maps to neutral.
    pub async fn analyze_sentiment(&self, title: &str, content: &str) -> EnrichmentResult {
        if !self.config.ai_enabled {
            debug!(subsystem = "enrich", op = "sentiment", "AI disabled, fallback");
            return EnrichmentResult::fallback(
                EnrichmentKind::Sentiment,
                Sentiment::Neutral.as_str(),
            );
        }

        match self
            .bounded("sentiment", self.provider.classify_sentiment(title, content))
            .await
        {
            Ok(raw) => {
                let sentiment = Sentiment::canonicalize(&raw);
                EnrichmentResult::real(EnrichmentKind::Sentiment, sentiment.as_str())
            }
            Err(_) => EnrichmentResult::fallback(
                EnrichmentKind::Sentiment,
                Sentiment::Neutral.as_str(),
            ),
        }
    }

    /// Suggest a category from the caller's existing categories.
    ///
    /// Zero-shot classification first; below its floor, lexical similarity
    /// against names and descriptions; finally "Uncategorized" at zero
    /// confidence. Keywords are extracted deterministically and attached in
    /// every case.
    pub async fn suggest_category(
        &self,
        title: &str,
        content: &str,
        categories: &[Category],
    ) -> EnrichmentResult {
        let kw = keywords::note_keywords(title, content);

        if !self.config.ai_enabled {
            debug!(subsystem = "enrich", op = "suggest_category", "AI disabled, fallback");
            return uncategorized().with_keywords(kw);
        }

        let candidates: Vec<String> = categories.iter().map(|c| c.name.clone()).collect();

        match self
            .bounded(
                "suggest_category",
                self.provider.suggest_category(content, &candidates),
            )
            .await
        {
            Ok(Some((label, confidence))) if confidence >= self.config.zero_shot_floor => {
                EnrichmentResult::real(EnrichmentKind::SuggestCategory, label)
                    .with_confidence(confidence)
                    .with_method(SuggestionMethod::ZeroShot)
                    .with_keywords(kw)
            }
            Ok(_) => {
                debug!(
                    subsystem = "enrich",
                    op = "suggest_category",
                    floor = self.config.zero_shot_floor,
                    "No zero-shot match above floor, trying lexical similarity"
                );
                match similarity::best_match(title, content, categories) {
                    Some((name, score)) if score >= self.config.similarity_floor => {
                        EnrichmentResult::fallback(EnrichmentKind::SuggestCategory, name)
                            .with_confidence(score)
                            .with_method(SuggestionMethod::Similarity)
                            .with_keywords(kw)
                    }
                    _ => uncategorized().with_keywords(kw),
                }
            }
            Err(_) => uncategorized().with_keywords(kw),
        }
    }

    /// Enrichment performed on every note create/update: sentiment always,
    /// plus summarization when the trigger policy is automatic.
    pub async fn enrich_for_write(&self, title: &str, content: &str) -> Vec<EnrichmentResult> {
        let mut results = vec![self.analyze_sentiment(title, content).await];
        if self.config.summarize_trigger == SummarizeTrigger::Automatic {
            results.push(self.summarize(title, content, None).await);
        }
        results
    }
}

fn uncategorized() -> EnrichmentResult {
    EnrichmentResult::fallback(EnrichmentKind::SuggestCategory, defaults::UNCATEGORIZED)
        .with_confidence(0.0)
        .with_method(SuggestionMethod::Default)
}

fn truncate(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    text.chars().take(max_chars).collect()
}
