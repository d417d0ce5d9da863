//! Enrichment pipeline configuration.
//!
//! All knobs are read once at startup and injected into the pipeline
//! constructor. Nothing here is consulted from ambient global state at call
//! time, so tests can exercise both flag states deterministically.

use std::time::Duration;

use annota_core::{defaults, Error, Result};

/// When summarization runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummarizeTrigger {
    /// Only when a client calls the summarize endpoint.
    OnDemand,
    /// Additionally on every note create/update.
    Automatic,
}

impl SummarizeTrigger {
    /// Parse a config value (`on-demand` or `automatic`).
    pub fn parse(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "on-demand" | "on_demand" | "ondemand" => Ok(Self::OnDemand),
            "automatic" | "auto" => Ok(Self::Automatic),
            other => Err(Error::Config(format!(
                "unknown SUMMARIZE_TRIGGER value '{}', expected 'on-demand' or 'automatic'",
                other
            ))),
        }
    }
}

/// Pipeline configuration.
#[derive(Debug, Clone)]
pub struct EnrichConfig {
    /// Global AI toggle. When false no provider call is ever attempted and
    /// every operation returns its documented fallback.
    pub ai_enabled: bool,
    /// Summarization policy. Two behaviors exist historically (hosted
    /// on-demand vs local automatic-on-write); the choice is explicit
    /// configuration, never guessed.
    pub summarize_trigger: SummarizeTrigger,
    /// Minimum content word count before summarization calls the provider.
    pub summary_min_words: usize,
    /// Default summary character budget when the caller passes none.
    pub summary_max_chars: usize,
    /// Minimum zero-shot confidence before a suggestion is accepted.
    pub zero_shot_floor: f32,
    /// Minimum lexical-similarity score for the secondary categorizer.
    pub similarity_floor: f32,
    /// Bounded wait for one provider call. Elapse counts as provider failure.
    pub provider_timeout: Duration,
}

impl Default for EnrichConfig {
    fn default() -> Self {
        Self {
            ai_enabled: true,
            summarize_trigger: SummarizeTrigger::OnDemand,
            summary_min_words: defaults::SUMMARY_MIN_WORDS,
            summary_max_chars: defaults::SUMMARY_MAX_CHARS,
            zero_shot_floor: defaults::ZERO_SHOT_FLOOR,
            similarity_floor: defaults::SIMILARITY_FLOOR,
            provider_timeout: Duration::from_secs(defaults::PROVIDER_TIMEOUT_SECS),
        }
    }
}

impl EnrichConfig {
    /// Load from environment variables, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        let ai_enabled = std::env::var("ENABLE_AI")
            .map(|v| v == "1" || v.to_lowercase() == "true")
            .unwrap_or(true);

        let summarize_trigger = match std::env::var("SUMMARIZE_TRIGGER") {
            Ok(v) => SummarizeTrigger::parse(&v)?,
            Err(_) => SummarizeTrigger::OnDemand,
        };

        let summary_min_words = std::env::var("SUMMARY_MIN_WORDS")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults::SUMMARY_MIN_WORDS);

        let provider_timeout = std::env::var("ANNOTA_PROVIDER_TIMEOUT_SECS")
            .ok()
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(defaults::PROVIDER_TIMEOUT_SECS));

        Ok(Self {
            ai_enabled,
            summarize_trigger,
            summary_min_words,
            provider_timeout,
            ..Default::default()
        })
    }

    /// Return a copy with AI disabled, used when startup detects the flag is
    /// on but no provider credentials exist.
    pub fn effectively_disabled(mut self) -> Self {
        self.ai_enabled = false;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trigger_parses_both_spellings() {
        assert_eq!(
            SummarizeTrigger::parse("on-demand").unwrap(),
            SummarizeTrigger::OnDemand
        );
        assert_eq!(
            SummarizeTrigger::parse("Automatic").unwrap(),
            SummarizeTrigger::Automatic
        );
        assert!(SummarizeTrigger::parse("sometimes").is_err());
    }

    #[test]
    fn default_config_is_on_demand_with_hosted_threshold() {
        let config = EnrichConfig::default();
        assert!(config.ai_enabled);
        assert_eq!(config.summarize_trigger, SummarizeTrigger::OnDemand);
        assert_eq!(config.summary_min_words, 20);
    }

    #[test]
    fn effectively_disabled_flips_only_the_flag() {
        let config = EnrichConfig::default().effectively_disabled();
        assert!(!config.ai_enabled);
        assert_eq!(config.summary_min_words, 20);
    }
}
