//! Centralized default constants for annota.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// ENRICHMENT
// =============================================================================

/// Minimum word count before summarization is attempted.
pub const SUMMARY_MIN_WORDS: usize = 20;

/// Default maximum summary length in characters.
pub const SUMMARY_MAX_CHARS: usize = 150;

/// Confidence floor for zero-shot category classification.
pub const ZERO_SHOT_FLOOR: f32 = 0.45;

/// Confidence floor for the lexical-similarity fallback categorizer.
pub const SIMILARITY_FLOOR: f32 = 0.35;

/// Confidence assigned to a zero-shot label the provider committed to
/// without reporting a score.
pub const ZERO_SHOT_ASSUMED_CONFIDENCE: f32 = 0.9;

/// Category name used when no suggestion clears its floor.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Placeholder summary for content below the word threshold.
pub const SUMMARY_TOO_SHORT: &str = "summarization not available for short content";

/// Placeholder summary when the provider fails.
pub const SUMMARY_UNAVAILABLE: &str = "summary unavailable";

/// Maximum keywords attached to a category suggestion.
pub const MAX_KEYWORDS: usize = 5;

// =============================================================================
// INFERENCE
// =============================================================================

/// Default OpenAI-compatible API endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default hosted generation model.
pub const OPENAI_GEN_MODEL: &str = "gpt-4o-mini";

/// Default Ollama base URL.
pub const OLLAMA_URL: &str = "http://127.0.0.1:11434";

/// Default local generation model (Ollama).
pub const OLLAMA_GEN_MODEL: &str = "llama3.1:8b";

/// Bounded wait for a single provider call, in seconds. A slow provider is
/// treated as failed after this long and the fallback path taken.
pub const PROVIDER_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// PAGINATION
// =============================================================================

/// Default page size for list endpoints.
pub const PAGE_LIMIT: i64 = 50;

/// Default page offset.
pub const PAGE_OFFSET: i64 = 0;

// =============================================================================
// SERVER
// =============================================================================

/// Default HTTP server port.
pub const SERVER_PORT: u16 = 3000;

/// Default rate limit: max requests per period.
pub const RATE_LIMIT_REQUESTS: u64 = 100;

/// Default rate limit: period in seconds.
pub const RATE_LIMIT_PERIOD_SECS: u64 = 60;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn floors_are_within_unit_interval() {
        assert!(ZERO_SHOT_FLOOR > 0.0 && ZERO_SHOT_FLOOR < 1.0);
        assert!(SIMILARITY_FLOOR > 0.0 && SIMILARITY_FLOOR < 1.0);
        assert!(SIMILARITY_FLOOR < ZERO_SHOT_FLOOR);
    }
}
