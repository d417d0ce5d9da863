//! # annota-inference
//!
//! Inference provider implementations for the annota enrichment pipeline.
//!
//! Two production providers implement [`annota_core::InferenceProvider`]:
//! [`OpenAIProvider`] for hosted OpenAI-compatible endpoints and
//! [`OllamaProvider`] for a local model server. Both express each enrichment
//! task as a chat request built in [`prompts`]. A scriptable [`MockProvider`]
//! is available behind the `mock` feature for tests.

pub mod ollama;
pub mod openai;
pub mod prompts;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

pub use ollama::OllamaProvider;
pub use openai::{OpenAIConfig, OpenAIProvider};

#[cfg(any(test, feature = "mock"))]
pub use mock::MockProvider;

/// Environment variable selecting the provider (`openai` or `ollama`).
pub const PROVIDER_ENV: &str = "ANNOTA_PROVIDER";
