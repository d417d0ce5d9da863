//! # annota-enrich
//!
//! The enrichment pipeline: summarization, sentiment classification, and
//! category suggestion over a pluggable inference provider, with
//! deterministic fallbacks whenever AI is disabled, unqualified, or
//! unavailable. Callers always receive an [`annota_core::EnrichmentResult`]
//! with its provenance marked; provider failures never escape this crate
//! as errors.

pub mod config;
pub mod keywords;
pub mod merge;
pub mod pipeline;
pub mod similarity;

pub use config::{EnrichConfig, SummarizeTrigger};
pub use merge::{derived_patch, overlay};
pub use pipeline::EnrichmentPipeline;
