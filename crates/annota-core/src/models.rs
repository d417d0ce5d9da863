//! Core data models for annota.
//!
//! `Note.summary` and `Note.sentiment` are derived fields: they are written
//! only by the enrichment pipeline, never accepted from clients.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// =============================================================================
// SENTIMENT
// =============================================================================

/// Canonical sentiment classification for a note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
    Mixed,
}

impl Sentiment {
    /// All canonical variants, in match-precedence order.
    pub const ALL: [Sentiment; 4] = [
        Sentiment::Positive,
        Sentiment::Neutral,
        Sentiment::Negative,
        Sentiment::Mixed,
    ];

    /// Stable lowercase label for storage and wire formats.
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
            Sentiment::Mixed => "mixed",
        }
    }

    /// Canonicalize free-form provider output into one of the four variants.
    ///
    /// Matches by case-insensitive substring, in `ALL` order. Anything
    /// unrecognized maps to `Neutral`; this function never fails.
    pub fn canonicalize(raw: &str) -> Sentiment {
        let lower = raw.to_lowercase();
        for variant in Sentiment::ALL {
            if lower.contains(variant.as_str()) {
                return variant;
            }
        }
        Sentiment::Neutral
    }

    /// Parse an exact stored label (as written by `as_str`).
    pub fn from_label(label: &str) -> Option<Sentiment> {
        match label {
            "positive" => Some(Sentiment::Positive),
            "neutral" => Some(Sentiment::Neutral),
            "negative" => Some(Sentiment::Negative),
            "mixed" => Some(Sentiment::Mixed),
            _ => None,
        }
    }
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// NOTE
// =============================================================================

/// A note with optional AI-derived metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub title: String,
    pub content: String,
    /// Referenced category IDs. Dangling references are allowed: deleting a
    /// category does not cascade to notes.
    #[serde(default)]
    pub category_ids: Vec<Uuid>,
    /// Derived: written only by the enrichment pipeline.
    pub summary: Option<String>,
    /// Derived: written only by the enrichment pipeline.
    pub sentiment: Option<Sentiment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// CATEGORY
// =============================================================================

/// A note category. Names are unique within the collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// =============================================================================
// ENRICHMENT RESULTS (transient, never persisted)
// =============================================================================

/// Which enrichment an [`EnrichmentResult`] carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentKind {
    Summarize,
    Sentiment,
    SuggestCategory,
}

/// Whether a result came from a real inference call or a safe default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Provenance {
    /// Produced by the inference provider.
    Real,
    /// Deterministic default substituted when AI is disabled, unavailable,
    /// or the input didn't qualify.
    Fallback,
}

/// Which method produced a category suggestion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionMethod {
    /// Zero-shot classification against existing category names.
    ZeroShot,
    /// Lexical similarity against category names and descriptions.
    Similarity,
    /// No method cleared its confidence floor.
    Default,
}

/// Outcome of a single enrichment operation.
///
/// The pipeline always produces one of these; provider failures are
/// converted to `Fallback` results, never surfaced as errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub kind: EnrichmentKind,
    /// Summary text, canonical sentiment label, or category name.
    pub payload: String,
    /// Confidence in [0, 1]. Only set for category suggestion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
    pub provenance: Provenance,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<SuggestionMethod>,
    /// Keywords extracted from the note, attached to category suggestions.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<String>,
}

impl EnrichmentResult {
    /// A result produced by a real provider call.
    pub fn real(kind: EnrichmentKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            confidence: None,
            provenance: Provenance::Real,
            method: None,
            keywords: Vec::new(),
        }
    }

    /// A deterministic fallback result.
    pub fn fallback(kind: EnrichmentKind, payload: impl Into<String>) -> Self {
        Self {
            kind,
            payload: payload.into(),
            confidence: None,
            provenance: Provenance::Fallback,
            method: None,
            keywords: Vec::new(),
        }
    }

    /// Attach a confidence score (clamped to [0, 1]).
    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Tag the originating suggestion method.
    pub fn with_method(mut self, method: SuggestionMethod) -> Self {
        self.method = Some(method);
        self
    }

    /// Attach extracted keywords.
    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    /// True if this result came from a real inference call.
    pub fn is_real(&self) -> bool {
        self.provenance == Provenance::Real
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonicalize_exact_labels() {
        assert_eq!(Sentiment::canonicalize("Positive"), Sentiment::Positive);
        assert_eq!(Sentiment::canonicalize("negative"), Sentiment::Negative);
        assert_eq!(Sentiment::canonicalize("NEUTRAL"), Sentiment::Neutral);
        assert_eq!(Sentiment::canonicalize("Mixed"), Sentiment::Mixed);
    }

    #[test]
    fn canonicalize_embedded_label() {
        assert_eq!(
            Sentiment::canonicalize("The sentiment is: Positive."),
            Sentiment::Positive
        );
    }

    #[test]
    fn canonicalize_unrecognized_maps_to_neutral() {
        assert_eq!(Sentiment::canonicalize("ecstatic"), Sentiment::Neutral);
        assert_eq!(Sentiment::canonicalize(""), Sentiment::Neutral);
        assert_eq!(Sentiment::canonicalize("42"), Sentiment::Neutral);
    }

    #[test]
    fn sentiment_serializes_snake_case() {
        let json = serde_json::to_string(&Sentiment::Mixed).unwrap();
        assert_eq!(json, "\"mixed\"");
    }

    #[test]
    fn sentiment_label_round_trip() {
        for variant in Sentiment::ALL {
            assert_eq!(Sentiment::from_label(variant.as_str()), Some(variant));
        }
        assert_eq!(Sentiment::from_label("upbeat"), None);
    }

    #[test]
    fn result_confidence_is_clamped() {
        let r = EnrichmentResult::real(EnrichmentKind::SuggestCategory, "Work")
            .with_confidence(1.7);
        assert_eq!(r.confidence, Some(1.0));

        let r = EnrichmentResult::real(EnrichmentKind::SuggestCategory, "Work")
            .with_confidence(-0.3);
        assert_eq!(r.confidence, Some(0.0));
    }

    #[test]
    fn fallback_result_is_not_real() {
        let r = EnrichmentResult::fallback(EnrichmentKind::Sentiment, "neutral");
        assert!(!r.is_real());
        assert_eq!(r.provenance, Provenance::Fallback);
    }

    #[test]
    fn provenance_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&Provenance::Fallback).unwrap(),
            "\"fallback\""
        );
        assert_eq!(
            serde_json::to_string(&SuggestionMethod::ZeroShot).unwrap(),
            "\"zero_shot\""
        );
    }
}
