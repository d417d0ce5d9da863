//! Merge step between the pipeline and the note store.
//!
//! Enrichment results are folded into an [`UpdateNote`] patch so the store's
//! partial update overwrites only the derived fields. The merge is
//! last-write-wins per field; category suggestions are advisory and never
//! write note fields here.

use annota_core::{EnrichmentKind, EnrichmentResult, Sentiment, UpdateNote};

/// Build a partial update carrying the derived fields from `results`.
///
/// Later results win when two carry the same kind. Fallback summaries are
/// not persisted (a placeholder is a response payload, not note state);
/// fallback sentiment is, because `Neutral` is the designed default.
pub fn derived_patch(results: &[EnrichmentResult]) -> UpdateNote {
    let mut patch = UpdateNote::default();
    for result in results {
        match result.kind {
            EnrichmentKind::Summarize => {
                if result.is_real() {
                    patch.summary = Some(result.payload.clone());
                }
            }
            EnrichmentKind::Sentiment => {
                patch.sentiment = Some(Sentiment::canonicalize(&result.payload));
            }
            EnrichmentKind::SuggestCategory => {}
        }
    }
    patch
}

/// Overlay `derived` onto a client-supplied patch. Derived fields win.
pub fn overlay(mut base: UpdateNote, derived: UpdateNote) -> UpdateNote {
    if derived.summary.is_some() {
        base.summary = derived.summary;
    }
    if derived.sentiment.is_some() {
        base.sentiment = derived.sentiment;
    }
    base
}
