//! Behavioral tests for the enrichment pipeline against a counting mock
//! provider: fallback policies, flag gating, canonicalization, floors, and
//! bounded provider waits.

use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use annota_core::{Category, EnrichmentKind, Provenance, SuggestionMethod};
use annota_enrich::{EnrichConfig, EnrichmentPipeline, SummarizeTrigger};
use annota_inference::MockProvider;

fn pipeline(provider: MockProvider, config: EnrichConfig) -> EnrichmentPipeline {
    EnrichmentPipeline::new(Arc::new(provider), config)
}

fn category(name: &str) -> Category {
    Category {
        id: Uuid::new_v4(),
        name: name.to_string(),
        description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn words(n: usize) -> String {
    (0..n).map(|i| format!("word{i}")).collect::<Vec<_>>().join(" ")
}

#[tokio::test]
async fn short_content_never_reaches_the_provider() {
    let provider = MockProvider::new();
    let p = pipeline(provider.clone(), EnrichConfig::default());

    let result = p.summarize("t", &words(5), None).await;

    assert_eq!(result.provenance, Provenance::Fallback);
    assert_eq!(result.payload, "summarization not available for short content");
    assert_eq!(provider.call_count("summarize"), 0);
}

#[tokio::test]
async fn disabled_flag_gates_all_three_operations() {
    let provider = MockProvider::new();
    let config = EnrichConfig {
        ai_enabled: false,
        ..Default::default()
    };
    let p = pipeline(provider.clone(), config);

    let summary = p.summarize("t", &words(50), None).await;
    let sentiment = p.analyze_sentiment("t", "great content").await;
    let suggestion = p.suggest_category("t", "c", &[category("Work")]).await;

    assert_eq!(provider.total_calls(), 0);
    assert_eq!(summary.provenance, Provenance::Fallback);
    assert_eq!(summary.payload, "summary unavailable");
    assert_eq!(sentiment.provenance, Provenance::Fallback);
    assert_eq!(sentiment.payload, "neutral");
    assert_eq!(suggestion.provenance, Provenance::Fallback);
    assert_eq!(suggestion.payload, "Uncategorized");
    assert_eq!(suggestion.confidence, Some(0.0));
}

#[tokio::test]
async fn sentiment_is_always_canonical() {
    let canonical = ["positive", "neutral", "negative", "mixed"];

    for raw in ["Positive", "the text is NEGATIVE overall", "bananas", ""] {
        let provider = MockProvider::new().with_sentiment(raw);
        let p = pipeline(provider, EnrichConfig::default());

        let result = p.analyze_sentiment("t", "some content").await;
        assert!(
            canonical.contains(&result.payload.as_str()),
            "payload {:?} for raw {:?}",
            result.payload,
            raw
        );
    }

    // Unrecognized output maps to the fail-safe default.
    let provider = MockProvider::new().with_sentiment("ecstatic beyond words");
    let p = pipeline(provider, EnrichConfig::default());
    let result = p.analyze_sentiment("t", "c").await;
    assert_eq!(result.payload, "neutral");
    assert_eq!(result.provenance, Provenance::Real);
}

#[tokio::test]
async fn suggestion_confidence_stays_in_unit_interval() {
    let provider = MockProvider::new().with_category("Work", 7.5);
    let p = pipeline(provider, EnrichConfig::default());

    let result = p.suggest_category("t", "c", &[category("Work")]).await;
    let confidence = result.confidence.unwrap();
    assert!((0.0..=1.0).contains(&confidence));
}

#[tokio::test]
async fn no_match_above_floor_yields_uncategorized_at_zero() {
    // Provider yields nothing and the note shares no vocabulary with any
    // category, so the similarity secondary also comes up empty.
    let provider = MockProvider::new();
    let p = pipeline(provider, EnrichConfig::default());

    let result = p
        .suggest_category("zzz", "qqq xyzzy", &[category("Finance")])
        .await;

    assert_eq!(result.payload, "Uncategorized");
    assert_eq!(result.confidence, Some(0.0));
    assert_eq!(result.method, Some(SuggestionMethod::Default));
}

#[tokio::test]
async fn sentiment_is_idempotent_with_deterministic_provider() {
    let provider = MockProvider::new().with_sentiment("Mixed");
    let p = pipeline(provider, EnrichConfig::default());

    let first = p.analyze_sentiment("Trip", "Good hotel, awful weather.").await;
    let second = p.analyze_sentiment("Trip", "Good hotel, awful weather.").await;

    assert_eq!(first.payload, second.payload);
    assert_eq!(first.provenance, second.provenance);
}

#[tokio::test]
async fn qualifying_content_gets_a_real_summary() {
    let provider = MockProvider::new().with_summary("This is a summary.");
    let p = pipeline(provider.clone(), EnrichConfig::default());

    let result = p.summarize("t", &words(30), None).await;

    assert_eq!(result.payload, "This is a summary.");
    assert_eq!(result.provenance, Provenance::Real);
    assert_eq!(provider.call_count("summarize"), 1);
}

#[tokio::test]
async fn provider_timeout_degrades_sentiment_to_neutral() {
    let provider = MockProvider::new()
        .with_sentiment("Positive")
        .with_latency(Duration::from_millis(200));
    let config = EnrichConfig {
        provider_timeout: Duration::from_millis(20),
        ..Default::default()
    };
    let p = pipeline(provider, config);

    let result = p.analyze_sentiment("t", "content").await;

    assert_eq!(result.payload, "neutral");
    assert_eq!(result.provenance, Provenance::Fallback);
}

#[tokio::test]
async fn confident_zero_shot_match_is_returned_as_real() {
    let provider = MockProvider::new().with_category("Work", 0.92);
    let p = pipeline(provider, EnrichConfig::default());

    let result = p
        .suggest_category("t", "quarterly planning", &[category("Work"), category("Personal")])
        .await;

    assert_eq!(result.payload, "Work");
    assert!((result.confidence.unwrap() - 0.92).abs() < 1e-6);
    assert_eq!(result.provenance, Provenance::Real);
    assert_eq!(result.method, Some(SuggestionMethod::ZeroShot));
}

#[tokio::test]
async fn below_floor_match_falls_back_to_similarity() {
    // Zero-shot confidence under the 0.45 floor; the note mentions the
    // category name, so lexical similarity takes over.
    let provider = MockProvider::new().with_category("Cooking", 0.2);
    let p = pipeline(provider, EnrichConfig::default());

    let result = p
        .suggest_category("Dinner", "A new cooking recipe to try.", &[category("Cooking")])
        .await;

    assert_eq!(result.payload, "Cooking");
    assert_eq!(result.method, Some(SuggestionMethod::Similarity));
    assert!(result.confidence.unwrap() >= 0.35);
}

#[tokio::test]
async fn provider_failure_yields_uncategorized() {
    let provider = MockProvider::new().failing_suggest();
    let p = pipeline(provider, EnrichConfig::default());

    let result = p
        .suggest_category("Dinner", "A new cooking recipe.", &[category("Cooking")])
        .await;

    assert_eq!(result.payload, "Uncategorized");
    assert_eq!(result.confidence, Some(0.0));
    assert_eq!(result.provenance, Provenance::Fallback);
}

#[tokio::test]
async fn suggestions_always_carry_keywords() {
    let provider = MockProvider::new();
    let config = EnrichConfig {
        ai_enabled: false,
        ..Default::default()
    };
    let p = pipeline(provider, config);

    let result = p
        .suggest_category("Groceries", "Buy vegetables and cheese for dinner.", &[])
        .await;

    assert!(result.keywords.contains(&"groceries".to_string()));
    assert!(result.keywords.len() <= 5);
}

#[tokio::test]
async fn write_enrichment_runs_sentiment_only_when_on_demand() {
    let provider = MockProvider::new().with_sentiment("Positive");
    let p = pipeline(provider.clone(), EnrichConfig::default());

    let results = p.enrich_for_write("t", &words(40)).await;

    assert_eq!(results.len(), 1);
    assert_eq!(results[0].kind, EnrichmentKind::Sentiment);
    assert_eq!(provider.call_count("summarize"), 0);
}

#[tokio::test]
async fn write_enrichment_also_summarizes_when_automatic() {
    let provider = MockProvider::new().with_summary("Auto summary.");
    let config = EnrichConfig {
        summarize_trigger: SummarizeTrigger::Automatic,
        ..Default::default()
    };
    let p = pipeline(provider.clone(), config);

    let results = p.enrich_for_write("t", &words(40)).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[1].kind, EnrichmentKind::Summarize);
    assert_eq!(results[1].payload, "Auto summary.");
    assert_eq!(provider.call_count("summarize"), 1);
}
