//! annota-api - HTTP API server for annota

use std::net::SocketAddr;
use std::sync::Arc;

use governor::RateLimiter;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use annota_api::{build_router, AppState};
use annota_core::InferenceProvider;
use annota_db::Database;
use annota_enrich::{EnrichConfig, EnrichmentPipeline};
use annota_inference::{OllamaProvider, OpenAIProvider};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing with configurable output
    //
    // Environment variables:
    //   LOG_FORMAT  - "json" or "text" (default: "text")
    //   LOG_FILE    - path to log file (optional, enables file logging)
    //   RUST_LOG    - standard env filter (default: "annota_api=debug,tower_http=debug")
    let log_format = std::env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string());
    let log_file = std::env::var("LOG_FILE").ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "annota_api=debug,tower_http=debug".into());

    let registry = tracing_subscriber::registry().with(env_filter);

    let _file_guard = if let Some(ref path) = log_file {
        let file_dir = std::path::Path::new(path)
            .parent()
            .unwrap_or(std::path::Path::new("."));
        let file_name = std::path::Path::new(path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or("annota-api.log");
        let file_appender = tracing_appender::rolling::daily(file_dir, file_name);
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

        if log_format == "json" {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(non_blocking),
                )
                .init();
        } else {
            registry
                .with(
                    tracing_subscriber::fmt::layer()
                        .with_writer(non_blocking)
                        .with_ansi(false),
                )
                .init();
        }
        Some(guard)
    } else if log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .init();
        None
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
        None
    };

    info!(
        log_format = %log_format,
        log_file = log_file.as_deref().unwrap_or("(stdout)"),
        "Logging initialized"
    );

    let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(annota_core::defaults::SERVER_PORT);

    // Rate limiting configuration
    let rate_limit_requests: u64 = std::env::var("RATE_LIMIT_REQUESTS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(annota_core::defaults::RATE_LIMIT_REQUESTS);
    let rate_limit_period_secs: u64 = std::env::var("RATE_LIMIT_PERIOD_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(annota_core::defaults::RATE_LIMIT_PERIOD_SECS);
    let rate_limit_enabled: bool = std::env::var("RATE_LIMIT_ENABLED")
        .map(|v| v == "true" || v == "1")
        .unwrap_or(true);

    info!(
        enabled = rate_limit_enabled,
        requests = rate_limit_requests,
        period_secs = rate_limit_period_secs,
        "Rate limiting configured"
    );

    // Backing store: Postgres by default, in-memory via ANNOTA_STORE=memory
    let db = Database::from_env().await?;
    db.migrate().await?;
    info!("Store ready");

    // Enrichment configuration and provider selection. If the flag says AI
    // is on but the hosted provider has no credentials, the server runs with
    // enrichment effectively disabled instead of failing every request.
    let mut enrich_config = EnrichConfig::from_env()?;
    let provider_name = std::env::var(annota_inference::PROVIDER_ENV)
        .unwrap_or_else(|_| "openai".to_string());

    let provider: Arc<dyn InferenceProvider> = match provider_name.to_lowercase().as_str() {
        "openai" => {
            let p = OpenAIProvider::from_env()?;
            if enrich_config.ai_enabled && !p.has_credentials() {
                warn!(
                    "OPENAI_API_KEY not set; enrichment will serve fallback results only"
                );
                enrich_config = enrich_config.effectively_disabled();
            }
            Arc::new(p)
        }
        "ollama" => Arc::new(OllamaProvider::from_env()?),
        other => {
            anyhow::bail!(
                "unknown {} value '{}', expected 'openai' or 'ollama'",
                annota_inference::PROVIDER_ENV,
                other
            );
        }
    };
    info!(
        provider = %provider_name,
        model = provider.model_name(),
        ai_enabled = enrich_config.ai_enabled,
        "Enrichment pipeline initialized"
    );

    let pipeline = EnrichmentPipeline::new(provider, enrich_config);

    let rate_limiter = if rate_limit_enabled {
        let quota = annota_api::rate_limit_quota(rate_limit_requests, rate_limit_period_secs);
        Some(Arc::new(RateLimiter::direct(quota)))
    } else {
        None
    };

    let state = AppState {
        db,
        pipeline,
        rate_limiter,
    };

    let app = build_router(state);

    let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
