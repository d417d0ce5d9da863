//! Shared application state.

use std::num::NonZeroU32;
use std::sync::Arc;
use std::time::Duration;

use governor::Quota;
use tracing::warn;

use annota_core::defaults;
use annota_db::Database;
use annota_enrich::EnrichmentPipeline;

/// State handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub pipeline: EnrichmentPipeline,
    /// Global rate limiter; `None` disables limiting.
    pub rate_limiter: Option<Arc<governor::DefaultDirectRateLimiter>>,
}

impl AppState {
    /// State without rate limiting, as used by tests.
    pub fn new(db: Database, pipeline: EnrichmentPipeline) -> Self {
        Self {
            db,
            pipeline,
            rate_limiter: None,
        }
    }
}

/// Build the limiter quota from configured values.
///
/// Zero or out-of-range settings are configuration mistakes, not reasons
/// to refuse startup: they are logged and replaced with the defaults.
pub fn rate_limit_quota(requests: u64, period_secs: u64) -> Quota {
    let burst = u32::try_from(requests)
        .ok()
        .and_then(NonZeroU32::new)
        .unwrap_or_else(|| {
            warn!(
                requests,
                default = defaults::RATE_LIMIT_REQUESTS,
                "RATE_LIMIT_REQUESTS out of range, using default"
            );
            NonZeroU32::new(defaults::RATE_LIMIT_REQUESTS as u32).unwrap_or(NonZeroU32::MIN)
        });

    let period_secs = if period_secs == 0 {
        warn!(
            default = defaults::RATE_LIMIT_PERIOD_SECS,
            "RATE_LIMIT_PERIOD_SECS must be non-zero, using default"
        );
        defaults::RATE_LIMIT_PERIOD_SECS
    } else {
        period_secs
    };

    Quota::with_period(Duration::from_secs(period_secs))
        .unwrap_or_else(|| Quota::per_minute(burst))
        .allow_burst(burst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quota_uses_configured_values() {
        let quota = rate_limit_quota(25, 30);
        assert_eq!(quota.burst_size().get(), 25);
        assert_eq!(quota.replenish_interval(), Duration::from_secs(30));
    }

    #[test]
    fn zero_requests_falls_back_to_default() {
        let quota = rate_limit_quota(0, 30);
        assert_eq!(quota.burst_size().get(), defaults::RATE_LIMIT_REQUESTS as u32);
    }

    #[test]
    fn zero_period_falls_back_to_default() {
        let quota = rate_limit_quota(25, 0);
        assert_eq!(
            quota.replenish_interval(),
            Duration::from_secs(defaults::RATE_LIMIT_PERIOD_SECS)
        );
    }

    #[test]
    fn oversized_requests_falls_back_to_default() {
        let quota = rate_limit_quota(u64::MAX, 30);
        assert_eq!(quota.burst_size().get(), defaults::RATE_LIMIT_REQUESTS as u32);
    }
}
