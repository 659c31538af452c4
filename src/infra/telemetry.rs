use std::io;
use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

pub const FETCH_CACHE_HIT_TOTAL: &str = "folio_fetch_cache_hit_total";
pub const FETCH_CACHE_MISS_TOTAL: &str = "folio_fetch_cache_miss_total";
pub const FETCH_CACHE_INVALIDATE_TOTAL: &str = "folio_fetch_cache_invalidate_total";

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
///
/// Output goes to stderr so the terminal browser can own stdout.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_target(true)
            .with_writer(io::stderr)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            FETCH_CACHE_HIT_TOTAL,
            Unit::Count,
            "Reads answered by an existing fetch cache entry."
        );
        describe_counter!(
            FETCH_CACHE_MISS_TOTAL,
            Unit::Count,
            "Reads that invoked the fetch factory."
        );
        describe_counter!(
            FETCH_CACHE_INVALIDATE_TOTAL,
            Unit::Count,
            "Fetch cache entries removed by invalidation."
        );
    });
}
