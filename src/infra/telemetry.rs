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

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install the global tracing subscriber.
///
/// Events go to stderr so command output on stdout stays machine readable.
/// `RUST_LOG` directives refine the configured level.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(io::stderr)
            .with_current_span(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(io::stderr)
            .with_target(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| InfraError::telemetry(format!("failed to install tracing subscriber: {err}")))
}

fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "foodable_query_hit_total",
            Unit::Count,
            "Total number of queries served from a fresh cache entry."
        );
        describe_counter!(
            "foodable_query_miss_total",
            Unit::Count,
            "Total number of queries that issued a network fetch."
        );
        describe_counter!(
            "foodable_query_dedup_total",
            Unit::Count,
            "Total number of queries that joined a fetch already in flight."
        );
        describe_counter!(
            "foodable_query_discard_total",
            Unit::Count,
            "Total number of responses discarded as superseded or evicted."
        );
        describe_counter!(
            "foodable_mutation_total",
            Unit::Count,
            "Total number of mutations run, labelled by name and result."
        );
    });
}
