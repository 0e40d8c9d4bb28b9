use std::sync::Once;

use metrics::{Unit, describe_counter};
use tracing::Subscriber;
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    registry::LookupSpan,
    util::SubscriberInitExt,
};

use crate::application::admin::{
    METRIC_POSTS_CREATED, METRIC_SLUG_COLLISIONS, METRIC_SLUG_LOOKUP_FAILURES,
};
use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static DESCRIBE_ONCE: Once = Once::new();

/// Install the global subscriber. `RUST_LOG` directives refine the configured level.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    DESCRIBE_ONCE.call_once(describe_counters);

    let filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default())
        .with(output_layer(logging.format))
        .try_init()
        .map_err(|err| InfraError::Telemetry(err.to_string()))
}

fn output_layer<S>(format: LogFormat) -> Box<dyn Layer<S> + Send + Sync>
where
    S: Subscriber + for<'span> LookupSpan<'span> + Send + Sync + 'static,
{
    match format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    }
}

fn describe_counters() {
    describe_counter!(
        METRIC_POSTS_CREATED,
        Unit::Count,
        "Posts created through the admin editor."
    );
    describe_counter!(
        METRIC_SLUG_COLLISIONS,
        Unit::Count,
        "Created posts whose slug needed a numeric suffix."
    );
    describe_counter!(
        METRIC_SLUG_LOOKUP_FAILURES,
        Unit::Count,
        "Slug availability checks that failed; the unique constraint decided instead."
    );
}
