//! Subscriber setup: filter, stderr log lines, and file-exported spans.

use super::tracer::{self, SCOPE};
use crate::Config;
use opentelemetry::trace::TracerProvider as _;
use opentelemetry::KeyValue;
use opentelemetry_sdk::resource::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// File name of the trace export inside the data directory.
pub const TRACE_FILE: &str = "ping-pet-otlp.json";

/// Installs the global subscriber.
///
/// The filter comes from `RUST_LOG` when set, otherwise from
/// `config.trace_level`, otherwise `"info"`. Events are printed to stderr and
/// spans are exported to `TRACE_FILE` under
/// [`get_data_dir`](crate::infrastructure::get_data_dir).
///
/// Observability is optional: if the data directory cannot be created only
/// the stderr layer is installed, and a second call is a no-op.
///
/// ```
/// use ping_pet::observability::init_tracing;
/// use ping_pet::Config;
///
/// let config = Config {
///     trace_level: Some("debug".to_string()),
///     ..Config::default()
/// };
/// init_tracing(&config);
/// tracing::debug!("tracing is now active");
/// ```
pub fn init_tracing(config: &Config) {
    let level = config.trace_level.as_deref().unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false);

    let data_dir = crate::infrastructure::get_data_dir();
    let otel_layer = std::fs::create_dir_all(&data_dir).ok().map(|()| {
        let resource = Resource::new(vec![KeyValue::new("service.name", "PingPet")]);
        let provider = tracer::create_tracer_provider(data_dir.join(TRACE_FILE), resource);
        OpenTelemetryLayer::new(provider.tracer(SCOPE))
    });

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .with(otel_layer)
        .try_init();
}
