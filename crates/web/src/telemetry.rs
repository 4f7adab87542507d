use driver_log_core::adapters::config::server_config::TelemetryConfig;
use opentelemetry::KeyValue;
use opentelemetry_otlp::WithExportConfig;
use opentelemetry_sdk::trace as sdktrace;
use opentelemetry_sdk::Resource;
use tracing_opentelemetry::OpenTelemetryLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

use crate::prettyprint::PrettyFormatter;

pub const DEFAULT_FILTER: &str = "driver_log_web=info,driver_log_core=info,tower_http=info";
const SERVICE_NAME: &str = "driver_log_web";

pub fn setup_tracing(config: &TelemetryConfig) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let stdout_layer = tracing_subscriber::fmt::layer()
        .event_format(PrettyFormatter::new(true))
        .with_writer(std::io::stdout);

    let log_file_layer = match &config.log_file {
        Some(path) => Some(
            tracing_subscriber::fmt::layer()
                .event_format(PrettyFormatter::new(false))
                .with_writer(std::fs::File::create(path)?)
                .with_ansi(false),
        ),
        None => None,
    };

    let otel_layer = match &config.otlp_endpoint {
        Some(endpoint) => {
            let exporter = opentelemetry_otlp::new_exporter()
                .tonic()
                .with_endpoint(endpoint);

            let tracer = opentelemetry_otlp::new_pipeline()
                .tracing()
                .with_exporter(exporter)
                .with_trace_config(sdktrace::config().with_resource(Resource::new(vec![
                    KeyValue::new("service.name", SERVICE_NAME),
                ])))
                .install_batch(opentelemetry_sdk::runtime::Tokio)?;

            Some(OpenTelemetryLayer::new(tracer))
        }
        None => None,
    };

    Registry::default()
        .with(env_filter)
        .with(otel_layer)
        .with(log_file_layer)
        .with(stdout_layer)
        .init();

    Ok(())
}

pub fn setup_panic_hook() {
    tracing::trace!("Setting panic hook");
    std::panic::set_hook(Box::new(|info| {
        tracing::error!("panic: {info}");
        opentelemetry::global::shutdown_tracer_provider();
    }));
}
