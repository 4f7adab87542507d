use driver_log_core::adapters::config::app_config::AppConfig;
use driver_log_web::{
    router::router,
    sheet_client_factory::SheetClientFactory,
    state::AppState,
    telemetry::{setup_panic_hook, setup_tracing},
};
use tokio::signal;
use tracing::{error, info, instrument};

#[tokio::main]
#[instrument]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match AppConfig::load() {
        Ok(config) => config,
        Err(report) => {
            eprintln!("Failed to load configuration: {report:?}");
            std::process::exit(1);
        }
    };

    setup_tracing(&config.telemetry)?;
    setup_panic_hook();

    info!("Starting driver-log web server");

    let sheet_client = match SheetClientFactory::create(&config.sheets).await {
        Ok(sheet_client) => sheet_client,
        Err(report) => {
            error!("Spreadsheet access is not configured correctly: {report:?}");
            opentelemetry::global::shutdown_tracer_provider();
            std::process::exit(1);
        }
    };

    let app = router(AppState::new(sheet_client));
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    // Setup graceful shutdown
    let shutdown_signal = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to listen for ctrl-c: {e}");
            std::future::pending::<()>().await;
        }
        info!("Received shutdown signal, stopping server...");
    };

    let result = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal)
        .await;

    opentelemetry::global::shutdown_tracer_provider();

    match result {
        Ok(()) => {
            info!("Graceful shutdown completed");
            Ok(())
        }
        Err(e) => {
            error!("Server error: {:?}", e);
            Err(e.into())
        }
    }
}
