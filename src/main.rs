//! Prediction relay.
//!
//! Exposes a booking-prediction backend through one origin: every request
//! under `/proxy/*` is forwarded to `BACKEND_URL` with its method, headers
//! and body intact, and the backend's response is streamed back.
//!
//! ```text
//!   browser ──▶ /proxy/predict ──▶ relay ──▶ $BACKEND_URL/predict
//!   browser ◀── status, headers, streamed body ◀── backend
//! ```

use std::path::PathBuf;

use clap::Parser;

use prediction_relay::config::ObservabilityConfig;
use prediction_relay::lifecycle::{bind_listener, resolve_config, signals, StartupOptions};
use prediction_relay::observability::init_logging;
use prediction_relay::{RelayServer, Shutdown};

#[derive(Parser)]
#[command(name = "prediction-relay")]
#[command(about = "Streams requests under /proxy/* to a prediction backend", long_about = None)]
struct Cli {
    /// Optional TOML config file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the listener bind address (e.g. 127.0.0.1:3000).
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let options = StartupOptions {
        config_path: cli.config,
        bind_address: cli.bind,
    };

    let config = match resolve_config(&options, |key| std::env::var(key).ok()) {
        Ok(config) => config,
        Err(e) => {
            let _ = init_logging(&ObservabilityConfig::default());
            tracing::error!(error = %e, "Refusing to start");
            return Err(e.into());
        }
    };

    init_logging(&config.raw.observability)?;

    tracing::info!("prediction-relay v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.bind_address,
        backend = %config.backend,
        prefix = %config.route_prefix(),
        "Configuration loaded"
    );

    let listener = bind_listener(&config).await?;

    let shutdown = Shutdown::new();
    signals::spawn_signal_listener(&shutdown);

    let server = RelayServer::new(config);
    server.run(listener, shutdown.subscribe()).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
