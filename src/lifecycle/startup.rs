//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Bind the listener and begin accepting traffic
//!
//! # Design Decisions
//! - Fail fast: any startup error is fatal
//! - Listener binds last (traffic only when ready)

use std::path::PathBuf;

use tokio::net::TcpListener;

use crate::config::{load_config, validate_config, ConfigError, ValidatedConfig};

/// Inputs collected from the command line.
#[derive(Debug, Clone, Default)]
pub struct StartupOptions {
    /// Optional TOML config file.
    pub config_path: Option<PathBuf>,
    /// Overrides `listener.bind_address`.
    pub bind_address: Option<String>,
}

/// Resolve the effective configuration.
///
/// Returns an error when the backend origin is absent, so the caller never
/// reaches the point of binding a listener.
pub fn resolve_config<F>(options: &StartupOptions, lookup: F) -> Result<ValidatedConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = load_config(options.config_path.as_deref(), lookup)?;

    if let Some(bind) = &options.bind_address {
        config.listener.bind_address = bind.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)
}

/// Bind the TCP listener for a validated config.
pub async fn bind_listener(config: &ValidatedConfig) -> Result<TcpListener, std::io::Error> {
    let listener = TcpListener::bind(config.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        "Listening for connections"
    );
    Ok(listener)
}
