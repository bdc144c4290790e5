//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router with the relay and liveness routes
//! - Wire up the trace layer
//! - Serve on a listener until shutdown is signalled

use axum::{
    extract::OriginalUri,
    http::StatusCode,
    response::Response,
    routing::{any, get},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::config::ValidatedConfig;
use crate::http::relay::{relay_handler, RelayState};
use crate::http::response::error_response;

/// HTTP server for the relay.
pub struct RelayServer {
    router: Router,
    config: ValidatedConfig,
}

impl RelayServer {
    /// Create a new server for a validated configuration.
    pub fn new(config: ValidatedConfig) -> Self {
        let state = RelayState::new(config.backend.clone(), config.route_prefix());
        let router = Self::build_router(config.route_prefix(), state);
        Self { router, config }
    }

    /// Build the Axum router.
    ///
    /// No timeout or header-rewriting layers: the relay must not alter the
    /// exchange beyond the target URL.
    pub fn build_router(prefix: &str, state: RelayState) -> Router {
        Router::new()
            .route(&format!("{prefix}/{{*path}}"), any(relay_handler))
            .route("/healthz", get(healthz))
            .fallback(no_route)
            .with_state(state)
            .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
    }

    /// Run the server, accepting connections until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        tracing::info!(
            address = %listener.local_addr()?,
            backend = %self.config.backend,
            prefix = %self.config.route_prefix(),
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ValidatedConfig {
        &self.config
    }
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn healthz() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

async fn no_route(OriginalUri(uri): OriginalUri) -> Response {
    error_response(StatusCode::NOT_FOUND, format!("no route for {}", uri.path()))
}
