//! The request relay.
//!
//! ```text
//! inbound request ──▶ target_uri ──▶ outbound_request ──▶ hyper client ──▶ backend
//!                                                              │
//! caller ◀── relay_response (status + headers, streamed body) ◀┘
//! ```
//!
//! A single attempt is made per request. The inbound body is the outbound
//! body, so hyper copies it upstream as it arrives while the backend
//! response body is copied downstream by the server; the two directions
//! finish independently.

use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::extract::State;
use axum::http::Request;
use axum::response::{IntoResponse, Response};
use hyper_util::client::legacy::{connect::HttpConnector, Client};
use hyper_util::rt::TokioExecutor;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::BackendOrigin;
use crate::http::request::{outbound_request, target_uri};
use crate::http::response::{relay_response, RelayError};

/// Upstream HTTP/1.1 client.
pub type UpstreamClient = Client<HttpConnector, Body>;

/// Build the upstream client with transport defaults.
pub fn upstream_client() -> UpstreamClient {
    Client::builder(TokioExecutor::new()).build(HttpConnector::new())
}

/// Immutable state shared by every relayed request.
#[derive(Clone)]
pub struct RelayState {
    pub backend: Arc<BackendOrigin>,
    pub prefix: Arc<str>,
    pub client: UpstreamClient,
}

impl RelayState {
    pub fn new(backend: BackendOrigin, prefix: &str) -> Self {
        Self {
            backend: Arc::new(backend),
            prefix: Arc::from(prefix),
            client: upstream_client(),
        }
    }
}

/// Axum handler for `{prefix}/{*path}`.
pub async fn relay_handler(State(state): State<RelayState>, request: Request<Body>) -> Response {
    let span = tracing::info_span!(
        "relay",
        relay_id = %Uuid::new_v4(),
        method = %request.method(),
        path = %request.uri().path(),
    );

    relay(&state, request)
        .instrument(span)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

/// Forward one request and return the backend's response head.
///
/// Returns once the backend response head has arrived; the body is still
/// streaming at that point.
pub async fn relay(state: &RelayState, request: Request<Body>) -> Result<Response, RelayError> {
    let start = Instant::now();

    let target = target_uri(&state.backend, &state.prefix, request.uri()).inspect_err(|e| {
        tracing::warn!(error = %e, "Rejected relay request");
    })?;

    tracing::debug!(target_url = %target, "Forwarding request");

    let (parts, body) = request.into_parts();
    let outbound = outbound_request(parts, body, target);

    match state.client.request(outbound).await {
        Ok(response) => {
            tracing::info!(
                status = response.status().as_u16(),
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Backend responded"
            );
            Ok(relay_response(response))
        }
        Err(e) => {
            let err = RelayError::upstream(&e);
            tracing::error!(
                error = %err,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Upstream error"
            );
            Err(err)
        }
    }
}
