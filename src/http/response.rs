//! Response handling and relay error mapping.
//!
//! # Responsibilities
//! - Hand the backend response to the caller without buffering
//! - Map relay failures to a small JSON error body
//!
//! # Design Decisions
//! - Status and headers are copied as received; hop-by-hop headers are not
//!   stripped
//! - The JSON error path exists only until a backend response head has been
//!   received; after that a failure aborts the stream

use std::error::Error as StdError;

use axum::body::Body;
use axum::http::{Response as HttpResponse, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use hyper::body::Incoming;
use serde::Serialize;
use thiserror::Error;

/// Errors surfaced by the relay before any response has been sent.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The outbound connection failed (connect, write or read of the head).
    #[error("{0}")]
    Upstream(String),

    /// The joined target does not form a valid URI.
    #[error("invalid target URL {url:?}: {reason}")]
    InvalidTarget { url: String, reason: String },

    /// No path segments below the route prefix.
    #[error("no backend path in {0:?}")]
    MissingPath(String),
}

impl RelayError {
    /// Build a transport failure from a client error, keeping its source chain.
    pub fn upstream(err: &(dyn StdError + 'static)) -> Self {
        RelayError::Upstream(error_chain(err))
    }

    /// Status code returned to the caller.
    pub fn status(&self) -> StatusCode {
        match self {
            RelayError::Upstream(_) | RelayError::InvalidTarget { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            RelayError::MissingPath(_) => StatusCode::NOT_FOUND,
        }
    }
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        error_response(self.status(), self.to_string())
    }
}

/// Body of every error produced by the relay itself.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// `status` with `{"error": message}` and a JSON content type.
pub fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(ErrorBody { error: message.into() })).into_response()
}

/// Hand a backend response to the caller.
///
/// The body stays a stream: bytes reach the caller as the backend produces
/// them, and dropping the returned response drops the upstream connection.
pub fn relay_response(response: HttpResponse<Incoming>) -> Response {
    let (parts, body) = response.into_parts();
    Response::from_parts(parts, Body::new(body))
}

/// Render an error with its sources, outermost first.
pub fn error_chain(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(inner) = source {
        let text = inner.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = inner.source();
    }
    message
}
