//! Inbound request handling and target reconstruction.
//!
//! # Responsibilities
//! - Extract the wildcard path segments below the route prefix
//! - Join them onto the backend origin to form the target URL
//! - Rebuild the inbound request as the outbound request
//!
//! # Design Decisions
//! - The raw (still percent-encoded) path is used so the backend sees the
//!   bytes the caller sent
//! - Method, headers and body move into the outbound request untouched;
//!   only the URI and protocol version change
//! - The target is computed per request, never cached

use axum::body::Body;
use axum::http::{request::Parts, Extensions, Request, Uri, Version};

use crate::config::BackendOrigin;
use crate::http::response::RelayError;

/// Path segments below `prefix`, with empty segments dropped.
///
/// Returns `None` when `path` is not under `prefix` at a segment boundary.
pub fn path_segments<'a>(path: &'a str, prefix: &str) -> Option<Vec<&'a str>> {
    let rest = path.strip_prefix(prefix)?;
    if !rest.is_empty() && !rest.starts_with('/') {
        return None;
    }
    Some(rest.split('/').filter(|s| !s.is_empty()).collect())
}

/// Join segments onto the backend origin: `base + "/" + join(segments, "/")`.
pub fn target_url(origin: &BackendOrigin, segments: &[&str], query: Option<&str>) -> String {
    let mut url = format!("{}/{}", origin.as_str(), segments.join("/"));
    if let Some(query) = query {
        url.push('?');
        url.push_str(query);
    }
    url
}

/// Compute the target URI for an inbound URI.
pub fn target_uri(origin: &BackendOrigin, prefix: &str, inbound: &Uri) -> Result<Uri, RelayError> {
    let segments = path_segments(inbound.path(), prefix)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| RelayError::MissingPath(inbound.path().to_string()))?;

    let url = target_url(origin, &segments, inbound.query());
    url.parse::<Uri>()
        .map_err(|e| RelayError::InvalidTarget { url, reason: e.to_string() })
}

/// Turn the inbound request into the outbound one.
///
/// Headers (including `host`, `content-length` and repeated fields) are kept
/// exactly as received. The version is pinned to HTTP/1.1 because the
/// upstream client speaks only HTTP/1.
pub fn outbound_request(mut parts: Parts, body: Body, target: Uri) -> Request<Body> {
    parts.uri = target;
    parts.version = Version::HTTP_11;
    parts.extensions = Extensions::new();
    Request::from_parts(parts, body)
}
