//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Resolve the backend origin into a normalized base URL
//! - Validate the bind address and route prefix
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RelayConfig → Result<ValidatedConfig, Vec<ValidationError>>
//! - Runs before the server is constructed, so an invalid config never serves traffic

use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

use axum::http::Uri;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// No backend origin was configured.
    #[error("backend origin is not configured (set BACKEND_URL)")]
    MissingBackend,

    /// The backend origin is not a parseable URL.
    #[error("backend origin {url:?} is not a valid URL: {reason}")]
    InvalidBackendUrl { url: String, reason: String },

    /// The backend origin uses a scheme other than plain http.
    #[error("backend origin {url:?} must use the http scheme, got {scheme:?}")]
    UnsupportedScheme { url: String, scheme: String },

    /// The backend origin carries a query string or fragment.
    #[error("backend origin {0:?} must not contain a query or fragment")]
    BackendHasQuery(String),

    /// The bind address is not a socket address.
    #[error("bind address {0:?} is not a valid socket address")]
    InvalidBindAddress(String),

    /// The route prefix is malformed.
    #[error("route prefix {0:?} must start with '/', must not end with '/' and must not contain '{{', '}}' or '*'")]
    InvalidRoutePrefix(String),

    /// The log level is not a known level.
    #[error("log level {0:?} is not one of off, error, warn, info, debug, trace")]
    InvalidLogLevel(String),
}

/// Characters axum's router treats as path parameter syntax.
const ROUTE_SYNTAX: [char; 3] = ['{', '}', '*'];

/// Normalized backend base URL.
///
/// Holds the configured origin (plus any base path) with trailing slashes
/// removed, ready to have `/{segments}` appended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendOrigin(String);

impl BackendOrigin {
    /// Parse and normalize a backend origin.
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::MissingBackend);
        }

        let url = Url::parse(trimmed).map_err(|e| ValidationError::InvalidBackendUrl {
            url: trimmed.to_string(),
            reason: e.to_string(),
        })?;

        if url.scheme() != "http" {
            return Err(ValidationError::UnsupportedScheme {
                url: trimmed.to_string(),
                scheme: url.scheme().to_string(),
            });
        }

        if url.host_str().is_none() {
            return Err(ValidationError::InvalidBackendUrl {
                url: trimmed.to_string(),
                reason: "missing host".to_string(),
            });
        }

        if url.query().is_some() || url.fragment().is_some() {
            return Err(ValidationError::BackendHasQuery(trimmed.to_string()));
        }

        // `Url` serializes the host in ASCII (punycode), which `Uri` accepts.
        let base = url.as_str().trim_end_matches('/').to_string();
        if let Err(e) = format!("{base}/").parse::<Uri>() {
            return Err(ValidationError::InvalidBackendUrl {
                url: trimmed.to_string(),
                reason: e.to_string(),
            });
        }

        Ok(Self(base))
    }

    /// The normalized base, without a trailing slash.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackendOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Configuration that passed validation.
///
/// The only way to obtain one is [`validate_config`], so holding a
/// `ValidatedConfig` proves a backend origin is present.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    /// The raw configuration as loaded.
    pub raw: RelayConfig,
    /// Resolved backend origin.
    pub backend: BackendOrigin,
    /// Parsed bind address.
    pub bind_address: SocketAddr,
}

impl ValidatedConfig {
    /// Route prefix the relay is mounted under.
    pub fn route_prefix(&self) -> &str {
        &self.raw.route.prefix
    }
}

/// Validate a loaded configuration, collecting every error.
pub fn validate_config(config: &RelayConfig) -> Result<ValidatedConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let backend = match config.backend.base_url.as_deref() {
        Some(raw) => BackendOrigin::parse(raw).map_err(|e| errors.push(e)).ok(),
        None => {
            errors.push(ValidationError::MissingBackend);
            None
        }
    };

    let bind_address = config
        .listener
        .bind_address
        .parse::<SocketAddr>()
        .map_err(|_| errors.push(ValidationError::InvalidBindAddress(config.listener.bind_address.clone())))
        .ok();

    let prefix = &config.route.prefix;
    if !prefix.starts_with('/') || prefix.ends_with('/') || prefix.contains(ROUTE_SYNTAX) {
        errors.push(ValidationError::InvalidRoutePrefix(prefix.clone()));
    }

    let level = &config.observability.log_level;
    if LevelFilter::from_str(level).is_err() {
        errors.push(ValidationError::InvalidLogLevel(level.clone()));
    }

    match (backend, bind_address) {
        (Some(backend), Some(bind_address)) if errors.is_empty() => Ok(ValidatedConfig {
            raw: config.clone(),
            backend,
            bind_address,
        }),
        _ => Err(errors),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_backend(url: &str) -> RelayConfig {
        let mut config = RelayConfig::default();
        config.backend.base_url = Some(url.to_string());
        config
    }

    #[test]
    fn accepts_plain_origin() {
        let validated = validate_config(&config_with_backend("http://localhost:8000")).unwrap();
        assert_eq!(validated.backend.as_str(), "http://localhost:8000");
        assert_eq!(validated.route_prefix(), "/proxy");
    }

    #[test]
    fn strips_trailing_slashes() {
        let origin = BackendOrigin::parse("http://model:8000/api//").unwrap();
        assert_eq!(origin.as_str(), "http://model:8000/api");
    }

    #[test]
    fn missing_backend_is_rejected() {
        let errors = validate_config(&RelayConfig::default()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingBackend]);
    }

    #[test]
    fn blank_backend_is_missing() {
        let errors = validate_config(&config_with_backend("   ")).unwrap_err();
        assert_eq!(errors, vec![ValidationError::MissingBackend]);
    }

    #[test]
    fn https_is_rejected() {
        let err = BackendOrigin::parse("https://model:8000").unwrap_err();
        assert!(matches!(err, ValidationError::UnsupportedScheme { ref scheme, .. } if scheme == "https"));
    }

    #[test]
    fn garbage_url_is_rejected() {
        let err = BackendOrigin::parse("localhost:8000:nope").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::InvalidBackendUrl { .. } | ValidationError::UnsupportedScheme { .. }
        ));
    }

    #[test]
    fn query_in_origin_is_rejected() {
        let err = BackendOrigin::parse("http://model:8000/?debug=1").unwrap_err();
        assert_eq!(err, ValidationError::BackendHasQuery("http://model:8000/?debug=1".into()));
    }

    #[test]
    fn collects_all_errors() {
        let mut config = RelayConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.route.prefix = "proxy/".into();

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.contains(&ValidationError::MissingBackend));
        assert!(errors.contains(&ValidationError::InvalidBindAddress("not-an-address".into())));
        assert!(errors.contains(&ValidationError::InvalidRoutePrefix("proxy/".into())));
    }

    #[test]
    fn idn_host_is_stored_as_punycode() {
        let origin = BackendOrigin::parse("http://bücher.localhost:8000").unwrap();
        assert_eq!(origin.as_str(), "http://xn--bcher-kva.localhost:8000");
        assert!(format!("{origin}/predict").parse::<Uri>().is_ok());
    }

    #[test]
    fn host_is_normalized() {
        let origin = BackendOrigin::parse("http://Model.Local:8000/").unwrap();
        assert_eq!(origin.as_str(), "http://model.local:8000");
    }

    #[test]
    fn route_syntax_in_prefix_is_rejected() {
        for prefix in ["/p{x", "/api/{v}", "/api/{*rest}", "/p}", "/p*"] {
            let mut config = config_with_backend("http://localhost:8000");
            config.route.prefix = prefix.into();
            let errors = validate_config(&config).unwrap_err();
            assert_eq!(errors, vec![ValidationError::InvalidRoutePrefix(prefix.into())]);
        }
    }

    #[test]
    fn nested_literal_prefix_is_accepted() {
        let mut config = config_with_backend("http://localhost:8000");
        config.route.prefix = "/api/v1/relay".into();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut config = config_with_backend("http://localhost:8000");
        config.observability.log_level = "inf".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidLogLevel("inf".into())]);
    }

    #[test]
    fn known_log_levels_are_accepted() {
        for level in ["off", "error", "WARN", "info", "debug", "trace"] {
            let mut config = config_with_backend("http://localhost:8000");
            config.observability.log_level = level.into();
            assert!(validate_config(&config).is_ok(), "{level} should be accepted");
        }
    }

    #[test]
    fn root_prefix_is_rejected() {
        let mut config = config_with_backend("http://localhost:8000");
        config.route.prefix = "/".into();
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors, vec![ValidationError::InvalidRoutePrefix("/".into())]);
    }
}
