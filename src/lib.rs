//! Prediction relay library.
//!
//! Forwards every request under a route prefix to one configured backend,
//! streaming bodies in both directions.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::RelayConfig;
pub use http::RelayServer;
pub use lifecycle::Shutdown;
