//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! optional config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → BACKEND_URL environment override
//!     → validation.rs (semantic checks, backend origin resolution)
//!     → ValidatedConfig (immutable for the life of the process)
//! ```
//!
//! # Design Decisions
//! - All fields have defaults so the file is optional
//! - The backend origin has no default: startup fails without it
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError, BACKEND_URL_ENV};
pub use schema::{BackendConfig, ListenerConfig, LogFormat, ObservabilityConfig, RelayConfig, RouteConfig};
pub use validation::{validate_config, BackendOrigin, ValidatedConfig, ValidationError};
