//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! relay handler, server, lifecycle
//!     → tracing events (structured fields)
//!     → logging.rs subscriber (pretty or JSON, stdout)
//! ```
//!
//! # Design Decisions
//! - Each relayed request runs in a span carrying a `relay_id`
//! - The id lives only in logs; forwarded headers are never touched

pub mod logging;

pub use logging::init_logging;
