//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, routing, trace layer)
//!     → relay.rs (one attempt per request)
//!         → request.rs (segments → target URL, outbound request)
//!         → hyper client → backend
//!         → response.rs (stream the response back, or map the error)
//!     → Send to client
//! ```

pub mod relay;
pub mod request;
pub mod response;
pub mod server;

pub use relay::{relay_handler, RelayState};
pub use response::RelayError;
pub use server::RelayServer;
