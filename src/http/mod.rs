//! Standalone interception host.
//!
//! # Data Flow
//! ```text
//! Client (HTTP proxy request)
//!     → server.rs (Axum setup, body buffering, request ID)
//!     → flow.rs (host-side request object)
//!     → relay::RequestRewriter (rewrite in place)
//!     → forward.rs (HTTPS send to the selected worker)
//!     → worker response returned to the client
//! ```

pub mod flow;
pub mod forward;
pub mod request;
pub mod server;

pub use flow::HttpFlow;
pub use forward::{Forwarder, ForwardError, HttpsForwarder};
pub use request::{MakeRelayId, X_RELAY_ID};
pub use server::{AppState, HttpServer};
