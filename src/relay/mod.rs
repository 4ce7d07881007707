//! Relay core.
//!
//! # Data Flow
//! ```text
//! Interception host hands over a request
//!     → captured.rs (immutable snapshot, or HostIntegration error)
//!     → load_balancer::WorkerPool (next worker)
//!     → codec::encode (payload; non-text body degraded to null)
//!     → rewriter.rs (GET https://<worker>:443/<payload>, empty body)
//!     → host sends the rewritten request
//! ```

pub mod captured;
pub mod error;
pub mod rewriter;

pub use captured::{CapturedRequest, InterceptedRequest};
pub use error::{RelayError, RelayResult};
pub use rewriter::{Relayed, RequestRewriter, RewrittenRequest, WORKER_METHOD, WORKER_PORT, WORKER_SCHEME};
