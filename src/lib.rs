//! Round-robin worker relay library.
//!
//! Rewrites intercepted HTTP requests into `GET https://<worker>:443/?…`
//! requests whose query string carries the original request, rotating over a
//! fixed pool of worker endpoints.

pub mod codec;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod load_balancer;
pub mod observability;
pub mod relay;

pub use codec::{decode, encode, DecodedRequest, EncodedPayload, HeaderList};
pub use config::RelayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use load_balancer::WorkerPool;
pub use relay::{CapturedRequest, InterceptedRequest, RelayError, RequestRewriter, RewrittenRequest};
