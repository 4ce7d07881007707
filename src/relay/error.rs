//! Relay error definitions.

use thiserror::Error;

/// Errors that can occur while setting up or performing a relay.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RelayError {
    /// The worker pool could not be built (e.g. no endpoints).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A request attribute could not be represented as text.
    ///
    /// Recoverable: the rewriter degrades the field to the `null` marker.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The host's request object lacks a field the relay needs.
    #[error("Host integration error: {0}")]
    HostIntegration(String),
}

/// Result type for relay operations.
pub type RelayResult<T> = Result<T, RelayError>;
