//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → RelayConfig (validated, immutable)
//!     → worker list builds the WorkerPool once at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; the worker pool lives for the process
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, parse_config, ConfigError};
pub use schema::RelayConfig;
pub use schema::{ListenerConfig, ObservabilityConfig, SecurityConfig, TimeoutConfig, WorkerConfig};
