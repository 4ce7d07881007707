//! Worker selection subsystem.
//!
//! # Data Flow
//! ```text
//! Relay requested
//!     → pool.rs (fixed, ordered worker endpoints)
//!     → round_robin.rs (atomic select-and-advance of the shared cursor)
//!     → Return the next worker endpoint
//! ```
//!
//! # Design Decisions
//! - Pool is built once at startup and never changes
//! - The cursor is the only shared mutable state; it is advanced atomically
//! - Selection is deterministic (no randomness)

pub mod pool;
pub mod round_robin;

pub use pool::WorkerPool;
pub use round_robin::RoundRobin;
