//! Round-robin cursor.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selector.
///
/// Increment-then-read: each call advances the cursor by one (mod `len`) and
/// returns the new position. Starting from 0, the first index handed out is 1
/// and index 0 is reached on the `len`-th call.
#[derive(Debug, Default)]
pub struct RoundRobin {
    cursor: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an explicit cursor position (taken mod `len` on first use).
    pub fn starting_at(cursor: usize) -> Self {
        Self {
            cursor: AtomicUsize::new(cursor),
        }
    }

    /// Advance the cursor and return the selected index in `[0, len)`.
    pub fn next_index(&self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }

        // Select-and-advance in a single CAS so concurrent callers never share a slot.
        let step = |c: usize| (c % len + 1) % len;
        let prev = self
            .cursor
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |c| Some(step(c)))
            .unwrap_or_else(|c| c);
        Some(step(prev))
    }

    /// Current cursor position.
    pub fn cursor(&self) -> usize {
        self.cursor.load(Ordering::Acquire)
    }
}
