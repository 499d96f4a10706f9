//! Transaction id allocator.

use std::sync::atomic::{AtomicU8, Ordering};

/// Process-wide cyclic allocator of 1-byte transaction ids.
///
/// Yields 1, 2, ..., 255, 1, ... and never 0. Ids are reused once the space
/// wraps; there is no collision detection.
#[derive(Debug, Default)]
pub struct TransactionIdProvider {
    last: AtomicU8,
}

impl TransactionIdProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocator whose next id follows `last`.
    pub fn starting_after(last: u8) -> Self {
        Self {
            last: AtomicU8::new(last),
        }
    }

    pub fn next(&self) -> u8 {
        let previous = self
            .last
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
                Some(successor(current))
            })
            .unwrap_or_else(|current| current);
        successor(previous)
    }
}

fn successor(id: u8) -> u8 {
    if id == u8::MAX {
        1
    } else {
        id + 1
    }
}
