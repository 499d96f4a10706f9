//! Domain layer for the correlation engine.
//!
//! Pure retry bookkeeping, no I/O.

pub mod retry;

pub use retry::{RetryBudget, RetryPolicy};
