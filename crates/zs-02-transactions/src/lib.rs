//! # ZS-02 Transaction Correlator
//!
//! Application data exchanges complete in two asynchronous phases: the radio
//! first confirms delivery (keyed by transaction id), then, if delivery
//! succeeded, the remote device answers with an application message carrying
//! the same transaction id.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`)
//!   - `TransactionIdProvider`: shared wrapping 1..=255 allocator
//!   - `Transaction`: confirmation/response matching rules
//! - **Service Layer** (`service`): `TransactionCorrelator`
//!
//! ## Design Limit
//!
//! The id space is shared by every transaction in the process and has no
//! collision detection. More than 254 simultaneously outstanding
//! transactions can misattribute a response.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{Transaction, TransactionIdProvider};
pub use error::TransactionError;
pub use service::TransactionCorrelator;
