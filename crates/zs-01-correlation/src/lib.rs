//! # ZS-01 Correlation Engine
//!
//! Request/response correlation over the broadcast dispatcher.
//!
//! The coordinator radio acknowledges a command synchronously but delivers
//! its actual result later, interleaved with everything else on the inbound
//! event stream. `CorrelationEngine::call` hides that: it runs the command,
//! then suspends the caller until an event of the expected kind arrives or
//! the timeout fires.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): `RetryPolicy`, `RetryBudget`
//! - **Service Layer** (`service`): `CorrelationEngine`
//!
//! ## Guarantees
//!
//! - A command that fails immediately returns its error unchanged and never
//!   registers a listener.
//! - A listener never outlives the call that created it.
//! - A timeout only abandons the local wait. A reply arriving afterwards is
//!   not delivered anywhere.
//! - Retried calls re-run the command on every attempt; commands must be
//!   safe to repeat.
//!
//! ## Usage Example
//!
//! ```ignore
//! let engine = CorrelationEngine::new(bus.clone());
//! let reply = engine
//!     .call_retryable(
//!         || transport.reset(ResetType::Soft),
//!         EventKind::ResetIndication,
//!         RetryPolicy::RESET.timeout,
//!         RetryPolicy::RESET.retries,
//!     )
//!     .await?;
//! ```

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod domain;
pub mod error;
pub mod service;

pub use domain::{RetryBudget, RetryPolicy};
pub use error::CorrelationError;
pub use service::CorrelationEngine;
