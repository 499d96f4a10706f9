//! # ZS-04 Coordinator Requests
//!
//! The request-style operations application code uses to talk to devices.
//! Each call returns a typed result or a `RequestError`.
//!
//! | Operation | Mechanism |
//! |-----------|-----------|
//! | `reset` | correlated call, waits for the reset indication |
//! | `node_descriptor`, `active_endpoints`, `simple_descriptor` | correlated call, matched on source address |
//! | `bind`, `unbind` | correlated call, matched on the destination's address |
//! | `read_attributes`, `write_attributes`, `read_basic_attributes` | two-phase transaction |
//! | `cluster_command`, On/Off and Level Control helpers | two-phase transaction, default response checked |
//!
//! Timeouts and retry budgets come from `RequestPolicy`.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod commands;
pub mod domain;
pub mod error;
pub mod service;

pub use domain::{BasicAttributes, RequestPolicy};
pub use error::RequestError;
pub use service::CoordinatorRequests;
