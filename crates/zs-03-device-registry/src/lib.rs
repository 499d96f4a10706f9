//! # ZS-03 Device Registry
//!
//! Persistent table of network members keyed by IEEE address.
//!
//! ## Architecture
//!
//! - **Ports Layer** (`ports`): `DeviceStore`
//! - **Domain Layer** (`domain`): `DeviceTable`, the whole-registry document
//! - **Adapters Layer** (`adapters/`)
//!   - `JsonFileDeviceStore`: single JSON file, atomic rewrite on every change
//!   - `InMemoryDeviceStore`: volatile
//!
//! ## Invariants
//!
//! - Exactly one record per IEEE address.
//! - A record's network address is the most recently observed one.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;

pub use adapters::{InMemoryDeviceStore, JsonFileDeviceStore};
pub use domain::DeviceTable;
pub use error::StoreError;
pub use ports::DeviceStore;
