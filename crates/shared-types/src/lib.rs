//! # Shared Types Crate
//!
//! Domain entities, radio payloads, inbound events and boundary ports shared
//! by every steward subsystem.
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All cross-subsystem types are defined here.
//! - **Stable Identity**: Devices are keyed by `IeeeAddress`; a
//!   `NetworkAddress` is only the latest observed routing address.
//! - **Opaque Boundaries**: The radio link and the frame codec are consumed
//!   through the `CoordinatorTransport` and `ClusterCodec` traits only.

pub mod clusters;
pub mod entities;
pub mod errors;
pub mod events;
pub mod ipc;
pub mod ports;

pub use entities::*;
pub use errors::*;
pub use events::*;
pub use ipc::*;
pub use ports::*;
