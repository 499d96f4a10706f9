//! # ZS-05 Device Lifecycle
//!
//! Keeps the device registry in step with the network.
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): discovery state machine, device assembly,
//!   bounded notification queues
//! - **Ports Layer** (`ports`): `DeviceInterrogator`, the requests discovery needs
//! - **Service** (`service`): `DeviceLifecycleService`
//! - **Adapters Layer** (`adapters/`): bus adapter, registration worker,
//!   interrogator over `CoordinatorRequests`
//!
//! ## Discovery
//!
//! ```text
//! Announced → AttributesRequested → NodeDescribed → EndpointsEnumerated
//!           → EndpointDescribed(n)... → Registered
//! ```
//!
//! A known IEEE address short-circuits to "became available". A failed
//! mandatory step abandons the device until it announces again; a failed
//! endpoint descriptor only drops that endpoint.
//!
//! ## Invariants
//!
//! - At most one discovery in flight, enforced by the single registration worker.
//! - Notification producers never block; a full queue drops the new item.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use adapters::{
    registration_queue, LifecycleBusAdapter, RegistrationWorker, DEFAULT_REGISTRATION_QUEUE,
};
pub use domain::{
    DiscoveryOutcome, DiscoveryState, NotificationCapacities, NotificationReceivers,
    Notifications,
};
pub use error::DiscoveryError;
pub use ports::DeviceInterrogator;
pub use service::DeviceLifecycleService;
