//! Domain layer for the device lifecycle.

pub mod discovery;
pub mod notifications;

pub use discovery::{DeviceDraft, DiscoveryOutcome, DiscoveryState};
pub use notifications::{NotificationCapacities, NotificationReceivers, Notifications};
