//! Adapters: bus wiring, the registration worker and the request-backed
//! interrogator.

pub mod bus;
pub mod requests;
pub mod worker;

pub use bus::LifecycleBusAdapter;
pub use worker::{registration_queue, RegistrationWorker, DEFAULT_REGISTRATION_QUEUE};
