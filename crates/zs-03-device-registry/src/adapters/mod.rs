//! Device store implementations.

pub mod file;
pub mod memory;

pub use file::JsonFileDeviceStore;
pub use memory::InMemoryDeviceStore;
