//! Tasks that connect the transport to the event bus.

pub mod inbound;

pub use inbound::{log_transport_errors, translate, InboundPump};
