//! # Inbound Pump
//!
//! The only consumer of the transport event stream. Application payloads
//! are decoded here so that every listener sees typed frames.
//!
//! ```text
//! [Transport] ──AdapterEvent──→ [InboundPump] ──InboundEvent──→ [Event Bus]
//!                                     │
//!                                     └── undecodable payload: logged, dropped
//! ```

use shared_bus::{EventPublisher, InMemoryEventBus};
use shared_types::{
    AdapterEvent, ClusterCodec, CodecError, InboundEvent, TransportError, ZclIncomingMessage,
};
use std::sync::Arc;
use steward_telemetry::{metric_inc, DECODE_FAILURES, INBOUND_EVENTS, TRANSPORT_ERRORS};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

/// Convert a raw transport event into its published form.
pub fn translate<C: ClusterCodec + ?Sized>(
    event: AdapterEvent,
    codec: &C,
) -> Result<InboundEvent, CodecError> {
    Ok(match event {
        AdapterEvent::IncomingMessage(message) => {
            let frame = codec.decode(message.cluster_id, &message.payload)?;
            InboundEvent::IncomingMessage(ZclIncomingMessage::from_af(&message, frame))
        }
        AdapterEvent::DataConfirm(e) => InboundEvent::DataConfirm(e),
        AdapterEvent::DeviceAnnounce(e) => InboundEvent::DeviceAnnounce(e),
        AdapterEvent::DeviceLeave(e) => InboundEvent::DeviceLeave(e),
        AdapterEvent::TrustCenterJoin(e) => InboundEvent::TrustCenterJoin(e),
        AdapterEvent::NodeDescriptor(e) => InboundEvent::NodeDescriptor(e),
        AdapterEvent::ActiveEndpoints(e) => InboundEvent::ActiveEndpoints(e),
        AdapterEvent::SimpleDescriptor(e) => InboundEvent::SimpleDescriptor(e),
        AdapterEvent::BindResponse(e) => InboundEvent::BindResponse(e),
        AdapterEvent::UnbindResponse(e) => InboundEvent::UnbindResponse(e),
        AdapterEvent::ResetIndication(e) => InboundEvent::ResetIndication(e),
    })
}

/// Drains transport events onto the bus.
pub struct InboundPump<C> {
    events: mpsc::Receiver<AdapterEvent>,
    bus: Arc<InMemoryEventBus>,
    codec: Arc<C>,
}

impl<C: ClusterCodec> InboundPump<C> {
    pub fn new(
        events: mpsc::Receiver<AdapterEvent>,
        bus: Arc<InMemoryEventBus>,
        codec: Arc<C>,
    ) -> Self {
        Self { events, bus, codec }
    }

    /// Run until the transport closes its event stream.
    pub async fn run(mut self) {
        info!("Inbound pump started");
        while let Some(event) = self.events.recv().await {
            self.forward(event).await;
        }
        info!("Transport event stream closed, inbound pump exiting");
    }

    /// Publish one event; returns the number of listeners it reached.
    pub async fn forward(&self, event: AdapterEvent) -> usize {
        let kind = event.kind();
        match translate(event, self.codec.as_ref()) {
            Ok(event) => {
                metric_inc!(INBOUND_EVENTS, &[kind.as_str()]);
                debug!(?event, "Inbound event");
                self.bus.publish(event).await
            }
            Err(e) => {
                metric_inc!(DECODE_FAILURES);
                warn!(kind = %kind, error = %e, "Failed to decode inbound message, dropping");
                0
            }
        }
    }
}

/// Log link errors until the transport closes its error stream.
pub async fn log_transport_errors(mut errors: mpsc::Receiver<TransportError>) {
    while let Some(e) = errors.recv().await {
        metric_inc!(TRANSPORT_ERRORS);
        error!(error = %e, "Transport error");
    }
    debug!("Transport error stream closed");
}
