//! Coordinator Request Service
//!
//! Request-style operations over the correlation engine (ZDO) and the
//! transaction correlator (ZCL).

use shared_bus::{EventFilter, InMemoryEventBus};
use shared_types::clusters::{self, global};
use shared_types::{
    ActiveEndpointsResponse, BindRequest, ClusterCodec, CoordinatorTransport, DataRequest,
    DataRequestOptions, EventKind, InboundEvent, NetworkAddress, NodeDescriptorResponse,
    ReadAttributeStatus, ResetIndication, ResetType, SimpleDescriptorResponse, Status,
    TransportError, WriteAttributeRecord, WriteAttributeStatus, ZclCommand, ZclFrame,
    ZclIncomingMessage, ZclStatus,
};
use std::sync::Arc;
use tracing::{debug, info, instrument};
use zs_01_correlation::CorrelationEngine;
use zs_02_transactions::{TransactionCorrelator, TransactionIdProvider};

use crate::domain::{
    BasicAttributes, RequestPolicy, BROADCAST_ENDPOINT, COORDINATOR_ENDPOINT, DEFAULT_RADIUS,
};
use crate::error::RequestError;

/// Request operations exposed to application code.
pub struct CoordinatorRequests<T, C> {
    transport: Arc<T>,
    codec: Arc<C>,
    correlation: CorrelationEngine,
    transactions: TransactionCorrelator,
    policy: RequestPolicy,
}

impl<T, C> Clone for CoordinatorRequests<T, C> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            codec: self.codec.clone(),
            correlation: self.correlation.clone(),
            transactions: self.transactions.clone(),
            policy: self.policy,
        }
    }
}

impl<T, C> CoordinatorRequests<T, C>
where
    T: CoordinatorTransport,
    C: ClusterCodec,
{
    pub fn new(
        transport: Arc<T>,
        codec: Arc<C>,
        bus: Arc<InMemoryEventBus>,
        ids: Arc<TransactionIdProvider>,
        policy: RequestPolicy,
    ) -> Self {
        Self {
            transport,
            codec,
            correlation: CorrelationEngine::new(bus.clone()),
            transactions: TransactionCorrelator::new(bus, ids),
            policy,
        }
    }

    pub fn transport(&self) -> &Arc<T> {
        &self.transport
    }

    pub fn codec(&self) -> &Arc<C> {
        &self.codec
    }

    pub fn policy(&self) -> RequestPolicy {
        self.policy
    }

    // =========================================================================
    // SYSTEM
    // =========================================================================

    /// Reset the radio and wait for it to come back.
    #[instrument(skip(self))]
    pub async fn reset(&self, reset_type: ResetType) -> Result<ResetIndication, RequestError> {
        let policy = self.policy.reset;
        let event = self
            .correlation
            .call_retryable(
                || self.transport.reset(reset_type),
                EventKind::ResetIndication,
                policy.timeout,
                policy.retries,
            )
            .await?;

        match event {
            InboundEvent::ResetIndication(indication) => {
                info!(
                    major = indication.major_release,
                    minor = indication.minor_release,
                    "Radio reset complete"
                );
                Ok(indication)
            }
            other => Err(unexpected("reset", &other)),
        }
    }

    // =========================================================================
    // ZDO
    // =========================================================================

    pub async fn node_descriptor(
        &self,
        network_address: NetworkAddress,
    ) -> Result<NodeDescriptorResponse, RequestError> {
        let event = self
            .zdo_call(
                EventFilter::kind(EventKind::NodeDescriptor).from_source(network_address),
                |_| true,
                || {
                    self.transport
                        .node_descriptor_request(network_address, network_address)
                },
            )
            .await?;

        match event {
            InboundEvent::NodeDescriptor(response) => {
                check_status("node_descriptor", response.status)?;
                Ok(response)
            }
            other => Err(unexpected("node_descriptor", &other)),
        }
    }

    pub async fn active_endpoints(
        &self,
        network_address: NetworkAddress,
    ) -> Result<ActiveEndpointsResponse, RequestError> {
        let event = self
            .zdo_call(
                EventFilter::kind(EventKind::ActiveEndpoints).from_source(network_address),
                |_| true,
                || {
                    self.transport
                        .active_endpoints_request(network_address, network_address)
                },
            )
            .await?;

        match event {
            InboundEvent::ActiveEndpoints(response) => {
                check_status("active_endpoints", response.status)?;
                Ok(response)
            }
            other => Err(unexpected("active_endpoints", &other)),
        }
    }

    pub async fn simple_descriptor(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
    ) -> Result<SimpleDescriptorResponse, RequestError> {
        let event = self
            .zdo_call(
                EventFilter::kind(EventKind::SimpleDescriptor).from_source(network_address),
                |event| {
                    matches!(event, InboundEvent::SimpleDescriptor(r) if r.endpoint == endpoint)
                },
                || {
                    self.transport.simple_descriptor_request(
                        network_address,
                        network_address,
                        endpoint,
                    )
                },
            )
            .await?;

        match event {
            InboundEvent::SimpleDescriptor(response) => {
                check_status("simple_descriptor", response.status)?;
                Ok(response)
            }
            other => Err(unexpected("simple_descriptor", &other)),
        }
    }

    /// Create a binding on `request.destination`.
    pub async fn bind(&self, request: BindRequest) -> Result<(), RequestError> {
        let destination = request.destination;
        let event = self
            .zdo_call(
                EventFilter::kind(EventKind::BindResponse).from_source(destination),
                |_| true,
                || self.transport.bind_request(request.clone()),
            )
            .await?;

        match event {
            InboundEvent::BindResponse(response) => check_status("bind", response.status),
            other => Err(unexpected("bind", &other)),
        }
    }

    /// Remove a binding from `request.destination`.
    pub async fn unbind(&self, request: BindRequest) -> Result<(), RequestError> {
        let destination = request.destination;
        let event = self
            .zdo_call(
                EventFilter::kind(EventKind::UnbindResponse).from_source(destination),
                |_| true,
                || self.transport.unbind_request(request.clone()),
            )
            .await?;

        match event {
            InboundEvent::UnbindResponse(response) => check_status("unbind", response.status),
            other => Err(unexpected("unbind", &other)),
        }
    }

    async fn zdo_call<A, Fut, M>(
        &self,
        filter: EventFilter,
        matcher: M,
        action: A,
    ) -> Result<InboundEvent, RequestError>
    where
        A: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<(), TransportError>>,
        M: Fn(&InboundEvent) -> bool,
    {
        let policy = self.policy.default;
        Ok(self
            .correlation
            .call_matching_retryable(action, filter, matcher, policy.timeout, policy.retries)
            .await?)
    }

    // =========================================================================
    // ZCL
    // =========================================================================

    pub async fn read_attributes(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        cluster_id: u16,
        attribute_ids: &[u16],
    ) -> Result<Vec<ReadAttributeStatus>, RequestError> {
        let frame = ZclFrame::global(
            global::READ_ATTRIBUTES,
            ZclCommand::ReadAttributes(attribute_ids.to_vec()),
        );
        let message = self
            .zcl_exchange(network_address, endpoint, cluster_id, frame)
            .await?;

        match message.frame.command {
            ZclCommand::ReadAttributesResponse(records) => Ok(records),
            other => Err(RequestError::UnexpectedResponse {
                operation: "read_attributes",
                actual: format!("{:?}", other),
            }),
        }
    }

    pub async fn write_attributes(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        cluster_id: u16,
        records: Vec<WriteAttributeRecord>,
    ) -> Result<Vec<WriteAttributeStatus>, RequestError> {
        let frame = ZclFrame::global(global::WRITE_ATTRIBUTES, ZclCommand::WriteAttributes(records));
        let message = self
            .zcl_exchange(network_address, endpoint, cluster_id, frame)
            .await?;

        match message.frame.command {
            ZclCommand::WriteAttributesResponse(statuses) => Ok(statuses),
            other => Err(RequestError::UnexpectedResponse {
                operation: "write_attributes",
                actual: format!("{:?}", other),
            }),
        }
    }

    /// Read manufacturer name, model identifier and power source.
    pub async fn read_basic_attributes(
        &self,
        network_address: NetworkAddress,
    ) -> Result<BasicAttributes, RequestError> {
        let records = self
            .read_attributes(
                network_address,
                BROADCAST_ENDPOINT,
                clusters::BASIC,
                &BasicAttributes::IDS,
            )
            .await?;
        Ok(BasicAttributes::from_records(&records))
    }

    /// Send a cluster-specific command and check its default response.
    pub async fn cluster_command(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        cluster_id: u16,
        command_id: u8,
        command: ZclCommand,
    ) -> Result<(), RequestError> {
        let frame = ZclFrame::local(command_id, command);
        let message = self
            .zcl_exchange(network_address, endpoint, cluster_id, frame)
            .await?;

        match message.frame.command {
            ZclCommand::DefaultResponse { status, .. } if status == ZclStatus::Success => {
                debug!(cluster_id, command_id, target = %network_address, "Command succeeded");
                Ok(())
            }
            ZclCommand::DefaultResponse { status, .. } => Err(RequestError::CommandFailed {
                cluster_id,
                command_id,
                status,
            }),
            other => Err(RequestError::UnexpectedResponse {
                operation: "cluster_command",
                actual: format!("{:?}", other),
            }),
        }
    }

    async fn zcl_exchange(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        cluster_id: u16,
        frame: ZclFrame,
    ) -> Result<ZclIncomingMessage, RequestError> {
        // Surface encoding problems once instead of burning the retry budget.
        self.codec.encode(cluster_id, &frame)?;

        let policy = self.policy.default;
        let message = self
            .transactions
            .send_retryable(
                network_address,
                |target, transaction_id| {
                    let transport = self.transport.clone();
                    let encoded = self
                        .codec
                        .encode(
                            cluster_id,
                            &frame.clone().with_transaction_sequence(transaction_id),
                        )
                        .map_err(TransportError::Encoding);
                    async move {
                        let request = DataRequest {
                            dst_address: target,
                            dst_endpoint: endpoint,
                            src_endpoint: COORDINATOR_ENDPOINT,
                            cluster_id,
                            transaction_id,
                            options: DataRequestOptions::default(),
                            radius: DEFAULT_RADIUS,
                            payload: encoded?,
                        };
                        transport.data_request(request).await
                    }
                },
                policy.timeout,
                policy.retries,
            )
            .await?;
        Ok(message)
    }
}

fn check_status(operation: &'static str, status: Status) -> Result<(), RequestError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(RequestError::Status { operation, status })
    }
}

fn unexpected(operation: &'static str, event: &InboundEvent) -> RequestError {
    RequestError::UnexpectedResponse {
        operation,
        actual: event.kind().to_string(),
    }
}
