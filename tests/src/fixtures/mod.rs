//! Scripted collaborators shared by the integration scenarios.

pub mod codec;
pub mod network;

pub use codec::JsonCodec;
pub use network::{ConfirmScript, ScriptedRadio, SimDevice, SimEndpoint, COORDINATOR_IEEE};

use shared_bus::InMemoryEventBus;
use std::sync::Arc;
use std::time::Duration;
use steward_runtime::InboundPump;
use zs_01_correlation::RetryPolicy;
use zs_02_transactions::TransactionIdProvider;
use zs_04_requests::{CoordinatorRequests, RequestPolicy};

/// Requests wired to a started `ScriptedRadio` through a running inbound
/// pump, without the rest of the runtime.
pub async fn wired_requests(
    radio: &Arc<ScriptedRadio>,
    ids: TransactionIdProvider,
    policy: RequestPolicy,
) -> (Arc<InMemoryEventBus>, CoordinatorRequests<ScriptedRadio, JsonCodec>) {
    use shared_types::CoordinatorTransport;

    let bus = Arc::new(InMemoryEventBus::new());
    let codec = Arc::new(JsonCodec);
    let streams = match radio.start().await {
        Ok(streams) => streams,
        Err(e) => panic!("scripted radio failed to start: {e}"),
    };
    tokio::spawn(InboundPump::new(streams.events, bus.clone(), codec.clone()).run());
    let requests = CoordinatorRequests::new(
        radio.clone(),
        codec,
        bus.clone(),
        Arc::new(ids),
        policy,
    );
    (bus, requests)
}

/// Short timeouts with a single retry.
pub fn fast_policy() -> RequestPolicy {
    RequestPolicy {
        default: RetryPolicy::new(Duration::from_secs(2), 1),
        reset: RetryPolicy::new(Duration::from_secs(2), 1),
    }
}

/// Default configuration pointing the device database at `database_path`.
pub fn test_config(database_path: std::path::PathBuf) -> steward_runtime::StewardConfig {
    let mut config = steward_runtime::StewardConfig::default();
    config.storage.database_path = database_path;
    config.requests = fast_policy();
    config
}
