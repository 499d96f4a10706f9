//! # Coordinator Startup
//!
//! Brings the radio from power-on to a formed network:
//!
//! ```text
//! reset → time → network key → logical type → PAN id → ZDO callbacks
//!       → security → extended address → channels → reset
//!       → callbacks → start → device info → LED → endpoints → permit join
//! ```
//!
//! Setting the clock, the LED, endpoint registration and permit join are
//! best effort. Every other step aborts startup on failure.

use chrono::{Datelike, Local, Timelike};
use shared_types::{
    ClusterCodec, ConfigCommand, CoordinatorTransport, EndpointRegistration, IeeeAddress,
    NetworkAddress, ResetType, TransportError,
};
use tracing::{debug, info, instrument, warn};
use zs_04_requests::CoordinatorRequests;

use crate::container::config::NetworkConfig;
use crate::error::RuntimeError;

/// Configuration item ids written during startup.
pub mod config_ids {
    pub const LOGICAL_TYPE: u8 = 0x87;
    pub const ZDO_DIRECT_CALLBACK: u8 = 0x8F;
    pub const SECURITY_MODE: u8 = 0x64;
}

/// Profiles served on coordinator endpoints 1..=6.
pub const ENDPOINT_PROFILES: [u16; 6] = [0x0104, 0x0101, 0x0105, 0x0107, 0x0108, 0x0109];

const ENDPOINT_DEVICE_ID: u16 = 0x0005;
const LED_ID: u8 = 1;
const PERMIT_JOIN_FOREVER: u8 = 0xFF;

/// Identity of the running coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordinatorInfo {
    pub ieee_address: IeeeAddress,
    pub network_address: NetworkAddress,
}

/// Drives the startup command sequence.
pub struct CoordinatorStartup<T, C> {
    requests: CoordinatorRequests<T, C>,
    network: NetworkConfig,
}

impl<T, C> CoordinatorStartup<T, C>
where
    T: CoordinatorTransport,
    C: ClusterCodec,
{
    pub fn new(requests: CoordinatorRequests<T, C>, network: NetworkConfig) -> Self {
        Self { requests, network }
    }

    /// Run the full sequence. The inbound pump must already be publishing,
    /// resets are confirmed by events.
    #[instrument(name = "coordinator_startup", skip(self), fields(pan_id = self.network.pan_id))]
    pub async fn run(&self) -> Result<CoordinatorInfo, RuntimeError> {
        let channels = self.network.channel_mask()?;

        info!("Phase 1: Resetting radio");
        self.reset().await?;

        info!("Phase 2: Writing network configuration");
        self.optional("set_time", current_time()).await;
        self.mandatory(
            "network_key",
            ConfigCommand::SetPreConfigKey(self.network.network_key),
        )
        .await?;
        self.mandatory(
            "logical_type",
            ConfigCommand::WriteConfiguration {
                id: config_ids::LOGICAL_TYPE,
                value: vec![0],
            },
        )
        .await?;
        self.mandatory("pan_id", ConfigCommand::SetPanId(self.network.pan_id))
            .await?;
        self.mandatory(
            "zdo_direct_callback",
            ConfigCommand::WriteConfiguration {
                id: config_ids::ZDO_DIRECT_CALLBACK,
                value: vec![1],
            },
        )
        .await?;
        self.mandatory(
            "security_mode",
            ConfigCommand::WriteConfiguration {
                id: config_ids::SECURITY_MODE,
                value: vec![1],
            },
        )
        .await?;
        self.mandatory(
            "extended_address",
            ConfigCommand::SetExtendedAddress(self.network.ieee_address),
        )
        .await?;
        self.mandatory("channels", ConfigCommand::SetChannels(channels))
            .await?;

        info!("Phase 3: Applying configuration");
        self.reset().await?;
        self.mandatory("enable_callbacks", ConfigCommand::EnableCallbacks)
            .await?;
        self.mandatory("start_request", ConfigCommand::StartRequest)
            .await?;

        let device_info = self
            .requests
            .transport()
            .device_info()
            .await
            .map_err(|source| RuntimeError::Startup {
                step: "device_info",
                source,
            })?;
        info!(
            ieee = %device_info.ieee_address,
            nwk = %device_info.network_address,
            "Phase 4: Network formed"
        );

        self.optional(
            "led",
            ConfigCommand::SetLed {
                led_id: LED_ID,
                on: self.network.led,
            },
        )
        .await;
        for registration in coordinator_endpoints() {
            self.optional("register_endpoint", ConfigCommand::RegisterEndpoint(registration))
                .await;
        }
        let timeout = if self.network.permit_join {
            PERMIT_JOIN_FOREVER
        } else {
            0x00
        };
        self.optional(
            "permit_join",
            ConfigCommand::PermitJoin {
                destination: device_info.network_address,
                timeout,
            },
        )
        .await;

        info!(permit_join = self.network.permit_join, "Coordinator started");
        Ok(CoordinatorInfo {
            ieee_address: device_info.ieee_address,
            network_address: device_info.network_address,
        })
    }

    async fn reset(&self) -> Result<(), RuntimeError> {
        let indication = self
            .requests
            .reset(ResetType::Soft)
            .await
            .map_err(RuntimeError::Reset)?;
        debug!(
            reason = indication.reason,
            major = indication.major_release,
            minor = indication.minor_release,
            "Radio reset"
        );
        Ok(())
    }

    async fn mandatory(
        &self,
        step: &'static str,
        command: ConfigCommand,
    ) -> Result<(), RuntimeError> {
        self.configure(step, command)
            .await
            .map_err(|source| RuntimeError::Startup { step, source })
    }

    async fn optional(&self, step: &'static str, command: ConfigCommand) {
        if let Err(e) = self.configure(step, command).await {
            warn!(step, error = %e, "Optional startup step failed, continuing");
        }
    }

    async fn configure(
        &self,
        step: &'static str,
        command: ConfigCommand,
    ) -> Result<(), TransportError> {
        debug!(step, ?command, "Configuring radio");
        self.requests.transport().configure(command).await
    }
}

fn current_time() -> ConfigCommand {
    let now = Local::now();
    ConfigCommand::SetTime {
        year: now.year() as u16,
        month: now.month() as u8,
        day: now.day() as u8,
        hour: now.hour() as u8,
        minute: now.minute() as u8,
        second: now.second() as u8,
    }
}

/// Application endpoints the coordinator registers, one per profile.
pub fn coordinator_endpoints() -> Vec<EndpointRegistration> {
    ENDPOINT_PROFILES
        .iter()
        .zip(1u8..)
        .map(|(&profile_id, endpoint)| EndpointRegistration {
            endpoint,
            profile_id,
            device_id: ENDPOINT_DEVICE_ID,
            device_version: 1,
            in_clusters: Vec::new(),
            out_clusters: Vec::new(),
        })
        .collect()
}
