//! On/Off and Level Control convenience commands.

use shared_types::clusters;
use shared_types::{
    ClusterCodec, CoordinatorTransport, LevelControlCommand, NetworkAddress, OnOffCommand,
    ZclCommand,
};

use crate::error::RequestError;
use crate::service::CoordinatorRequests;

impl<T, C> CoordinatorRequests<T, C>
where
    T: CoordinatorTransport,
    C: ClusterCodec,
{
    // =========================================================================
    // ON/OFF (0x0006)
    // =========================================================================

    pub async fn on_off(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        command: OnOffCommand,
    ) -> Result<(), RequestError> {
        let command_id = command.command_id();
        self.cluster_command(
            network_address,
            endpoint,
            clusters::ON_OFF,
            command_id,
            ZclCommand::OnOff(command),
        )
        .await
    }

    pub async fn off(&self, network_address: NetworkAddress, endpoint: u8) -> Result<(), RequestError> {
        self.on_off(network_address, endpoint, OnOffCommand::Off).await
    }

    pub async fn on(&self, network_address: NetworkAddress, endpoint: u8) -> Result<(), RequestError> {
        self.on_off(network_address, endpoint, OnOffCommand::On).await
    }

    pub async fn toggle(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
    ) -> Result<(), RequestError> {
        self.on_off(network_address, endpoint, OnOffCommand::Toggle).await
    }

    pub async fn off_with_effect(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        effect_id: u8,
        effect_variant: u8,
    ) -> Result<(), RequestError> {
        self.on_off(
            network_address,
            endpoint,
            OnOffCommand::OffWithEffect {
                effect_id,
                effect_variant,
            },
        )
        .await
    }

    pub async fn on_with_recall_global_scene(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
    ) -> Result<(), RequestError> {
        self.on_off(network_address, endpoint, OnOffCommand::OnWithRecallGlobalScene)
            .await
    }

    /// `on_time` and `off_wait_time` are in tenths of a second.
    pub async fn on_with_timed_off(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        on_off_control: u8,
        on_time: u16,
        off_wait_time: u16,
    ) -> Result<(), RequestError> {
        self.on_off(
            network_address,
            endpoint,
            OnOffCommand::OnWithTimedOff {
                on_off_control,
                on_time,
                off_wait_time,
            },
        )
        .await
    }

    // =========================================================================
    // LEVEL CONTROL (0x0008)
    // =========================================================================

    pub async fn level_control(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        command: LevelControlCommand,
    ) -> Result<(), RequestError> {
        let command_id = command.command_id();
        self.cluster_command(
            network_address,
            endpoint,
            clusters::LEVEL_CONTROL,
            command_id,
            ZclCommand::LevelControl(command),
        )
        .await
    }

    pub async fn move_to_level(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        level: u8,
        transition_time: u16,
    ) -> Result<(), RequestError> {
        self.level_control(
            network_address,
            endpoint,
            LevelControlCommand::MoveToLevel {
                level,
                transition_time,
            },
        )
        .await
    }

    pub async fn move_level(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        move_mode: u8,
        rate: u8,
    ) -> Result<(), RequestError> {
        self.level_control(
            network_address,
            endpoint,
            LevelControlCommand::Move { move_mode, rate },
        )
        .await
    }

    pub async fn step(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        step_mode: u8,
        step_size: u8,
        transition_time: u16,
    ) -> Result<(), RequestError> {
        self.level_control(
            network_address,
            endpoint,
            LevelControlCommand::Step {
                step_mode,
                step_size,
                transition_time,
            },
        )
        .await
    }

    pub async fn stop(&self, network_address: NetworkAddress, endpoint: u8) -> Result<(), RequestError> {
        self.level_control(network_address, endpoint, LevelControlCommand::Stop)
            .await
    }

    pub async fn move_to_level_on_off(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        level: u8,
        transition_time: u16,
    ) -> Result<(), RequestError> {
        self.level_control(
            network_address,
            endpoint,
            LevelControlCommand::MoveToLevelOnOff {
                level,
                transition_time,
            },
        )
        .await
    }

    pub async fn move_level_on_off(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        move_mode: u8,
        rate: u8,
    ) -> Result<(), RequestError> {
        self.level_control(
            network_address,
            endpoint,
            LevelControlCommand::MoveOnOff { move_mode, rate },
        )
        .await
    }

    pub async fn step_on_off(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
        step_mode: u8,
        step_size: u8,
        transition_time: u16,
    ) -> Result<(), RequestError> {
        self.level_control(
            network_address,
            endpoint,
            LevelControlCommand::StepOnOff {
                step_mode,
                step_size,
                transition_time,
            },
        )
        .await
    }

    pub async fn stop_on_off(
        &self,
        network_address: NetworkAddress,
        endpoint: u8,
    ) -> Result<(), RequestError> {
        self.level_control(network_address, endpoint, LevelControlCommand::StopOnOff)
            .await
    }
}
