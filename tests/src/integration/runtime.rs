//! # Runtime Scenarios
//!
//! Startup and lifetime of the assembled runtime.
//!
//! ## Scenarios
//!
//! 1. **Startup order**: radio commands issued in sequence, two confirmed resets
//! 2. **Link errors**: logged without stopping the pipeline
//! 3. **Notifications**: handed out exactly once
//! 4. **Configuration**: invalid settings rejected before the radio is touched

#[cfg(test)]
mod tests {
    use shared_types::{ConfigCommand, NetworkAddress, TransportError};
    use std::sync::Arc;
    use steward_runtime::{RuntimeError, StewardRuntime};

    use crate::fixtures::{test_config, JsonCodec, ScriptedRadio, SimDevice, COORDINATOR_IEEE};

    #[tokio::test]
    async fn test_startup_command_order() {
        let dir = tempfile::tempdir().unwrap();
        let radio = ScriptedRadio::new();
        let mut config = test_config(dir.path().join("devices.json"));
        config.network.permit_join = true;

        let runtime = StewardRuntime::start(config.clone(), radio.clone(), Arc::new(JsonCodec))
            .await
            .unwrap();

        assert_eq!(radio.resets(), 2);
        assert_eq!(runtime.coordinator().ieee_address, COORDINATOR_IEEE);
        assert_eq!(runtime.coordinator().network_address, NetworkAddress::COORDINATOR);

        let steps: Vec<&'static str> = radio
            .configured()
            .iter()
            .map(|command| match command {
                ConfigCommand::SetTime { .. } => "time",
                ConfigCommand::SetPreConfigKey(_) => "key",
                ConfigCommand::WriteConfiguration { id: 0x87, .. } => "logical_type",
                ConfigCommand::SetPanId(_) => "pan_id",
                ConfigCommand::WriteConfiguration { id: 0x8F, .. } => "zdo_callback",
                ConfigCommand::WriteConfiguration { id: 0x64, .. } => "security",
                ConfigCommand::WriteConfiguration { .. } => "other",
                ConfigCommand::SetExtendedAddress(_) => "extended_address",
                ConfigCommand::SetChannels(_) => "channels",
                ConfigCommand::EnableCallbacks => "callbacks",
                ConfigCommand::StartRequest => "start",
                ConfigCommand::SetLed { .. } => "led",
                ConfigCommand::RegisterEndpoint(_) => "endpoint",
                ConfigCommand::PermitJoin { .. } => "permit_join",
            })
            .collect();
        assert_eq!(
            steps,
            vec![
                "time",
                "key",
                "logical_type",
                "pan_id",
                "zdo_callback",
                "security",
                "extended_address",
                "channels",
                "callbacks",
                "start",
                "led",
                "endpoint",
                "endpoint",
                "endpoint",
                "endpoint",
                "endpoint",
                "endpoint",
                "permit_join",
            ]
        );
        assert_eq!(
            radio.configured().last(),
            Some(&ConfigCommand::PermitJoin {
                destination: NetworkAddress::COORDINATOR,
                timeout: 0xFF,
            })
        );
        assert!(radio
            .configured()
            .contains(&ConfigCommand::SetPreConfigKey(config.network.network_key)));
    }

    #[tokio::test]
    async fn test_link_errors_do_not_stop_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let widget = SimDevice::acme_widget();
        let radio = ScriptedRadio::new();
        radio.add_device(widget.clone());
        let mut runtime = StewardRuntime::start(
            test_config(dir.path().join("devices.json")),
            radio.clone(),
            Arc::new(JsonCodec),
        )
        .await
        .unwrap();
        let mut notifications = runtime.take_notifications().unwrap();

        radio
            .fail_link(TransportError::Io("frame checksum mismatch".into()))
            .await;
        radio.inject(widget.announce()).await;

        let device = notifications.registered.recv().await.unwrap();
        assert_eq!(device.ieee_address, widget.ieee_address);
    }

    #[tokio::test]
    async fn test_notifications_taken_once() {
        let dir = tempfile::tempdir().unwrap();
        let radio = ScriptedRadio::new();
        let mut runtime = StewardRuntime::start(
            test_config(dir.path().join("devices.json")),
            radio,
            Arc::new(JsonCodec),
        )
        .await
        .unwrap();

        assert!(runtime.take_notifications().is_some());
        assert!(runtime.take_notifications().is_none());
        runtime.shutdown();
    }

    #[tokio::test]
    async fn test_invalid_config_touches_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let radio = ScriptedRadio::new();
        let mut config = test_config(dir.path().join("devices.json"));
        config.network.channels = vec![5];

        let result = StewardRuntime::start(config, radio.clone(), Arc::new(JsonCodec)).await;

        assert!(matches!(result, Err(RuntimeError::Config(_))));
        assert_eq!(radio.resets(), 0);
        assert!(radio.configured().is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_database_fails_start() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.json");
        std::fs::write(&path, b"{ not json").unwrap();

        let result =
            StewardRuntime::start(test_config(path), ScriptedRadio::new(), Arc::new(JsonCodec))
                .await;

        assert!(matches!(result, Err(RuntimeError::Store(_))));
    }
}
