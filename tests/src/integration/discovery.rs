//! # Device Discovery Scenarios
//!
//! Full runtime against the simulated network:
//!
//! ```text
//! [ScriptedRadio] ──announce──→ [InboundPump] ──→ [Event Bus] ──→ [Lifecycle Adapter]
//!        ↑                                                              │
//!        └──── ZDO / ZCL requests ←── [Registration Worker] ←──queue────┘
//!                                              │
//!                                              ↓
//!                                   device database + notifications
//! ```
//!
//! ## Scenarios
//!
//! 1. **Registration**: single endpoint device, one registered event
//! 2. **Identity**: re-announce updates the address, never duplicates
//! 3. **Partial endpoints**: one failing descriptor drops one endpoint
//! 4. **Abandonment**: a silent device is not registered until it announces again
//! 5. **Leave**: device removed and unregistered event emitted
//! 6. **Routing**: messages from unknown sources are dropped

#[cfg(test)]
mod tests {
    use shared_types::{
        IeeeAddress, LogicalType, NetworkAddress, PowerSource, ZclCommand,
    };
    use std::sync::Arc;
    use std::time::Duration;
    use steward_runtime::StewardRuntime;
    use tokio::time::timeout;
    use zs_03_device_registry::{DeviceStore, JsonFileDeviceStore};
    use zs_05_lifecycle::NotificationReceivers;

    use crate::fixtures::{test_config, JsonCodec, ScriptedRadio, SimDevice};

    // =============================================================================
    // TEST FIXTURES
    // =============================================================================

    struct Gateway {
        radio: Arc<ScriptedRadio>,
        runtime: StewardRuntime<ScriptedRadio, JsonCodec>,
        notifications: NotificationReceivers,
        dir: tempfile::TempDir,
    }

    async fn gateway(devices: Vec<SimDevice>) -> Gateway {
        let dir = tempfile::tempdir().unwrap();
        let radio = ScriptedRadio::new();
        for device in devices {
            radio.add_device(device);
        }
        let mut runtime = StewardRuntime::start(
            test_config(dir.path().join("devices.json")),
            radio.clone(),
            Arc::new(JsonCodec),
        )
        .await
        .unwrap();
        let notifications = runtime.take_notifications().unwrap();
        Gateway {
            radio,
            runtime,
            notifications,
            dir,
        }
    }

    // =============================================================================
    // REGISTRATION
    // =============================================================================

    #[tokio::test]
    async fn test_acme_widget_registration() {
        let widget = SimDevice::acme_widget();
        let mut gw = gateway(vec![widget.clone()]).await;

        gw.radio.inject(widget.announce()).await;
        let device = gw.notifications.registered.recv().await.unwrap();

        assert_eq!(device.ieee_address.to_string(), "00:11:22:33:44:55:66:77");
        assert_eq!(device.network_address, NetworkAddress(0x1234));
        assert_eq!(device.manufacturer, "Acme");
        assert_eq!(device.model, "Widget");
        assert_eq!(device.power_source, PowerSource::Battery);
        assert_eq!(device.logical_type, LogicalType::EndDevice);
        assert!(!device.main_powered);

        assert_eq!(device.endpoints.len(), 1);
        let endpoint = &device.endpoints[0];
        assert_eq!(endpoint.id, 1);
        assert_eq!(endpoint.profile_id, 0x0104);
        assert_eq!(endpoint.device_id, 0x0100);
        assert_eq!(endpoint.device_version, 1);
        let ids: Vec<u16> = endpoint.in_clusters.iter().map(|c| c.id).collect();
        assert_eq!(ids, vec![0x0000, 0x0001, 0x0003]);
        assert!(endpoint.in_clusters.iter().all(|c| c.supported));
        assert_eq!(endpoint.in_clusters[0].name.as_deref(), Some("Basic"));

        assert_eq!(gw.runtime.devices().get(widget.ieee_address), Some(device));
        assert!(gw.notifications.registered.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_registration_reads_basic_cluster_on_all_endpoints() {
        let widget = SimDevice::acme_widget();
        let mut gw = gateway(vec![widget.clone()]).await;

        gw.radio.inject(widget.announce()).await;
        gw.notifications.registered.recv().await.unwrap();

        let requests = gw.radio.data_requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].dst_endpoint, 0xFF);
        assert_eq!(requests[0].src_endpoint, 1);
        assert_eq!(requests[0].cluster_id, 0x0000);
        assert_eq!(requests[0].radius, 15);
    }

    #[tokio::test]
    async fn test_registration_is_persisted() {
        let widget = SimDevice::acme_widget();
        let mut gw = gateway(vec![widget.clone()]).await;
        let path = gw.dir.path().join("devices.json");

        gw.radio.inject(widget.announce()).await;
        let device = gw.notifications.registered.recv().await.unwrap();

        let reopened = JsonFileDeviceStore::open(&path).unwrap();
        assert_eq!(reopened.get(widget.ieee_address), Some(device));
    }

    // =============================================================================
    // IDENTITY
    // =============================================================================

    #[tokio::test]
    async fn test_reannounce_never_duplicates() {
        let widget = SimDevice::acme_widget();
        let mut gw = gateway(vec![widget.clone()]).await;

        gw.radio.inject(widget.announce()).await;
        gw.notifications.registered.recv().await.unwrap();

        gw.radio
            .rejoin(widget.ieee_address, NetworkAddress(0x7e01))
            .await;
        let device = gw.notifications.became_available.recv().await.unwrap();

        assert_eq!(device.network_address, NetworkAddress(0x7e01));
        let all = gw.runtime.devices().all();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].network_address, NetworkAddress(0x7e01));
        assert!(gw.notifications.registered.try_recv().is_err());
        // No second interrogation for a known device.
        assert_eq!(gw.radio.data_requests().len(), 1);
    }

    #[tokio::test]
    async fn test_reannounce_after_restart_becomes_available() {
        let widget = SimDevice::acme_widget();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("devices.json");

        {
            let radio = ScriptedRadio::new();
            radio.add_device(widget.clone());
            let mut runtime =
                StewardRuntime::start(test_config(path.clone()), radio.clone(), Arc::new(JsonCodec))
                    .await
                    .unwrap();
            let mut notifications = runtime.take_notifications().unwrap();
            radio.inject(widget.announce()).await;
            notifications.registered.recv().await.unwrap();
            runtime.shutdown();
        }

        let radio = ScriptedRadio::new();
        radio.add_device(widget.clone());
        let mut runtime = StewardRuntime::start(test_config(path), radio.clone(), Arc::new(JsonCodec))
            .await
            .unwrap();
        let mut notifications = runtime.take_notifications().unwrap();

        radio.inject(widget.announce()).await;
        let device = notifications.became_available.recv().await.unwrap();

        assert_eq!(device.model, "Widget");
        assert!(radio.data_requests().is_empty());
    }

    // =============================================================================
    // PARTIAL ENDPOINTS AND ABANDONMENT
    // =============================================================================

    #[tokio::test]
    async fn test_failing_endpoint_is_skipped() {
        let mut switch = SimDevice::triple_switch();
        switch.failing_endpoints = vec![2];
        let mut gw = gateway(vec![switch.clone()]).await;

        gw.radio.inject(switch.announce()).await;
        let device = gw.notifications.registered.recv().await.unwrap();

        let ids: Vec<u8> = device.endpoints.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(device.main_powered);
        assert_eq!(device.logical_type, LogicalType::Router);
    }

    #[tokio::test(start_paused = true)]
    async fn test_silent_device_abandoned_until_next_announce() {
        let mut widget = SimDevice::acme_widget();
        widget.silent_node_descriptor = true;
        let mut gw = gateway(vec![widget.clone()]).await;

        gw.radio.inject(widget.announce()).await;
        let waited = timeout(Duration::from_secs(60), gw.notifications.registered.recv()).await;
        assert!(waited.is_err());
        assert!(!gw.runtime.devices().exists(widget.ieee_address));

        widget.silent_node_descriptor = false;
        gw.radio.add_device(widget.clone());
        gw.radio.inject(widget.announce()).await;

        let device = gw.notifications.registered.recv().await.unwrap();
        assert_eq!(device.ieee_address, widget.ieee_address);
    }

    #[tokio::test]
    async fn test_devices_registered_one_at_a_time() {
        let widget = SimDevice::acme_widget();
        let switch = SimDevice::triple_switch();
        let mut gw = gateway(vec![widget.clone(), switch.clone()]).await;

        gw.radio.inject(widget.announce()).await;
        gw.radio.inject(switch.announce()).await;

        let first = gw.notifications.registered.recv().await.unwrap();
        let second = gw.notifications.registered.recv().await.unwrap();
        assert_eq!(first.ieee_address, widget.ieee_address);
        assert_eq!(second.ieee_address, switch.ieee_address);
        assert_eq!(gw.runtime.devices().all().len(), 2);
    }

    // =============================================================================
    // LEAVE AND ROUTING
    // =============================================================================

    #[tokio::test]
    async fn test_leave_unregisters() {
        let widget = SimDevice::acme_widget();
        let mut gw = gateway(vec![widget.clone()]).await;

        gw.radio.inject(widget.announce()).await;
        gw.notifications.registered.recv().await.unwrap();

        gw.radio.inject(widget.leave()).await;
        let device = gw.notifications.unregistered.recv().await.unwrap();

        assert_eq!(device.ieee_address, widget.ieee_address);
        assert!(!gw.runtime.devices().exists(widget.ieee_address));
    }

    #[tokio::test]
    async fn test_leave_of_unknown_device_is_ignored() {
        let widget = SimDevice::acme_widget();
        let mut gw = gateway(vec![]).await;

        gw.radio.inject(widget.leave()).await;
        gw.radio.inject(widget.on_off_report(true)).await;

        // The report is dropped too; give the pipeline a turn before checking.
        tokio::task::yield_now().await;
        assert!(gw.notifications.unregistered.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_messages_from_unknown_sources_dropped() {
        let widget = SimDevice::acme_widget();
        let stranger = SimDevice {
            ieee_address: IeeeAddress(0xdead_beef_0000_0001),
            network_address: NetworkAddress(0x0bad),
            ..SimDevice::acme_widget()
        };
        let mut gw = gateway(vec![widget.clone()]).await;

        gw.radio.inject(widget.announce()).await;
        gw.notifications.registered.recv().await.unwrap();

        gw.radio.inject(stranger.on_off_report(true)).await;
        gw.radio.inject(widget.on_off_report(false)).await;

        // Discovery replies may be routed too once the device is known.
        let routed = loop {
            let routed = gw.notifications.incoming_message.recv().await.unwrap();
            assert_eq!(routed.device.ieee_address, widget.ieee_address);
            if routed.message.cluster_id == 0x0006 {
                break routed;
            }
        };
        assert_eq!(routed.message.src_address, NetworkAddress(0x1234));
        assert!(matches!(
            routed.message.frame.command,
            ZclCommand::ReportAttributes(_)
        ));
    }
}
