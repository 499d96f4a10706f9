//! # Transaction Scenarios
//!
//! Request operations through the inbound pump, with replies arriving on
//! the transport stream rather than being published directly.
//!
//! ## Scenarios
//!
//! 1. **Id matching**: a confirmation for another transaction never completes ours
//! 2. **Retry**: each retry allocates a fresh transaction id
//! 3. **Commands**: default responses and attribute reads decoded end to end
//! 4. **ZDO**: bind and descriptor requests matched on the responding device

#[cfg(test)]
mod tests {
    use shared_types::{
        AttributeValue, BindRequest, BindTarget, IeeeAddress, PowerSource,
        WriteAttributeRecord, ZclStatus,
    };
    use zs_02_transactions::{TransactionError, TransactionIdProvider};
    use zs_04_requests::RequestError;

    use crate::fixtures::{fast_policy, wired_requests, ConfirmScript, ScriptedRadio, SimDevice};

    // =============================================================================
    // TRANSACTION IDS
    // =============================================================================

    #[tokio::test(start_paused = true)]
    async fn test_stray_confirmation_does_not_match() {
        let widget = SimDevice::acme_widget();
        let radio = ScriptedRadio::new();
        radio.add_device(widget.clone());
        radio.set_confirm_script(ConfirmScript::StrayFirst);
        let (_bus, requests) =
            wired_requests(&radio, TransactionIdProvider::starting_after(6), fast_policy()).await;

        requests.toggle(widget.network_address, 1).await.unwrap();

        let ids: Vec<u8> = radio.data_requests().iter().map(|r| r.transaction_id).collect();
        assert_eq!(ids, vec![7]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_stray_confirmations_time_out() {
        let widget = SimDevice::acme_widget();
        let radio = ScriptedRadio::new();
        radio.add_device(widget.clone());
        radio.set_confirm_script(ConfirmScript::StrayOnly);
        let (_bus, requests) =
            wired_requests(&radio, TransactionIdProvider::starting_after(6), fast_policy()).await;

        let err = requests.toggle(widget.network_address, 1).await.unwrap_err();

        // id 7 was confirmed as 8 and timed out; the retry used 8 and timed out too.
        assert!(matches!(
            err,
            RequestError::Transaction(TransactionError::ConfirmTimeout { transaction_id: 8 })
        ));
        let ids: Vec<u8> = radio.data_requests().iter().map(|r| r.transaction_id).collect();
        assert_eq!(ids, vec![7, 8]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_device_fails_without_waiting() {
        let radio = ScriptedRadio::new();
        let (_bus, requests) =
            wired_requests(&radio, TransactionIdProvider::new(), fast_policy()).await;

        let err = requests
            .toggle(SimDevice::acme_widget().network_address, 1)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            RequestError::Transaction(TransactionError::Send { .. })
        ));
        // Initial attempt plus one retry.
        assert_eq!(radio.data_requests().len(), 2);
    }

    // =============================================================================
    // ZCL
    // =============================================================================

    #[tokio::test]
    async fn test_read_basic_attributes() {
        let widget = SimDevice::acme_widget();
        let radio = ScriptedRadio::new();
        radio.add_device(widget.clone());
        let (_bus, requests) =
            wired_requests(&radio, TransactionIdProvider::new(), fast_policy()).await;

        let attributes = requests
            .read_basic_attributes(widget.network_address)
            .await
            .unwrap();

        assert_eq!(attributes.manufacturer.as_deref(), Some("Acme"));
        assert_eq!(attributes.model.as_deref(), Some("Widget"));
        assert_eq!(attributes.power_source, Some(PowerSource::Battery));
    }

    #[tokio::test]
    async fn test_write_attributes() {
        let switch = SimDevice::triple_switch();
        let radio = ScriptedRadio::new();
        radio.add_device(switch.clone());
        let (_bus, requests) =
            wired_requests(&radio, TransactionIdProvider::new(), fast_policy()).await;

        let statuses = requests
            .write_attributes(
                switch.network_address,
                2,
                0x0006,
                vec![WriteAttributeRecord {
                    attribute_id: 0x4003,
                    value: AttributeValue::Unsigned(2),
                }],
            )
            .await
            .unwrap();

        assert_eq!(statuses.len(), 1);
        assert_eq!(statuses[0].status, ZclStatus::Success);
        assert_eq!(radio.data_requests()[0].dst_endpoint, 2);
    }

    #[tokio::test]
    async fn test_commands_use_fresh_ids() {
        let switch = SimDevice::triple_switch();
        let radio = ScriptedRadio::new();
        radio.add_device(switch.clone());
        let (_bus, requests) =
            wired_requests(&radio, TransactionIdProvider::new(), fast_policy()).await;

        requests.on(switch.network_address, 3).await.unwrap();
        requests
            .move_to_level(switch.network_address, 3, 128, 10)
            .await
            .unwrap();
        requests.off(switch.network_address, 3).await.unwrap();

        let sent: Vec<(u8, u16)> = radio
            .data_requests()
            .iter()
            .map(|r| (r.transaction_id, r.cluster_id))
            .collect();
        assert_eq!(sent, vec![(1, 0x0006), (2, 0x0008), (3, 0x0006)]);
    }

    // =============================================================================
    // ZDO
    // =============================================================================

    #[tokio::test]
    async fn test_bind_and_unbind() {
        let switch = SimDevice::triple_switch();
        let radio = ScriptedRadio::new();
        radio.add_device(switch.clone());
        let (_bus, requests) =
            wired_requests(&radio, TransactionIdProvider::new(), fast_policy()).await;

        let request = BindRequest {
            destination: switch.network_address,
            src_ieee_address: switch.ieee_address,
            src_endpoint: 1,
            cluster_id: 0x0006,
            target: BindTarget::Device {
                ieee_address: IeeeAddress(0x0012_4b00_019c_2ee9),
                endpoint: 1,
            },
        };
        requests.bind(request.clone()).await.unwrap();
        requests.unbind(request).await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_descriptors_for_two_devices() {
        let widget = SimDevice::acme_widget();
        let switch = SimDevice::triple_switch();
        let radio = ScriptedRadio::new();
        radio.add_device(widget.clone());
        radio.add_device(switch.clone());
        let (_bus, requests) =
            wired_requests(&radio, TransactionIdProvider::new(), fast_policy()).await;

        let (a, b) = tokio::join!(
            requests.active_endpoints(widget.network_address),
            requests.active_endpoints(switch.network_address),
        );

        assert_eq!(a.unwrap().endpoints, vec![1]);
        assert_eq!(b.unwrap().endpoints, vec![1, 2, 3]);
    }
}
