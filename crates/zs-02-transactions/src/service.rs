//! Transaction Correlator Service
//!
//! ## Protocol
//!
//! 1. Allocate a transaction id.
//! 2. Prepare the confirmation and response listeners.
//! 3. Issue the request. A rejected request ends the transaction here.
//! 4. Wait for the `DataConfirm` with our id. A non-success status ends the
//!    transaction without ever registering the response listener.
//! 5. Wait, in a fresh timeout window, for the incoming message carrying our
//!    id from the target address.

use shared_bus::{EventFilter, InMemoryEventBus};
use shared_types::{
    DataConfirm, EventKind, InboundEvent, NetworkAddress, TransportError, ZclIncomingMessage,
};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, trace};
use zs_01_correlation::RetryBudget;

use crate::domain::{Transaction, TransactionIdProvider};
use crate::error::TransactionError;

/// Correlates application data requests with their confirmation and reply.
#[derive(Clone)]
pub struct TransactionCorrelator {
    bus: Arc<InMemoryEventBus>,
    ids: Arc<TransactionIdProvider>,
}

impl TransactionCorrelator {
    pub fn new(bus: Arc<InMemoryEventBus>, ids: Arc<TransactionIdProvider>) -> Self {
        Self { bus, ids }
    }

    pub fn id_provider(&self) -> &Arc<TransactionIdProvider> {
        &self.ids
    }

    /// Run one transaction against `target`.
    ///
    /// `request` receives the target and the allocated transaction id and
    /// must issue the data request carrying that id.
    pub async fn send<R, Fut>(
        &self,
        target: NetworkAddress,
        request: R,
        wait: Duration,
    ) -> Result<ZclIncomingMessage, TransactionError>
    where
        R: FnOnce(NetworkAddress, u8) -> Fut,
        Fut: Future<Output = Result<(), TransportError>>,
    {
        let transaction = Transaction::new(self.ids.next(), target);
        let transaction_id = transaction.id;

        let confirm_slot = self.bus.prepare(EventFilter::kind(EventKind::DataConfirm));
        let response_slot = self
            .bus
            .prepare(EventFilter::kind(EventKind::IncomingMessage).from_source(target));

        request(target, transaction_id)
            .await
            .map_err(|source| TransactionError::Send {
                transaction_id,
                source,
            })?;
        trace!(transaction_id, target = %target, "Request accepted, awaiting confirmation");

        let mut confirms = confirm_slot.register();
        let confirmed = timeout(wait, async {
            while let Some(event) = confirms.recv().await {
                if let InboundEvent::DataConfirm(confirm) = event {
                    if transaction.is_confirmed_by(&confirm) {
                        return Some(confirm);
                    }
                }
            }
            None
        })
        .await;
        drop(confirms);

        let confirm: DataConfirm = match confirmed {
            Ok(Some(confirm)) => confirm,
            Ok(None) => return Err(TransactionError::BusClosed),
            Err(_) => return Err(TransactionError::ConfirmTimeout { transaction_id }),
        };
        if !confirm.status.is_success() {
            return Err(TransactionError::Status {
                transaction_id,
                status: confirm.status,
            });
        }
        trace!(transaction_id, "Delivery confirmed, awaiting response");

        let mut responses = response_slot.register();
        let answered = timeout(wait, async {
            while let Some(event) = responses.recv().await {
                if let InboundEvent::IncomingMessage(message) = event {
                    if transaction.is_answered_by(&message) {
                        return Some(message);
                    }
                }
            }
            None
        })
        .await;

        match answered {
            Ok(Some(message)) => {
                debug!(transaction_id, target = %target, "Transaction completed");
                Ok(message)
            }
            Ok(None) => Err(TransactionError::BusClosed),
            Err(_) => Err(TransactionError::ResponseTimeout { transaction_id }),
        }
    }

    /// `send` with up to `retries` additional attempts, each with a new
    /// transaction id and a re-issued request.
    pub async fn send_retryable<R, Fut>(
        &self,
        target: NetworkAddress,
        mut request: R,
        wait: Duration,
        retries: u32,
    ) -> Result<ZclIncomingMessage, TransactionError>
    where
        R: FnMut(NetworkAddress, u8) -> Fut,
        Fut: Future<Output = Result<(), TransportError>>,
    {
        let mut budget = RetryBudget::new(format!("transaction to {target}"), retries);
        loop {
            match self.send(target, &mut request, wait).await {
                Ok(message) => return Ok(message),
                Err(e) if budget.should_retry(&e) => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
