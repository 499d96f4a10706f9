//! Correlation Engine Service
//!
//! Turns "send a command, the answer shows up later on the event stream"
//! into a single awaitable call.

use shared_bus::{EventFilter, InMemoryEventBus};
use shared_types::{EventKind, InboundEvent, TransportError};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::timeout;
use tracing::{debug, trace};

use crate::domain::RetryBudget;
use crate::error::CorrelationError;

/// Issues commands and waits for their correlated replies.
///
/// Cheap to clone; all clones share the same bus.
#[derive(Clone)]
pub struct CorrelationEngine {
    bus: Arc<InMemoryEventBus>,
}

impl CorrelationEngine {
    pub fn new(bus: Arc<InMemoryEventBus>) -> Self {
        Self { bus }
    }

    pub fn bus(&self) -> &Arc<InMemoryEventBus> {
        &self.bus
    }

    /// Run `action` and wait for the first event of kind `expected`.
    pub async fn call<A, Fut>(
        &self,
        action: A,
        expected: EventKind,
        wait: Duration,
    ) -> Result<InboundEvent, CorrelationError>
    where
        A: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), TransportError>>,
    {
        self.call_matching(action, EventFilter::kind(expected), |_| true, wait)
            .await
    }

    /// Run `action` and wait for the first event passing both `filter` and
    /// `matcher`.
    ///
    /// The listener is prepared before `action` runs so an immediate reply
    /// is not lost, and registered only once `action` succeeded. If `action`
    /// fails its error is returned as is and no wait happens. The listener
    /// is gone on every return path.
    pub async fn call_matching<A, Fut, M>(
        &self,
        action: A,
        filter: EventFilter,
        matcher: M,
        wait: Duration,
    ) -> Result<InboundEvent, CorrelationError>
    where
        A: FnOnce() -> Fut,
        Fut: Future<Output = Result<(), TransportError>>,
        M: Fn(&InboundEvent) -> bool,
    {
        let expected = filter.kinds.clone();
        let slot = self.bus.prepare(filter);

        action().await?;

        let mut subscription = slot.register();
        let matched = timeout(wait, async {
            while let Some(event) = subscription.recv().await {
                if matcher(&event) {
                    return Some(event);
                }
                trace!(kind = %event.kind(), "Ignoring non-matching event");
            }
            None
        })
        .await;

        match matched {
            Ok(Some(event)) => {
                debug!(kind = %event.kind(), "Correlated reply received");
                Ok(event)
            }
            Ok(None) => Err(CorrelationError::BusClosed),
            Err(_) => Err(CorrelationError::Timeout {
                expected,
                timeout: wait,
            }),
        }
    }

    /// `call` with up to `retries` additional attempts.
    ///
    /// Every attempt re-runs `action`, so it must be safe to repeat.
    pub async fn call_retryable<A, Fut>(
        &self,
        action: A,
        expected: EventKind,
        wait: Duration,
        retries: u32,
    ) -> Result<InboundEvent, CorrelationError>
    where
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<(), TransportError>>,
    {
        self.call_matching_retryable(action, EventFilter::kind(expected), |_| true, wait, retries)
            .await
    }

    /// `call_matching` with up to `retries` additional attempts.
    pub async fn call_matching_retryable<A, Fut, M>(
        &self,
        mut action: A,
        filter: EventFilter,
        matcher: M,
        wait: Duration,
        retries: u32,
    ) -> Result<InboundEvent, CorrelationError>
    where
        A: FnMut() -> Fut,
        Fut: Future<Output = Result<(), TransportError>>,
        M: Fn(&InboundEvent) -> bool,
    {
        let operation = format!("{:?}", filter.kinds);
        let mut budget = RetryBudget::new(operation, retries);
        loop {
            match self
                .call_matching(&mut action, filter.clone(), &matcher, wait)
                .await
            {
                Ok(event) => return Ok(event),
                Err(e) if budget.should_retry(&e) => continue,
                Err(e) => return Err(e),
            }
        }
    }
}
