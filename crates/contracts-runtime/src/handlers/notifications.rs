//! # Notification Handler
//!
//! Consumes `ContractSigned` events from the bus and notifies collaborators.
//! Notification here means a structured log line per event plus a running
//! tally of delivered notifications.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use contract_signing::{ContractEvent, ContractSignedEvent, ContractTopic};
use shared_bus::{EventFilter, InMemoryEventBus, Subscription};
use tokio::sync::watch;
use tracing::{debug, info};

/// Handler for contract lifecycle events.
pub struct NotificationHandler {
    /// Subscription to lifecycle events.
    subscription: Subscription<ContractEvent>,
    /// Shutdown signal.
    shutdown: watch::Receiver<bool>,
    /// Notifications sent so far.
    delivered: Arc<AtomicU64>,
}

impl NotificationHandler {
    /// Subscribe to lifecycle events on `bus`.
    ///
    /// Subscribing happens here, not in [`run`](Self::run), so no event
    /// published after construction is missed.
    pub fn new(bus: &InMemoryEventBus<ContractEvent>, shutdown: watch::Receiver<bool>) -> Self {
        Self {
            subscription: bus.subscribe(EventFilter::topics(vec![ContractTopic::Lifecycle])),
            shutdown,
            delivered: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Shared counter of delivered notifications.
    pub fn delivered(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.delivered)
    }

    /// Run until shutdown is signalled or the bus goes away.
    ///
    /// Events already buffered when shutdown arrives are still delivered.
    /// Returns the total number of notifications sent.
    pub async fn run(mut self) -> u64 {
        info!(
            topics = ?self.subscription.filter().topics,
            "[notifications] handler started"
        );

        loop {
            tokio::select! {
                changed = self.shutdown.changed() => {
                    if changed.is_err() || *self.shutdown.borrow() {
                        self.drain();
                        break;
                    }
                }
                event = self.subscription.recv() => {
                    match event {
                        Some(event) => self.handle(&event),
                        None => break,
                    }
                }
            }
        }

        let total = self.delivered.load(Ordering::Relaxed);
        info!(delivered = total, "[notifications] handler stopped");
        total
    }

    fn drain(&mut self) {
        while let Ok(Some(event)) = self.subscription.try_recv() {
            self.handle(&event);
        }
    }

    fn handle(&self, event: &ContractEvent) {
        match event {
            ContractEvent::ContractSigned(signed) => self.notify_signed(signed),
        }
    }

    fn notify_signed(&self, event: &ContractSignedEvent) {
        info!(
            contract_id = %event.contract_id(),
            customer_id = %event.customer_id(),
            "[notifications] contract signed"
        );
        info!(
            "EVENT_FLOW_JSON {}",
            serde_json::json!({
                "timestamp": chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Micros, true),
                "subsystem": "notifications",
                "event_type": "ContractSigned",
                "event_id": event.event_id().to_string(),
                "contract_id": event.contract_id().to_string(),
                "customer_id": event.customer_id().to_string(),
                "signed_at": event.occurred_at().to_rfc3339(),
            })
        );

        let total = self.delivered.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(total, "[notifications] delivered");
    }
}
