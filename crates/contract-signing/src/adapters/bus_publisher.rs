//! Event publisher adapter backed by the shared bus.

use crate::domain::{ContractEvent, ContractSignedEvent};
use crate::ports::outbound::{ContractEventPublisher, PublishError};
use async_trait::async_trait;
use shared_bus::{BusError, EventPublisher};
use std::sync::Arc;
use tracing::debug;

/// Publishes contract events onto any [`EventPublisher`] for [`ContractEvent`].
pub struct BusContractPublisher<B> {
    bus: Arc<B>,
}

impl<B> BusContractPublisher<B>
where
    B: EventPublisher<ContractEvent>,
{
    /// Wrap a bus.
    pub fn new(bus: Arc<B>) -> Self {
        Self { bus }
    }
}

impl From<BusError> for PublishError {
    fn from(err: BusError) -> Self {
        match err {
            BusError::Closed => Self::Closed,
        }
    }
}

#[async_trait]
impl<B> ContractEventPublisher for BusContractPublisher<B>
where
    B: EventPublisher<ContractEvent>,
{
    async fn publish(&self, event: ContractSignedEvent) -> Result<(), PublishError> {
        let contract_id = event.contract_id();
        let receivers = self.bus.publish(ContractEvent::ContractSigned(event)).await?;

        debug!(contract_id = %contract_id, receivers, "ContractSigned handed to bus");
        Ok(())
    }
}
