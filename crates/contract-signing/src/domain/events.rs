//! # Domain Events
//!
//! Facts emitted by the signing subsystem for other subsystems to consume.

use super::value_objects::{ContractId, CustomerId, Timestamp};
use serde::Serialize;
use shared_bus::BusEvent;
use uuid::Uuid;

/// Source name carried by every event this subsystem publishes.
pub const EVENT_SOURCE: &str = "contract-signing";

/// A contract was signed.
///
/// Only [`Contract::sign`](super::Contract::sign) produces this value.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContractSignedEvent {
    event_id: Uuid,
    contract_id: ContractId,
    customer_id: CustomerId,
    occurred_at: Timestamp,
}

impl ContractSignedEvent {
    pub(crate) fn new(contract_id: ContractId, customer_id: CustomerId, occurred_at: Timestamp) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            contract_id,
            customer_id,
            occurred_at,
        }
    }

    /// Unique id of this event occurrence.
    #[must_use]
    pub fn event_id(&self) -> Uuid {
        self.event_id
    }

    /// The signed contract.
    #[must_use]
    pub fn contract_id(&self) -> ContractId {
        self.contract_id
    }

    /// Owner of the signed contract.
    #[must_use]
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// The accepted signature time.
    #[must_use]
    pub fn occurred_at(&self) -> Timestamp {
        self.occurred_at
    }
}

/// Bus topics for contract events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ContractTopic {
    /// Lifecycle transitions (prepared → signed).
    Lifecycle,
}

/// Every event the signing subsystem puts on the bus.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum ContractEvent {
    /// A contract moved to the signed state.
    ContractSigned(ContractSignedEvent),
}

impl From<ContractSignedEvent> for ContractEvent {
    fn from(event: ContractSignedEvent) -> Self {
        Self::ContractSigned(event)
    }
}

impl BusEvent for ContractEvent {
    type Topic = ContractTopic;

    fn topic(&self) -> ContractTopic {
        match self {
            Self::ContractSigned(_) => ContractTopic::Lifecycle,
        }
    }

    fn source(&self) -> &'static str {
        EVENT_SOURCE
    }
}
