//! # Ports
//!
//! Hexagonal boundaries of the signing subsystem.

pub mod inbound;
pub mod outbound;

pub use inbound::{ContractSigningApi, ErrorResponse, SignContractCommand, SignContractOutcome};
pub use outbound::{
    ContractEventPublisher, ContractStore, MockEventPublisher, PublishError, StoreError, Versioned,
};
