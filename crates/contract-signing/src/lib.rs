//! # contract-signing
//!
//! Moves a prepared contract into the signed state and announces it.
//!
//! **Architecture:** Hexagonal (DDD + Ports/Adapters)
//!
//! ## Overview
//!
//! - **Eligibility window**: a signature is accepted only within 30 days of
//!   preparation, and never before it.
//! - **Terminal state**: a signed contract cannot be signed again.
//! - **Ordered side effects**: the signed contract is saved before its
//!   `ContractSigned` event is published.
//!
//! ```text
//! SignContractCommand ──→ ContractSigningService
//!                              │
//!                              ├── find / save ──→ ContractStore
//!                              │
//!                              └── ContractSigned ──→ ContractEventPublisher ──→ Event Bus
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! contract-signing/
//! ├── domain/     # Contract, ContractState, ContractSignedEvent, ContractError
//! ├── ports/      # ContractSigningApi + store/publisher traits
//! ├── adapters/   # In-memory store, shared-bus publisher
//! └── service.rs  # The signing workflow
//! ```
//!
//! ## Example
//!
//! ```rust,ignore
//! use contract_signing::{ContractSigningService, SigningConfig, SignContractCommand};
//! use contract_signing::ports::ContractSigningApi;
//!
//! let service = ContractSigningService::new(SigningConfig::default(), store, publisher);
//!
//! match service.sign_contract(SignContractCommand { contract_id, signed_at }).await? {
//!     SignContractOutcome::Signed => {}
//!     SignContractOutcome::NotFound => {}
//!     SignContractOutcome::Conflict(reason) => eprintln!("{reason}"),
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

// Re-exports
pub use adapters::{BusContractPublisher, InMemoryContractStore};
pub use domain::{
    eligibility_window, Contract, ContractError, ContractEvent, ContractId, ContractSignedEvent,
    ContractState, ContractTopic, CustomerId, Timestamp, ELIGIBILITY_WINDOW_DAYS, EVENT_SOURCE,
};
pub use error::{InfrastructureError, SigningResult};
pub use ports::{
    ContractEventPublisher, ContractSigningApi, ContractStore, ErrorResponse, MockEventPublisher,
    PublishError, SignContractCommand, SignContractOutcome, StoreError, Versioned,
};
pub use service::{ContractSigningService, SigningConfig};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
