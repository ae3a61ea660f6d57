//! # Outbound Ports
//!
//! Traits for the collaborators the signing workflow depends on: contract
//! persistence and event delivery.

use crate::domain::{Contract, ContractId, ContractSignedEvent};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;

/// A stored value together with the version it was read at.
///
/// Saving checks the version to detect concurrent writers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Versioned<T> {
    /// The stored value.
    pub value: T,
    /// Version observed when the value was read.
    pub version: u64,
}

impl<T> Versioned<T> {
    /// Pair a value with a version.
    pub fn new(value: T, version: u64) -> Self {
        Self { value, version }
    }
}

/// Contract persistence errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A contract with the same id was already inserted.
    #[error("Contract already exists: {0}")]
    AlreadyExists(ContractId),

    /// Save targeted a contract the store does not hold.
    #[error("Contract not stored: {0}")]
    Missing(ContractId),

    /// Another writer saved the contract since it was read.
    #[error("Version conflict on contract {id}: expected {expected}, found {actual}")]
    VersionConflict {
        /// Contract being saved
        id: ContractId,
        /// Version the writer read
        expected: u64,
        /// Version currently stored
        actual: u64,
    },

    /// Backend failure.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),
}

/// Contract store - outbound port.
///
/// Writes are atomic per contract: readers observe either the previous or
/// the new version, never a mix.
#[async_trait]
pub trait ContractStore: Send + Sync {
    /// Add a newly prepared contract at version 1.
    async fn insert(&self, contract: Contract) -> Result<(), StoreError>;

    /// Look up a contract by id.
    async fn find(&self, id: ContractId) -> Result<Option<Versioned<Contract>>, StoreError>;

    /// Replace a contract if its stored version still equals
    /// `contract.version`. Returns the new version.
    async fn save(&self, contract: &Versioned<Contract>) -> Result<u64, StoreError>;
}

/// Event delivery errors.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PublishError {
    /// The delivery channel no longer accepts events.
    #[error("Event channel closed")]
    Closed,

    /// Delivery failed for another reason.
    #[error("Event delivery failed: {0}")]
    Delivery(String),
}

/// Contract event publisher - outbound port.
#[async_trait]
pub trait ContractEventPublisher: Send + Sync {
    /// Hand a signed-contract event to the delivery mechanism.
    async fn publish(&self, event: ContractSignedEvent) -> Result<(), PublishError>;
}

// =============================================================================
// Mock Implementations for Testing
// =============================================================================

/// Publisher that records every event it accepts.
#[derive(Default)]
pub struct MockEventPublisher {
    published: Mutex<Vec<ContractSignedEvent>>,
    failing: AtomicBool,
}

impl MockEventPublisher {
    /// Create a recording publisher.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent publishes fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Events accepted so far, in publish order.
    pub fn published(&self) -> Vec<ContractSignedEvent> {
        self.published.lock().clone()
    }

    /// Number of events accepted so far.
    pub fn published_count(&self) -> usize {
        self.published.lock().len()
    }
}

#[async_trait]
impl ContractEventPublisher for MockEventPublisher {
    async fn publish(&self, event: ContractSignedEvent) -> Result<(), PublishError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(PublishError::Delivery("mock publisher failure".to_string()));
        }
        self.published.lock().push(event);
        Ok(())
    }
}
