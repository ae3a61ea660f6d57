//! In-memory contract store.
//!
//! Keeps contracts in a `HashMap` behind a single lock, so every save is
//! atomic. Versions start at 1 and increase by one per save.

use crate::domain::{Contract, ContractId};
use crate::ports::outbound::{ContractStore, StoreError, Versioned};
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use tracing::debug;

/// Contract store backed by process memory.
#[derive(Default)]
pub struct InMemoryContractStore {
    contracts: RwLock<HashMap<ContractId, Versioned<Contract>>>,
    writes: AtomicU64,
    unavailable: AtomicBool,
}

impl InMemoryContractStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful inserts and saves.
    pub fn writes(&self) -> u64 {
        self.writes.load(Ordering::Relaxed)
    }

    /// Number of stored contracts.
    pub fn len(&self) -> usize {
        self.contracts.read().len()
    }

    /// Whether the store holds no contracts.
    pub fn is_empty(&self) -> bool {
        self.contracts.read().is_empty()
    }

    /// Simulate a backend outage: every operation fails while set.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("in-memory store offline".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl ContractStore for InMemoryContractStore {
    async fn insert(&self, contract: Contract) -> Result<(), StoreError> {
        self.check_available()?;

        let id = contract.id();
        let mut contracts = self.contracts.write();
        if contracts.contains_key(&id) {
            return Err(StoreError::AlreadyExists(id));
        }
        contracts.insert(id, Versioned::new(contract, 1));
        self.writes.fetch_add(1, Ordering::Relaxed);

        debug!(contract_id = %id, "Contract inserted");
        Ok(())
    }

    async fn find(&self, id: ContractId) -> Result<Option<Versioned<Contract>>, StoreError> {
        self.check_available()?;
        Ok(self.contracts.read().get(&id).cloned())
    }

    async fn save(&self, contract: &Versioned<Contract>) -> Result<u64, StoreError> {
        self.check_available()?;

        let id = contract.value.id();
        let mut contracts = self.contracts.write();
        let stored = contracts.get_mut(&id).ok_or(StoreError::Missing(id))?;

        if stored.version != contract.version {
            return Err(StoreError::VersionConflict {
                id,
                expected: contract.version,
                actual: stored.version,
            });
        }

        let version = stored.version + 1;
        *stored = Versioned::new(contract.value.clone(), version);
        self.writes.fetch_add(1, Ordering::Relaxed);

        debug!(contract_id = %id, version, "Contract saved");
        Ok(version)
    }
}
