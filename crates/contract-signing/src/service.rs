//! Contract Signing Service - the signing workflow
//!
//! ```text
//! find ──→ Contract::sign ──→ save ──→ publish ──→ Signed
//!   │            │              │
//!   └─ NotFound  └─ Conflict    └─ version conflict: re-read and retry
//! ```
//!
//! Save strictly happens-before publish, so a consumer that sees the event
//! can rely on the signed contract being stored.

use crate::domain::{Contract, ContractSignedEvent};
use crate::error::{InfrastructureError, SigningResult};
use crate::ports::inbound::{ContractSigningApi, SignContractCommand, SignContractOutcome};
use crate::ports::outbound::{ContractEventPublisher, ContractStore, StoreError, Versioned};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Signing workflow configuration
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigningConfig {
    /// How many times a save that lost an optimistic-concurrency race is
    /// re-attempted from a fresh read, counting the first attempt.
    pub max_save_attempts: u32,
}

impl Default for SigningConfig {
    fn default() -> Self {
        Self {
            max_save_attempts: 3,
        }
    }
}

/// Contract signing service
///
/// Store and publisher are injected; the service keeps no state between
/// requests.
pub struct ContractSigningService<S, P>
where
    S: ContractStore + 'static,
    P: ContractEventPublisher + 'static,
{
    config: SigningConfig,
    store: Arc<S>,
    publisher: Arc<P>,
}

impl<S, P> ContractSigningService<S, P>
where
    S: ContractStore + 'static,
    P: ContractEventPublisher + 'static,
{
    /// Create new signing service
    pub fn new(config: SigningConfig, store: Arc<S>, publisher: Arc<P>) -> Self {
        Self {
            config,
            store,
            publisher,
        }
    }

    /// Persist the signed contract, then publish its event.
    ///
    /// Runs on a spawned task: once the save has started, dropping the
    /// caller's future does not stop the save or the publish.
    async fn commit(
        &self,
        contract: Versioned<Contract>,
        event: ContractSignedEvent,
    ) -> SigningResult<u64> {
        let store = Arc::clone(&self.store);
        let publisher = Arc::clone(&self.publisher);

        let task = tokio::spawn(async move {
            let version = store.save(&contract).await?;
            publisher.publish(event).await?;
            Ok::<_, InfrastructureError>(version)
        });

        task.await
            .map_err(|e| InfrastructureError::Interrupted(e.to_string()))?
    }
}

#[async_trait]
impl<S, P> ContractSigningApi for ContractSigningService<S, P>
where
    S: ContractStore + 'static,
    P: ContractEventPublisher + 'static,
{
    async fn sign_contract(
        &self,
        command: SignContractCommand,
    ) -> SigningResult<SignContractOutcome> {
        let SignContractCommand {
            contract_id,
            signed_at,
        } = command;
        let max_attempts = self.config.max_save_attempts.max(1);
        let mut attempt = 1;

        loop {
            // 1. Load
            let Some(mut stored) = self.store.find(contract_id).await? else {
                warn!(contract_id = %contract_id, "Sign rejected: contract not found");
                return Ok(SignContractOutcome::NotFound);
            };

            // 2. Domain transition
            let event = match stored.value.sign(signed_at) {
                Ok(event) => event,
                Err(reason) => {
                    warn!(
                        contract_id = %contract_id,
                        prepared_at = %stored.value.prepared_at(),
                        signed_at = %signed_at,
                        reason = %reason,
                        "Sign rejected"
                    );
                    return Ok(SignContractOutcome::Conflict(reason));
                }
            };

            // 3 + 4. Persist, then publish
            match self.commit(stored, event).await {
                Ok(version) => {
                    info!(
                        contract_id = %contract_id,
                        signed_at = %signed_at,
                        version,
                        "Contract signed"
                    );
                    return Ok(SignContractOutcome::Signed);
                }
                Err(InfrastructureError::Store(StoreError::VersionConflict { actual, .. }))
                    if attempt < max_attempts =>
                {
                    debug!(
                        contract_id = %contract_id,
                        attempt,
                        stored_version = actual,
                        "Concurrent write detected, re-reading contract"
                    );
                    attempt += 1;
                }
                Err(e) => {
                    error!(contract_id = %contract_id, error = %e, "Signing failed");
                    return Err(e);
                }
            }
        }
    }
}
