//! # Domain Entities
//!
//! The `Contract` aggregate and its lifecycle.
//!
//! ## State Machine
//!
//! ```text
//! [Prepared] ──sign(signed_at)──→ [Signed { signed_at }]   (terminal)
//! ```
//!
//! The signature timestamp lives inside the `Signed` variant, so a contract
//! can never be prepared-with-signature or signed-without-one.

use super::errors::ContractError;
use super::events::ContractSignedEvent;
use super::value_objects::{eligibility_window, ContractId, CustomerId, Timestamp};
use serde::Serialize;

/// Lifecycle state of a contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "camelCase")]
pub enum ContractState {
    /// Prepared and awaiting signature.
    Prepared,
    /// Signed; no further transitions.
    #[serde(rename_all = "camelCase")]
    Signed {
        /// When the signature was accepted
        signed_at: Timestamp,
    },
}

/// A contract between the business and a customer.
///
/// Serialize-only: the sole way to obtain a `Contract` is
/// [`Contract::prepare`] followed by [`Contract::sign`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    id: ContractId,
    customer_id: CustomerId,
    prepared_at: Timestamp,
    state: ContractState,
}

impl Contract {
    /// Create a freshly prepared contract.
    #[must_use]
    pub fn prepare(id: ContractId, customer_id: CustomerId, prepared_at: Timestamp) -> Self {
        Self {
            id,
            customer_id,
            prepared_at,
            state: ContractState::Prepared,
        }
    }

    /// Contract identifier.
    #[must_use]
    pub fn id(&self) -> ContractId {
        self.id
    }

    /// Owning customer.
    #[must_use]
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Preparation time.
    #[must_use]
    pub fn prepared_at(&self) -> Timestamp {
        self.prepared_at
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> ContractState {
        self.state
    }

    /// Signature time, present only once signed.
    #[must_use]
    pub fn signed_at(&self) -> Option<Timestamp> {
        match self.state {
            ContractState::Prepared => None,
            ContractState::Signed { signed_at } => Some(signed_at),
        }
    }

    /// Whether the contract reached its terminal state.
    #[must_use]
    pub fn is_signed(&self) -> bool {
        matches!(self.state, ContractState::Signed { .. })
    }

    /// Check every signing guard without mutating.
    ///
    /// Guards run in order: terminal state, signature before preparation,
    /// eligibility window.
    pub fn ensure_signable_at(&self, signed_at: Timestamp) -> Result<(), ContractError> {
        if let ContractState::Signed { signed_at: existing } = self.state {
            return Err(ContractError::AlreadySigned {
                signed_at: existing,
            });
        }

        let elapsed = signed_at - self.prepared_at;
        if elapsed < chrono::Duration::zero() {
            return Err(ContractError::SignedBeforePreparation {
                prepared_at: self.prepared_at,
                signed_at,
            });
        }
        if elapsed > eligibility_window() {
            return Err(ContractError::EligibilityExpired {
                prepared_at: self.prepared_at,
                signed_at,
            });
        }

        Ok(())
    }

    /// Sign the contract.
    ///
    /// On success the contract becomes `Signed { signed_at }` and the
    /// resulting domain event is handed back to the caller to publish. On
    /// failure the contract is left untouched.
    ///
    /// `signed_at` is not compared with the wall clock.
    pub fn sign(&mut self, signed_at: Timestamp) -> Result<ContractSignedEvent, ContractError> {
        self.ensure_signable_at(signed_at)?;

        self.state = ContractState::Signed { signed_at };
        Ok(ContractSignedEvent::new(self.id, self.customer_id, signed_at))
    }
}
