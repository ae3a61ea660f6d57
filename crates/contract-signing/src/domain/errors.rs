//! # Domain Errors
//!
//! Business-rule rejections raised by the contract entity. The display
//! strings are returned to API callers verbatim.

use super::value_objects::Timestamp;
use thiserror::Error;

/// Why a contract refused to be signed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ContractError {
    /// Signature arrived after the eligibility window closed.
    #[error("Contract can not be signed because more than 30 days have passed from the contract preparation")]
    EligibilityExpired {
        /// When the contract was prepared
        prepared_at: Timestamp,
        /// The rejected signature time
        signed_at: Timestamp,
    },

    /// The contract is already signed; signing is terminal.
    #[error("Contract can not be signed because it has already been signed")]
    AlreadySigned {
        /// When the existing signature was accepted
        signed_at: Timestamp,
    },

    /// Signature time precedes the preparation time.
    #[error("Contract can not be signed before it was prepared")]
    SignedBeforePreparation {
        /// When the contract was prepared
        prepared_at: Timestamp,
        /// The rejected signature time
        signed_at: Timestamp,
    },
}

impl ContractError {
    /// True for rejections caused by the lifecycle state rather than time.
    #[must_use]
    pub fn is_invalid_state_transition(&self) -> bool {
        matches!(self, Self::AlreadySigned { .. })
    }
}
