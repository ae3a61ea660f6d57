//! Error types for the signing workflow
//!
//! Business rejections are returned as [`SignContractOutcome`] values.
//! Everything here means the system failed to finish a request the
//! business rules had accepted.
//!
//! [`SignContractOutcome`]: crate::ports::SignContractOutcome

use crate::ports::outbound::{PublishError, StoreError};
use thiserror::Error;

/// Failure of a collaborator after the domain rule passed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InfrastructureError {
    /// The contract store failed.
    #[error("Contract store failure: {0}")]
    Store(#[from] StoreError),

    /// The event publisher failed. The contract is already signed.
    #[error("Event publication failure: {0}")]
    Publish(#[from] PublishError),

    /// The persistence task did not run to completion.
    #[error("Signing task interrupted: {0}")]
    Interrupted(String),
}

impl InfrastructureError {
    /// HTTP status a transport layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        500
    }
}

/// Result type for signing operations
pub type SigningResult<T> = Result<T, InfrastructureError>;
