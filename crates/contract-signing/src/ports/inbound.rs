//! # Inbound Ports
//!
//! API trait defining what the signing subsystem can do, plus the request
//! and outcome shapes a transport layer maps to and from.

use crate::domain::{ContractError, ContractId, Timestamp};
use crate::error::SigningResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Request to sign a contract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignContractCommand {
    /// Contract to sign.
    pub contract_id: ContractId,
    /// Caller-supplied signature time.
    pub signed_at: Timestamp,
}

/// Expected outcomes of a signing request.
///
/// Infrastructure failures are not outcomes; they are the `Err` side of
/// [`SigningResult`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignContractOutcome {
    /// Contract signed, persisted and announced.
    Signed,
    /// No contract with the requested id.
    NotFound,
    /// A business rule rejected the signature.
    Conflict(ContractError),
}

impl SignContractOutcome {
    /// HTTP status a transport layer should answer with.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Signed => 204,
            Self::NotFound => 404,
            Self::Conflict(_) => 409,
        }
    }

    /// Response body for rejected requests, if any.
    #[must_use]
    pub fn error_response(&self) -> Option<ErrorResponse> {
        match self {
            Self::Conflict(reason) => Some(ErrorResponse::new(self.status_code(), reason)),
            Self::Signed | Self::NotFound => None,
        }
    }
}

/// Error body returned alongside a non-success status.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    /// Repeats the HTTP status.
    pub status_code: u16,
    /// Human-readable reason.
    pub message: String,
}

impl ErrorResponse {
    /// Build a body from a status and any displayable reason.
    pub fn new(status_code: u16, reason: &impl std::fmt::Display) -> Self {
        Self {
            status_code,
            message: reason.to_string(),
        }
    }
}

/// Contract signing API - inbound port.
#[async_trait]
pub trait ContractSigningApi: Send + Sync {
    /// Sign a contract: look it up, apply the transition, persist it, then
    /// publish the signed event.
    async fn sign_contract(&self, command: SignContractCommand) -> SigningResult<SignContractOutcome>;
}
