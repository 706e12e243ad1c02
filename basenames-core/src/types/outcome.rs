//! Caller-visible resolution results.

use std::fmt;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use super::CanonicalName;
use crate::error::{FailureKind, ResolveError};

/// Stages of a single resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionState {
    /// Nothing checked yet.
    Start,
    /// Name validated and normalized.
    Validated,
    /// `resolve` issued against the L1 resolver.
    L1Called,
    /// L1 reverted with a parseable `OffchainLookup`.
    OffchainDetected,
    /// Gateway answered.
    GatewayQueried,
    /// `resolveWithProof` issued.
    ProofVerified,
    /// Terminal success (address may still be unset).
    Resolved,
    /// Terminal failure.
    Failed,
}

impl fmt::Display for ResolutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ResolutionState::Start => "START",
            ResolutionState::Validated => "VALIDATED",
            ResolutionState::L1Called => "L1_CALLED",
            ResolutionState::OffchainDetected => "OFFCHAIN_DETECTED",
            ResolutionState::GatewayQueried => "GATEWAY_QUERIED",
            ResolutionState::ProofVerified => "PROOF_VERIFIED",
            ResolutionState::Resolved => "RESOLVED",
            ResolutionState::Failed => "FAILED",
        };
        f.write_str(s)
    }
}

/// Failure description carried by a [`ResolutionOutcome`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutcomeError {
    /// Failure kind.
    pub kind: FailureKind,
    /// Human-readable description.
    pub message: String,
}

impl From<&ResolveError> for OutcomeError {
    fn from(err: &ResolveError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// Result of resolving one name.
///
/// On success `error` is `None` and `address` holds the record, or `None`
/// when the record is unset. On failure `address` is `None` and `error`
/// describes what went wrong.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionOutcome {
    /// The name as the caller passed it.
    pub name: String,
    /// The normalized name, once normalization succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalized_name: Option<CanonicalName>,
    /// The resolved address.
    pub address: Option<Address>,
    /// The failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<OutcomeError>,
}

impl ResolutionOutcome {
    /// Builds a successful outcome.
    pub fn resolved(
        name: impl Into<String>,
        normalized_name: CanonicalName,
        address: Option<Address>,
    ) -> Self {
        Self {
            name: name.into(),
            normalized_name: Some(normalized_name),
            address,
            error: None,
        }
    }

    /// Builds a failed outcome.
    pub fn failed(
        name: impl Into<String>,
        normalized_name: Option<CanonicalName>,
        error: &ResolveError,
    ) -> Self {
        Self {
            name: name.into(),
            normalized_name,
            address: None,
            error: Some(OutcomeError::from(error)),
        }
    }

    /// Returns true if resolution completed without error.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// Returns the failure kind, if resolution failed.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        self.error.as_ref().map(|e| e.kind)
    }

    /// Returns the terminal state this outcome represents.
    pub fn state(&self) -> ResolutionState {
        if self.is_success() {
            ResolutionState::Resolved
        } else {
            ResolutionState::Failed
        }
    }
}
