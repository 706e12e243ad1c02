//! Error types for Basenames resolution.
//!
//! Every variant maps onto exactly one [`FailureKind`], the stable,
//! serializable taxonomy reported to callers in a `ResolutionOutcome`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using `ResolveError`.
pub type Result<T> = std::result::Result<T, ResolveError>;

/// Terminal failure kinds of a resolution.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Name is empty or has a label outside 1..=63 bytes.
    InvalidFormat,
    /// Name is dotted but not under `base.eth`.
    WrongSuffix,
    /// Ledger transport failed or timed out.
    NetworkError,
    /// Ledger reverted with something other than `OffchainLookup`.
    UnsupportedResolution,
    /// `OffchainLookup` carried no gateway URLs.
    NoGatewayUrls,
    /// Gateway transport failed or answered with a non-2xx status.
    GatewayError,
    /// Gateway answered 2xx with an unusable body.
    GatewayResponseMalformed,
    /// `resolveWithProof` failed on the ledger.
    ProofVerificationFailed,
}

impl std::fmt::Display for FailureKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            FailureKind::InvalidFormat => "InvalidFormat",
            FailureKind::WrongSuffix => "WrongSuffix",
            FailureKind::NetworkError => "NetworkError",
            FailureKind::UnsupportedResolution => "UnsupportedResolution",
            FailureKind::NoGatewayUrls => "NoGatewayUrls",
            FailureKind::GatewayError => "GatewayError",
            FailureKind::GatewayResponseMalformed => "GatewayResponseMalformed",
            FailureKind::ProofVerificationFailed => "ProofVerificationFailed",
        };
        f.write_str(s)
    }
}

/// Main error type for all resolution steps.
#[derive(Debug, Error)]
pub enum ResolveError {
    // ═══════════════════════════════════════════════════════════════════════════
    // NAME ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Name failed structural validation.
    #[error("Invalid name format: {0}")]
    InvalidFormat(String),

    /// A label does not fit in a single length byte.
    #[error("Label '{label}' is {length} bytes, maximum is 63")]
    LabelTooLong {
        /// The offending label.
        label: String,
        /// Its length in bytes.
        length: usize,
    },

    /// Name ends in a suffix other than the Basenames root.
    #[error("Name '{name}' is not a .base.eth name")]
    WrongSuffix {
        /// The normalized name that was rejected.
        name: String,
    },

    // ═══════════════════════════════════════════════════════════════════════════
    // LEDGER ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Ledger RPC transport failed.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// The resolver reverted without a usable offchain-lookup signal.
    #[error("Unsupported resolution: {0}")]
    UnsupportedResolution(String),

    /// `resolveWithProof` was rejected by the resolver.
    #[error("Proof verification failed: {0}")]
    ProofVerificationFailed(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // GATEWAY ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Offchain-lookup signal listed no gateway URLs.
    #[error("Offchain lookup returned no gateway URLs")]
    NoGatewayUrls,

    /// Gateway request failed.
    #[error("Gateway error{}: {message}", http_status_suffix(.status))]
    GatewayError {
        /// HTTP status, when the gateway answered at all.
        status: Option<u16>,
        /// Gateway-provided message or transport error.
        message: String,
    },

    /// Gateway body could not be turned into response bytes.
    #[error("Malformed gateway response: {0}")]
    GatewayResponseMalformed(String),

    // ═══════════════════════════════════════════════════════════════════════════
    // CONFIGURATION ERRORS
    // ═══════════════════════════════════════════════════════════════════════════

    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

fn http_status_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

impl ResolveError {
    /// Returns the caller-visible failure kind of this error.
    pub fn kind(&self) -> FailureKind {
        match self {
            ResolveError::InvalidFormat(_) | ResolveError::LabelTooLong { .. } => {
                FailureKind::InvalidFormat
            }
            ResolveError::WrongSuffix { .. } => FailureKind::WrongSuffix,
            ResolveError::NetworkError(_) | ResolveError::ConfigError(_) => {
                FailureKind::NetworkError
            }
            ResolveError::UnsupportedResolution(_) => FailureKind::UnsupportedResolution,
            ResolveError::ProofVerificationFailed(_) => FailureKind::ProofVerificationFailed,
            ResolveError::NoGatewayUrls => FailureKind::NoGatewayUrls,
            ResolveError::GatewayError { .. } => FailureKind::GatewayError,
            ResolveError::GatewayResponseMalformed(_) => FailureKind::GatewayResponseMalformed,
        }
    }

    /// Returns true if the caller may reasonably retry later.
    ///
    /// Nothing is retried internally; this only classifies.
    pub fn is_transient(&self) -> bool {
        match self {
            ResolveError::NetworkError(_) => true,
            ResolveError::GatewayError { status, .. } => {
                status.map_or(true, |s| s >= 500 || s == 429)
            }
            _ => false,
        }
    }
}
