//! Common traits for Basenames resolution.
//!
//! The ledger transport is the seam between the protocol logic and the
//! network: the resolver only ever issues read-only calls through
//! [`LedgerTransport`], so tests and alternative RPC stacks can be injected.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════════
// LEDGER TRANSPORT
// ═══════════════════════════════════════════════════════════════════════════════

/// A JSON-RPC error object as returned by an Ethereum node.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RpcErrorObject {
    /// JSON-RPC error code.
    pub code: i64,
    /// Error message.
    #[serde(default)]
    pub message: String,
    /// Node-specific payload (revert data, reason, nested objects).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
    /// Revert reason some nodes put next to `data` instead of inside it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Why a ledger call did not return data.
#[derive(Clone, Debug, PartialEq)]
pub enum CallFailure {
    /// The node executed the call and it failed; the error object is kept
    /// verbatim for revert extraction.
    Reverted(RpcErrorObject),
    /// The call never produced an execution result (connection, timeout,
    /// malformed response, protocol-level JSON-RPC error).
    Transport(String),
}

impl std::fmt::Display for CallFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallFailure::Reverted(err) => write!(f, "execution failed ({}): {}", err.code, err.message),
            CallFailure::Transport(msg) => write!(f, "transport failed: {}", msg),
        }
    }
}

/// Read-only access to the ledger.
///
/// Implementations must be safe for concurrent use; one transport is shared
/// by every in-flight resolution.
#[async_trait]
pub trait LedgerTransport: Send + Sync {
    /// Executes `eth_call` with `data` against `to` at the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, CallFailure>;
}
