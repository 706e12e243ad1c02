//! JSON-RPC ledger transport.
//!
//! Issues `eth_call` requests to an Ethereum node over HTTP and classifies
//! node errors into execution failures (reverts) and transport failures.
//!
//! An error object counts as an execution failure when its code is `3`,
//! when it carries hex revert data, or when its message mentions a revert.
//! Everything else (rate limits, auth failures, internal node errors,
//! protocol errors) is a transport failure.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, instrument};

use basenames_core::error::{ResolveError, Result};
use basenames_core::traits::{CallFailure, LedgerTransport, RpcErrorObject};

use crate::l1::REVERT_SOURCES;

/// Code geth and most clients use for a reverted `eth_call`.
const EXECUTION_REVERTED_CODE: i64 = 3;

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    #[serde(default)]
    result: Option<String>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
}

/// [`LedgerTransport`] over JSON-RPC 2.0 HTTP.
pub struct JsonRpcTransport {
    rpc_url: String,
    http_client: reqwest::Client,
    next_id: AtomicU64,
}

impl JsonRpcTransport {
    /// Creates a transport whose requests time out after `timeout`.
    pub fn new(rpc_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ResolveError::ConfigError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self::with_client(rpc_url, http_client))
    }

    /// Creates a transport on an existing HTTP client.
    pub fn with_client(rpc_url: impl Into<String>, http_client: reqwest::Client) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            http_client,
            next_id: AtomicU64::new(1),
        }
    }

    /// Returns the RPC endpoint.
    pub fn rpc_url(&self) -> &str {
        &self.rpc_url
    }
}

#[async_trait]
impl LedgerTransport for JsonRpcTransport {
    #[instrument(skip(self, data), fields(rpc_url = %self.rpc_url, data_len = data.len()))]
    async fn call(&self, to: Address, data: Bytes) -> std::result::Result<Bytes, CallFailure> {
        let request = serde_json::json!({
            "jsonrpc": "2.0",
            "method": "eth_call",
            "params": [
                {
                    "to": to.to_string(),
                    "data": format!("0x{}", hex::encode(&data))
                },
                "latest"
            ],
            "id": self.next_id.fetch_add(1, Ordering::Relaxed)
        });

        let response = self
            .http_client
            .post(&self.rpc_url)
            .json(&request)
            .send()
            .await
            .map_err(|e| CallFailure::Transport(describe_reqwest_error(&e)))?;

        // Some nodes answer reverts with a non-2xx status and a JSON-RPC
        // error body, so the body is parsed regardless of status.
        let status = response.status();
        let body: JsonRpcResponse = response.json().await.map_err(|e| {
            CallFailure::Transport(format!("HTTP {}: unreadable JSON-RPC response: {}", status, e))
        })?;

        if let Some(error) = body.error {
            if !is_execution_failure(&error) {
                debug!(code = error.code, message = %error.message, %status, "JSON-RPC node error");
                return Err(CallFailure::Transport(format!(
                    "HTTP {}: JSON-RPC error {}: {}",
                    status, error.code, error.message
                )));
            }
            debug!(code = error.code, message = %error.message, "eth_call execution failed");
            return Err(CallFailure::Reverted(error));
        }

        let result = body
            .result
            .ok_or_else(|| CallFailure::Transport("JSON-RPC response has neither result nor error".into()))?;

        let hex_data = result.strip_prefix("0x").unwrap_or(&result);
        hex::decode(hex_data)
            .map(Bytes::from)
            .map_err(|e| CallFailure::Transport(format!("eth_call result is not hex: {}", e)))
    }
}

fn is_execution_failure(error: &RpcErrorObject) -> bool {
    error.code == EXECUTION_REVERTED_CODE
        || REVERT_SOURCES.iter().any(|source| source.extract(error).is_some())
        || error.message.to_ascii_lowercase().contains("revert")
}

fn describe_reqwest_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out: {}", err)
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        err.to_string()
    }
}
