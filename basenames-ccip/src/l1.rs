//! Client for the Basenames resolver contract on L1.
//!
//! Issues the two read calls of CCIP-Read resolution and turns node errors
//! into revert payloads without interpreting them.

use std::sync::Arc;

use alloy::primitives::{Address, Bytes};
use serde_json::Value;
use tracing::{debug, instrument};

use basenames_core::error::{ResolveError, Result};
use basenames_core::traits::{CallFailure, LedgerTransport, RpcErrorObject};
use basenames_core::types::{OffchainLookupSignal, WireName};

use crate::abi;

// ═══════════════════════════════════════════════════════════════════════════════
// REVERT EXTRACTION
// ═══════════════════════════════════════════════════════════════════════════════

/// Revert payload of a failed ledger call.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum RevertPayload {
    /// Raw revert bytes found in the node's error object.
    Data(Bytes),
    /// No hex payload anywhere; the node's error message.
    Message(String),
}

impl RevertPayload {
    /// Short human-readable description for error messages.
    pub fn describe(&self) -> String {
        match self {
            RevertPayload::Data(data) if data.len() >= 4 => {
                format!("reverted with selector 0x{}", hex::encode(&data[..4]))
            }
            RevertPayload::Data(data) => format!("reverted with 0x{}", hex::encode(data)),
            RevertPayload::Message(msg) => format!("reverted: {}", msg),
        }
    }
}

/// Places a node may put revert bytes in its error object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevertSource {
    /// `error.data` as a hex string, or `error.data.data`.
    ErrorData,
    /// `error.data.reason` or `error.reason`: text carrying hex.
    RevertReason,
    /// `error.data.value`.
    RawValue,
}

/// Extraction order; the first source yielding bytes wins.
pub const REVERT_SOURCES: [RevertSource; 3] = [
    RevertSource::ErrorData,
    RevertSource::RevertReason,
    RevertSource::RawValue,
];

impl RevertSource {
    /// Looks for revert bytes in this source.
    pub fn extract(&self, error: &RpcErrorObject) -> Option<Bytes> {
        let data = error.data.as_ref();
        match self {
            RevertSource::ErrorData => data
                .and_then(|d| d.as_str().or_else(|| d.get("data").and_then(Value::as_str)))
                .and_then(parse_hex_exact),
            RevertSource::RevertReason => data
                .and_then(|d| d.get("reason"))
                .and_then(Value::as_str)
                .or(error.reason.as_deref())
                .and_then(find_hex_token),
            RevertSource::RawValue => data
                .and_then(|d| d.get("value"))
                .and_then(Value::as_str)
                .and_then(parse_hex_exact),
        }
    }
}

/// Extracts the revert payload from a node error object.
///
/// Tries [`REVERT_SOURCES`] in order, then hex embedded in the error
/// message; only when no hex exists anywhere is the message itself kept.
pub fn extract_revert(error: &RpcErrorObject) -> RevertPayload {
    REVERT_SOURCES
        .iter()
        .find_map(|source| source.extract(error))
        .or_else(|| find_hex_token(&error.message))
        .map(RevertPayload::Data)
        .unwrap_or_else(|| RevertPayload::Message(error.message.clone()))
}

fn parse_hex_exact(s: &str) -> Option<Bytes> {
    let digits = s.trim().strip_prefix("0x")?;
    if digits.is_empty() {
        return None;
    }
    hex::decode(digits).ok().map(Bytes::from)
}

/// Finds the first `0x`-prefixed run of at least one selector's worth of hex.
fn find_hex_token(s: &str) -> Option<Bytes> {
    s.match_indices("0x").find_map(|(start, _)| {
        let digits: &str = {
            let rest = &s[start + 2..];
            let end = rest
                .find(|c: char| !c.is_ascii_hexdigit())
                .unwrap_or(rest.len());
            &rest[..end]
        };
        if digits.len() >= 8 && digits.len() % 2 == 0 {
            hex::decode(digits).ok().map(Bytes::from)
        } else {
            None
        }
    })
}

// ═══════════════════════════════════════════════════════════════════════════════
// CLIENT
// ═══════════════════════════════════════════════════════════════════════════════

/// Outcome of the initial `resolve` call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum L1Response {
    /// The resolver answered directly; holds the inner return bytes.
    Success(Bytes),
    /// The resolver reverted.
    Revert(RevertPayload),
}

/// Client for the L1 resolver's `resolve` and `resolveWithProof`.
#[derive(Clone)]
pub struct L1ResolverClient {
    transport: Arc<dyn LedgerTransport>,
    resolver_address: Address,
}

impl L1ResolverClient {
    /// Creates a client for the resolver at `resolver_address`.
    pub fn new(transport: Arc<dyn LedgerTransport>, resolver_address: Address) -> Self {
        Self {
            transport,
            resolver_address,
        }
    }

    /// Returns the resolver contract address.
    pub fn resolver_address(&self) -> Address {
        self.resolver_address
    }

    /// Calls `resolve(wire_name, addr_call_data)`.
    ///
    /// A revert is returned as [`L1Response::Revert`] without being parsed;
    /// transport failures become [`ResolveError::NetworkError`].
    #[instrument(skip(self, wire_name, addr_call_data), fields(resolver = %self.resolver_address))]
    pub async fn resolve(&self, wire_name: &WireName, addr_call_data: &[u8]) -> Result<L1Response> {
        let call = abi::encode_resolve_call(wire_name, addr_call_data);

        match self.transport.call(self.resolver_address, call).await {
            Ok(data) => {
                debug!(len = data.len(), "resolve returned data");
                Ok(L1Response::Success(abi::unwrap_bytes_return(&data)))
            }
            Err(CallFailure::Reverted(error)) => {
                let payload = extract_revert(&error);
                debug!(revert = %payload.describe(), "resolve reverted");
                Ok(L1Response::Revert(payload))
            }
            Err(CallFailure::Transport(msg)) => Err(ResolveError::NetworkError(msg)),
        }
    }

    /// Calls `resolveWithProof(response, extra_data)`.
    ///
    /// Any failure, revert or transport, is terminal.
    #[instrument(skip(self, response, extra_data), fields(resolver = %self.resolver_address))]
    pub async fn resolve_with_proof(&self, response: &[u8], extra_data: &[u8]) -> Result<Bytes> {
        let call = abi::encode_resolve_with_proof_call(response, extra_data);

        match self.transport.call(self.resolver_address, call).await {
            Ok(data) => Ok(abi::unwrap_bytes_return(&data)),
            Err(CallFailure::Reverted(error)) => Err(ResolveError::ProofVerificationFailed(
                extract_revert(&error).describe(),
            )),
            Err(CallFailure::Transport(msg)) => Err(ResolveError::ProofVerificationFailed(msg)),
        }
    }

    /// Parses an `OffchainLookup` signal out of a revert payload.
    pub fn parse_offchain_lookup(&self, payload: &RevertPayload) -> Option<OffchainLookupSignal> {
        match payload {
            RevertPayload::Data(data) => abi::decode_offchain_lookup(data),
            RevertPayload::Message(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use alloy::primitives::FixedBytes;
    use alloy::sol_types::SolValue;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use serde_json::json;

    use basenames_core::name::encode_wire;

    use super::*;

    struct StubLedger {
        reply: std::result::Result<Bytes, CallFailure>,
        seen: Mutex<Vec<(Address, Bytes)>>,
    }

    impl StubLedger {
        fn new(reply: std::result::Result<Bytes, CallFailure>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LedgerTransport for StubLedger {
        async fn call(&self, to: Address, data: Bytes) -> std::result::Result<Bytes, CallFailure> {
            self.seen.lock().push((to, data));
            self.reply.clone()
        }
    }

    fn rpc_error(message: &str, data: Option<Value>) -> RpcErrorObject {
        RpcErrorObject {
            code: 3,
            message: message.into(),
            data,
            reason: None,
        }
    }

    fn lookup_revert() -> Bytes {
        abi::encode_offchain_lookup(&OffchainLookupSignal {
            sender: Address::repeat_byte(0x01),
            urls: vec!["https://gw.test/{sender}/{data}".into()],
            call_data: Bytes::from(vec![0xab; 8]),
            callback_function: FixedBytes::from(abi::RESOLVE_WITH_PROOF_SELECTOR),
            extra_data: Bytes::from(vec![0xcd; 8]),
        })
    }

    #[test]
    fn test_extract_prefers_error_data() {
        let error = rpc_error(
            "execution reverted: 0x11111111",
            Some(json!({ "data": "0x22222222", "reason": "0x33333333", "value": "0x44444444" })),
        );
        assert_eq!(extract_revert(&error), RevertPayload::Data(Bytes::from(vec![0x22; 4])));
    }

    #[test]
    fn test_extract_error_data_string() {
        let error = rpc_error("execution reverted", Some(json!("0x556f1830aa")));
        assert_eq!(
            extract_revert(&error),
            RevertPayload::Data(Bytes::from(vec![0x55, 0x6f, 0x18, 0x30, 0xaa]))
        );
    }

    #[test]
    fn test_extract_falls_through_to_reason_then_value() {
        let error = rpc_error(
            "execution reverted",
            Some(json!({ "reason": "custom error 0x33333333 raised", "value": "0x44444444" })),
        );
        assert_eq!(extract_revert(&error), RevertPayload::Data(Bytes::from(vec![0x33; 4])));

        let error = RpcErrorObject {
            reason: Some("reverted with 0x66666666".into()),
            ..rpc_error("execution reverted", Some(json!({ "value": "0x44444444" })))
        };
        assert_eq!(extract_revert(&error), RevertPayload::Data(Bytes::from(vec![0x66; 4])));

        let error = rpc_error("execution reverted", Some(json!({ "value": "0x44444444" })));
        assert_eq!(extract_revert(&error), RevertPayload::Data(Bytes::from(vec![0x44; 4])));
    }

    #[test]
    fn test_extract_uses_message_last() {
        let error = rpc_error("execution reverted: 0x55555555", Some(json!({ "data": "0x" })));
        assert_eq!(extract_revert(&error), RevertPayload::Data(Bytes::from(vec![0x55; 4])));

        let error = rpc_error("out of gas", None);
        assert_eq!(extract_revert(&error), RevertPayload::Message("out of gas".into()));
    }

    #[tokio::test]
    async fn test_resolve_success_unwraps_bytes_return() {
        let address = Address::repeat_byte(0x42);
        let wrapped = (Bytes::from(address.abi_encode()),).abi_encode_params();
        let ledger = StubLedger::new(Ok(Bytes::from(wrapped)));
        let resolver_address = Address::repeat_byte(0x99);
        let client = L1ResolverClient::new(ledger.clone(), resolver_address);

        let wire = encode_wire("jesse.base.eth").unwrap();
        let response = client.resolve(&wire, &[1, 2, 3, 4]).await.unwrap();
        assert_eq!(response, L1Response::Success(Bytes::from(address.abi_encode())));

        let seen = ledger.seen.lock();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, resolver_address);
        assert_eq!(&seen[0].1[..4], &abi::RESOLVE_SELECTOR);
    }

    #[tokio::test]
    async fn test_resolve_revert_is_returned_verbatim() {
        let revert = lookup_revert();
        let ledger = StubLedger::new(Err(CallFailure::Reverted(rpc_error(
            "execution reverted",
            Some(json!(format!("0x{}", hex::encode(&revert)))),
        ))));
        let client = L1ResolverClient::new(ledger, Address::repeat_byte(0x01));

        let wire = encode_wire("jesse.base.eth").unwrap();
        let response = client.resolve(&wire, &[]).await.unwrap();
        let L1Response::Revert(payload) = response else {
            panic!("expected revert");
        };
        assert_eq!(payload, RevertPayload::Data(revert));
        let signal = client.parse_offchain_lookup(&payload).unwrap();
        assert_eq!(signal.urls.len(), 1);
    }

    #[tokio::test]
    async fn test_resolve_transport_failure_is_network_error() {
        let ledger = StubLedger::new(Err(CallFailure::Transport("connection refused".into())));
        let client = L1ResolverClient::new(ledger, Address::ZERO);

        let wire = encode_wire("jesse.base.eth").unwrap();
        let err = client.resolve(&wire, &[]).await.unwrap_err();
        assert!(matches!(err, ResolveError::NetworkError(_)));
    }

    #[tokio::test]
    async fn test_resolve_with_proof_failures_are_terminal() {
        let ledger = StubLedger::new(Err(CallFailure::Reverted(rpc_error(
            "execution reverted: signature mismatch",
            None,
        ))));
        let client = L1ResolverClient::new(ledger.clone(), Address::ZERO);
        let err = client.resolve_with_proof(&[1], &[2]).await.unwrap_err();
        assert!(matches!(err, ResolveError::ProofVerificationFailed(_)));
        assert_eq!(&ledger.seen.lock()[0].1[..4], &abi::RESOLVE_WITH_PROOF_SELECTOR);

        let ledger = StubLedger::new(Err(CallFailure::Transport("timeout".into())));
        let client = L1ResolverClient::new(ledger, Address::ZERO);
        let err = client.resolve_with_proof(&[1], &[2]).await.unwrap_err();
        assert!(matches!(err, ResolveError::ProofVerificationFailed(_)));
    }

    #[test]
    fn test_parse_offchain_lookup_never_panics() {
        let client = L1ResolverClient::new(StubLedger::new(Ok(Bytes::new())), Address::ZERO);
        assert!(client.parse_offchain_lookup(&RevertPayload::Message("nope".into())).is_none());
        assert!(client
            .parse_offchain_lookup(&RevertPayload::Data(Bytes::from(vec![0x55, 0x6f])))
            .is_none());
        assert!(client
            .parse_offchain_lookup(&RevertPayload::Data(Bytes::from(vec![0x08, 0xc3, 0x79, 0xa0, 0, 0])))
            .is_none());
    }
}
