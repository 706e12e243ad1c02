//! ABI payloads for the L1 resolver and its gateway.
//!
//! Only the shapes CCIP-Read resolution needs are supported:
//!
//! | Shape | Selector |
//! |---|---|
//! | `resolve(bytes,bytes) returns (bytes)` | `0x9061b923` |
//! | `resolveWithProof(bytes,bytes) returns (bytes)` | `0xf4d4d2f8` |
//! | `addr(bytes32) returns (address)` | `0x3b3b57de` |
//! | `OffchainLookup(address,string[],bytes,bytes4,bytes)` | `0x556f1830` |
//! | gateway tuple `(bytes,uint64,bytes)` | none |

use alloy::primitives::{Address, Bytes};
use alloy::sol_types::{SolCall, SolError, SolValue};

use basenames_core::constants::{OFFCHAIN_LOOKUP_SELECTOR, SELECTOR_SIZE};
use basenames_core::types::{GatewaySignedResponse, NameId, OffchainLookupSignal, WireName};

mod contract {
    alloy::sol! {
        function resolve(bytes name, bytes data) external view returns (bytes);
        function resolveWithProof(bytes response, bytes extraData) external view returns (bytes);
        function addr(bytes32 node) external view returns (address);

        error OffchainLookup(
            address sender,
            string[] urls,
            bytes callData,
            bytes4 callbackFunction,
            bytes extraData
        );
    }
}

/// Selector of `resolve(bytes,bytes)`.
pub const RESOLVE_SELECTOR: [u8; 4] = <contract::resolveCall as SolCall>::SELECTOR;

/// Selector of `resolveWithProof(bytes,bytes)`.
pub const RESOLVE_WITH_PROOF_SELECTOR: [u8; 4] = <contract::resolveWithProofCall as SolCall>::SELECTOR;

/// Selector of `addr(bytes32)`.
pub const ADDR_SELECTOR: [u8; 4] = <contract::addrCall as SolCall>::SELECTOR;

// ═══════════════════════════════════════════════════════════════════════════════
// CALL ENCODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Encodes `resolve(wire_name, inner_call_data)`.
pub fn encode_resolve_call(wire_name: &WireName, inner_call_data: &[u8]) -> Bytes {
    contract::resolveCall {
        name: Bytes::copy_from_slice(wire_name.as_bytes()),
        data: Bytes::copy_from_slice(inner_call_data),
    }
    .abi_encode()
    .into()
}

/// Encodes `addr(node)`.
///
/// This is never sent on its own; it travels as the inner call data of
/// `resolve`.
pub fn encode_addr_call_data(node: NameId) -> Bytes {
    contract::addrCall { node: node.into() }.abi_encode().into()
}

/// Encodes `resolveWithProof(response, extra_data)`.
pub fn encode_resolve_with_proof_call(response: &[u8], extra_data: &[u8]) -> Bytes {
    contract::resolveWithProofCall {
        response: Bytes::copy_from_slice(response),
        extraData: Bytes::copy_from_slice(extra_data),
    }
    .abi_encode()
    .into()
}

// ═══════════════════════════════════════════════════════════════════════════════
// DECODING
// ═══════════════════════════════════════════════════════════════════════════════

/// Decodes an `OffchainLookup` revert.
///
/// Returns `None` when the payload is shorter than a selector, carries a
/// different selector, or does not decode as the five-field tuple.
pub fn decode_offchain_lookup(revert: &[u8]) -> Option<OffchainLookupSignal> {
    if revert.len() < SELECTOR_SIZE || revert[..SELECTOR_SIZE] != OFFCHAIN_LOOKUP_SELECTOR {
        return None;
    }

    let lookup = contract::OffchainLookup::abi_decode_raw(&revert[SELECTOR_SIZE..], false).ok()?;

    Some(OffchainLookupSignal {
        sender: lookup.sender,
        urls: lookup.urls,
        call_data: lookup.callData,
        callback_function: lookup.callbackFunction,
        extra_data: lookup.extraData,
    })
}

/// Decodes the gateway's `(bytes result, uint64 expires, bytes signature)`.
pub fn decode_gateway_tuple(data: &[u8]) -> Option<GatewaySignedResponse> {
    let (result, expires, signature) = <(Bytes, u64, Bytes)>::abi_decode_params(data, false).ok()?;

    Some(GatewaySignedResponse {
        result,
        expires,
        signature,
    })
}

/// Decodes a single ABI address word.
///
/// The zero address means "no record" and yields `None`, as does anything
/// that is not an address word.
pub fn decode_address(data: &[u8]) -> Option<Address> {
    Address::abi_decode(data, false)
        .ok()
        .filter(|address| !address.is_zero())
}

/// Strips the `returns (bytes)` wrapper from a resolver return value.
///
/// Payloads that are not a valid `bytes` encoding (a resolver answering
/// with a bare address word) are returned unchanged.
pub fn unwrap_bytes_return(data: &[u8]) -> Bytes {
    match contract::resolveCall::abi_decode_returns(data, false) {
        Ok(ret) => ret._0,
        Err(_) => Bytes::copy_from_slice(data),
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// REVERSE ENCODING (gateway and node doubles)
// ═══════════════════════════════════════════════════════════════════════════════

/// Encodes a signal as `OffchainLookup` revert data, selector included.
pub fn encode_offchain_lookup(signal: &OffchainLookupSignal) -> Bytes {
    contract::OffchainLookup {
        sender: signal.sender,
        urls: signal.urls.clone(),
        callData: signal.call_data.clone(),
        callbackFunction: signal.callback_function,
        extraData: signal.extra_data.clone(),
    }
    .abi_encode()
    .into()
}

/// Encodes a gateway response tuple.
pub fn encode_gateway_tuple(response: &GatewaySignedResponse) -> Bytes {
    (
        response.result.clone(),
        response.expires,
        response.signature.clone(),
    )
        .abi_encode_params()
        .into()
}
