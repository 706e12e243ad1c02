//! Name representations.
//!
//! A textual name moves through three forms during resolution:
//! [`CanonicalName`] (normalized text), [`WireName`] (DNS wire bytes handed
//! to the resolver contract) and [`NameId`] (the namehash node).

use std::fmt;

use alloy::primitives::{Bytes, B256};
use serde::{Deserialize, Serialize};

use crate::constants::NAME_ID_SIZE;

// ═══════════════════════════════════════════════════════════════════════════════
// CANONICAL NAME
// ═══════════════════════════════════════════════════════════════════════════════

/// A validated, lowercased name guaranteed to end in `base.eth`.
///
/// Only [`crate::name::normalize`] produces values of this type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CanonicalName(String);

impl CanonicalName {
    pub(crate) fn from_normalized(name: String) -> Self {
        Self(name)
    }

    /// Returns the name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Iterates the labels, leftmost (most specific) first.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.split('.')
    }

    /// Consumes the name, returning the inner string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for CanonicalName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CanonicalName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// WIRE NAME
// ═══════════════════════════════════════════════════════════════════════════════

/// DNS wire-format encoding of a name.
///
/// Each label is a length byte followed by the label bytes; the sequence
/// always ends with a zero byte.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct WireName(Vec<u8>);

impl WireName {
    pub(crate) fn from_encoded(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    /// Returns the encoded bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Consumes the wire name, returning the encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Returns the encoded bytes as lowercase `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.0))
    }
}

impl From<WireName> for Bytes {
    fn from(name: WireName) -> Self {
        Bytes::from(name.0)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// NAME ID
// ═══════════════════════════════════════════════════════════════════════════════

/// The 32-byte namehash node of a name (EIP-137).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NameId([u8; NAME_ID_SIZE]);

impl NameId {
    /// The node of the empty name.
    pub const ROOT: NameId = NameId([0u8; NAME_ID_SIZE]);

    /// Wraps a raw 32-byte node.
    pub fn from_array(bytes: [u8; NAME_ID_SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the node bytes.
    pub fn as_bytes(&self) -> &[u8; NAME_ID_SIZE] {
        &self.0
    }

    /// Returns the node as lowercase `0x`-prefixed hex.
    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }
}

impl From<NameId> for B256 {
    fn from(id: NameId) -> Self {
        B256::from(id.0)
    }
}

impl fmt::Display for NameId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
