//! CCIP-Read (ERC-3668) payload types.

use alloy::primitives::{Address, Bytes, FixedBytes};

/// A decoded `OffchainLookup(address,string[],bytes,bytes4,bytes)` revert.
///
/// Equality and hashing are structural over every byte field.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct OffchainLookupSignal {
    /// Contract that raised the lookup.
    pub sender: Address,
    /// Gateway URL templates, in the order the contract listed them.
    pub urls: Vec<String>,
    /// Call data to forward to the gateway.
    pub call_data: Bytes,
    /// Selector of the callback the contract expects.
    pub callback_function: FixedBytes<4>,
    /// Opaque data to hand back to the callback.
    pub extra_data: Bytes,
}

impl OffchainLookupSignal {
    /// Returns the first gateway URL template, the only one attempted.
    pub fn primary_url(&self) -> Option<&str> {
        self.urls.first().map(String::as_str)
    }
}

/// The `(bytes result, uint64 expires, bytes signature)` tuple a gateway signs.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct GatewaySignedResponse {
    /// ABI-encoded record value.
    pub result: Bytes,
    /// Expiry as unix seconds.
    pub expires: u64,
    /// Gateway signer's signature over the response.
    pub signature: Bytes,
}

impl GatewaySignedResponse {
    /// Returns true if the response expired before `now` (unix seconds).
    pub fn is_expired_at(&self, now: u64) -> bool {
        self.expires < now
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn signal(extra: &[u8]) -> OffchainLookupSignal {
        OffchainLookupSignal {
            sender: Address::repeat_byte(0x11),
            urls: vec!["https://gateway.test/{sender}/{data}".into()],
            call_data: Bytes::from(vec![1, 2, 3]),
            callback_function: FixedBytes::from([0xf4, 0xd4, 0xd2, 0xf8]),
            extra_data: Bytes::from(extra.to_vec()),
        }
    }

    #[test]
    fn test_signal_structural_equality() {
        let a = signal(&[9, 9]);
        let b = signal(&[9, 9]);
        let c = signal(&[9, 8]);
        assert_eq!(a, b);
        assert_ne!(a, c);

        let set: HashSet<_> = [a, b, c].into_iter().collect();
        assert_eq!(set.len(), 2);
    }

    #[test]
    fn test_primary_url() {
        let mut s = signal(&[]);
        assert_eq!(s.primary_url(), Some("https://gateway.test/{sender}/{data}"));
        s.urls.clear();
        assert_eq!(s.primary_url(), None);
    }

    #[test]
    fn test_response_expiry() {
        let response = GatewaySignedResponse {
            result: Bytes::new(),
            expires: 1_000,
            signature: Bytes::new(),
        };
        assert!(!response.is_expired_at(999));
        assert!(!response.is_expired_at(1_000));
        assert!(response.is_expired_at(1_001));
    }
}
