//! Name validation, normalization, DNS wire encoding and namehash.
//!
//! ## Namehash
//!
//! ```text
//! namehash("")          = 0x00 * 32
//! namehash(label.rest)  = keccak256(namehash(rest) || keccak256(label))
//! ```
//!
//! Labels are folded right to left, so the top-level label is hashed first.

use sha3::{Digest, Keccak256};

use crate::constants::{MAX_LABEL_LENGTH, NAME_ID_SIZE, ROOT_NAME, ROOT_SUFFIX};
use crate::error::{ResolveError, Result};
use crate::types::{CanonicalName, NameId, WireName};

/// Returns true if `name` is non-empty and every dot-separated label is
/// 1 to 63 bytes long.
///
/// Only lengths are checked; the character set is left to the resolver.
pub fn validate(name: &str) -> bool {
    !name.is_empty()
        && name
            .split('.')
            .all(|label| (1..=MAX_LABEL_LENGTH).contains(&label.len()))
}

/// Normalizes a user-supplied name into a [`CanonicalName`].
///
/// Trims and lowercases the input, then:
/// - a bare label gets `.base.eth` appended
/// - a name already under `base.eth` is kept
/// - any other dotted name is rejected with [`ResolveError::WrongSuffix`]
pub fn normalize(name: &str) -> Result<CanonicalName> {
    let lowered = name.trim().to_lowercase();

    if !validate(&lowered) {
        return Err(ResolveError::InvalidFormat(format!(
            "'{}' must be non-empty with labels of 1 to {} bytes",
            name, MAX_LABEL_LENGTH
        )));
    }

    let canonical = if lowered.ends_with(ROOT_SUFFIX) || lowered == ROOT_NAME {
        lowered
    } else if lowered.contains('.') {
        return Err(ResolveError::WrongSuffix { name: lowered });
    } else {
        format!("{}{}", lowered, ROOT_SUFFIX)
    };

    Ok(CanonicalName::from_normalized(canonical))
}

/// Encodes a name in DNS wire format.
///
/// Empty labels (from leading, trailing or doubled dots) are skipped.
pub fn encode_wire(name: &str) -> Result<WireName> {
    let mut out = Vec::with_capacity(name.len() + 2);

    for label in name.split('.') {
        if label.is_empty() {
            continue;
        }
        if label.len() > MAX_LABEL_LENGTH {
            return Err(ResolveError::LabelTooLong {
                label: label.to_string(),
                length: label.len(),
            });
        }
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }

    out.push(0);
    Ok(WireName::from_encoded(out))
}

/// Decodes DNS wire format back into a dotted name.
///
/// Reads length-prefixed labels up to the zero terminator; bytes after the
/// terminator are ignored.
pub fn decode_wire(bytes: &[u8]) -> Result<String> {
    let mut labels = Vec::new();
    let mut pos = 0;

    loop {
        let len = *bytes.get(pos).ok_or_else(|| {
            ResolveError::InvalidFormat("wire name is missing its terminator".into())
        })? as usize;
        pos += 1;

        if len == 0 {
            break;
        }

        let label = bytes.get(pos..pos + len).ok_or_else(|| {
            ResolveError::InvalidFormat(format!(
                "wire label at offset {} overruns the buffer",
                pos - 1
            ))
        })?;
        let label = std::str::from_utf8(label).map_err(|e| {
            ResolveError::InvalidFormat(format!("wire label is not UTF-8: {}", e))
        })?;
        labels.push(label);
        pos += len;
    }

    Ok(labels.join("."))
}

/// Computes the namehash node of a name.
pub fn name_id(name: &str) -> NameId {
    let mut node = [0u8; NAME_ID_SIZE];

    for label in name.rsplit('.') {
        if label.is_empty() {
            continue;
        }

        let label_hash = Keccak256::digest(label.as_bytes());

        let mut hasher = Keccak256::new();
        hasher.update(node);
        hasher.update(label_hash);
        node = hasher.finalize().into();
    }

    NameId::from_array(node)
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use test_case::test_case;

    use super::*;

    #[test_case("jesse.base.eth" ; "full name")]
    #[test_case("jesse" ; "bare label")]
    #[test_case(&"a".repeat(63) ; "max label")]
    fn test_validate_accepts(name: &str) {
        assert!(validate(name));
    }

    #[test_case("" ; "empty")]
    #[test_case(&"a".repeat(64) ; "label too long")]
    #[test_case("a..b" ; "empty inner label")]
    #[test_case(".jesse" ; "leading dot")]
    #[test_case("jesse." ; "trailing dot")]
    fn test_validate_rejects(name: &str) {
        assert!(!validate(name));
    }

    #[test_case("jesse.base.eth", "jesse.base.eth" ; "already canonical")]
    #[test_case("JESSE.BASE.ETH", "jesse.base.eth" ; "uppercase")]
    #[test_case("jesse", "jesse.base.eth" ; "suffix appended")]
    #[test_case("  Jesse  ", "jesse.base.eth" ; "trimmed")]
    #[test_case("sub.jesse.base.eth", "sub.jesse.base.eth" ; "subname")]
    fn test_normalize(input: &str, expected: &str) {
        assert_eq!(normalize(input).unwrap().as_str(), expected);
    }

    #[test]
    fn test_normalize_rejects_foreign_suffix() {
        assert!(matches!(
            normalize("vitalik.eth"),
            Err(ResolveError::WrongSuffix { .. })
        ));
        assert!(matches!(
            normalize("jesse.base.sol"),
            Err(ResolveError::WrongSuffix { .. })
        ));
    }

    #[test]
    fn test_normalize_validates_before_suffix() {
        assert!(matches!(normalize(""), Err(ResolveError::InvalidFormat(_))));
        assert!(matches!(normalize("   "), Err(ResolveError::InvalidFormat(_))));
        assert!(matches!(normalize("a..eth"), Err(ResolveError::InvalidFormat(_))));
    }

    #[test]
    fn test_encode_wire() {
        let wire = encode_wire("jesse.base.eth").unwrap();
        let mut expected = vec![5u8];
        expected.extend_from_slice(b"jesse");
        expected.push(4);
        expected.extend_from_slice(b"base");
        expected.push(3);
        expected.extend_from_slice(b"eth");
        expected.push(0);
        assert_eq!(wire.as_bytes(), expected.as_slice());
    }

    #[test]
    fn test_encode_wire_skips_empty_labels() {
        assert_eq!(encode_wire("a..b").unwrap().as_bytes(), &[1, b'a', 1, b'b', 0]);
        assert_eq!(encode_wire("").unwrap().as_bytes(), &[0]);
    }

    #[test]
    fn test_encode_wire_label_too_long() {
        let name = format!("{}.base.eth", "x".repeat(64));
        assert!(matches!(
            encode_wire(&name),
            Err(ResolveError::LabelTooLong { length: 64, .. })
        ));
    }

    #[test]
    fn test_decode_wire_errors() {
        assert!(decode_wire(&[]).is_err());
        assert!(decode_wire(&[3, b'e', b't']).is_err());
        assert!(decode_wire(&[3, b'e', b't', b'h']).is_err());
        assert_eq!(decode_wire(&[0]).unwrap(), "");
    }

    #[test]
    fn test_name_id_root() {
        assert_eq!(name_id(""), NameId::ROOT);
    }

    #[test]
    fn test_name_id_known_values() {
        assert_eq!(
            name_id("eth").to_hex(),
            "0x93cdeb708b7545dc668eb9280176169d1c33cfd8ed6f04690a0bcc88a93fc4ae"
        );
        assert_eq!(
            name_id("foo.eth").to_hex(),
            "0xde9b09fd7c5f901e23a3f19fecc54828e9c848539801e86591bd9801b019f84f"
        );
    }

    #[test]
    fn test_name_id_order_sensitive() {
        assert_ne!(name_id("a.b"), name_id("b.a"));
    }

    proptest! {
        #[test]
        fn prop_wire_round_trip(labels in prop::collection::vec("[a-z0-9-]{1,20}", 1..4)) {
            let canonical = normalize(&format!("{}.base.eth", labels.join("."))).unwrap();
            let wire = encode_wire(canonical.as_str()).unwrap();
            prop_assert_eq!(decode_wire(wire.as_bytes()).unwrap(), canonical.as_str());
        }
    }
}
