//! Protocol constants for Basenames resolution.
//!
//! Contract addresses are published configuration: they are selected through
//! [`Network`](crate::types::Network) or overridden on `ResolverConfig`, never
//! branched on inside the resolution logic.

use alloy::primitives::{address, Address};

// ═══════════════════════════════════════════════════════════════════════════════
// NAME CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Parent name every Basename lives under.
pub const ROOT_NAME: &str = "base.eth";

/// Suffix appended to bare labels (and required on dotted names).
pub const ROOT_SUFFIX: &str = ".base.eth";

/// Maximum byte length of a single label in DNS wire format.
pub const MAX_LABEL_LENGTH: usize = 63;

/// Size of a namehash node in bytes.
pub const NAME_ID_SIZE: usize = 32;

// ═══════════════════════════════════════════════════════════════════════════════
// ETHEREUM CONSTANTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Size of Ethereum address in bytes (20 bytes = 160 bits).
pub const ETH_ADDRESS_SIZE: usize = 20;

/// Size of an ABI word.
pub const ABI_WORD_SIZE: usize = 32;

/// Size of a function or error selector.
pub const SELECTOR_SIZE: usize = 4;

// ═══════════════════════════════════════════════════════════════════════════════
// CCIP-READ (ERC-3668)
// ═══════════════════════════════════════════════════════════════════════════════

/// Selector of `OffchainLookup(address,string[],bytes,bytes4,bytes)`.
pub const OFFCHAIN_LOOKUP_SELECTOR: [u8; 4] = [0x55, 0x6f, 0x18, 0x30];

/// Placeholder substituted with the lowercase hex sender address.
pub const GATEWAY_SENDER_PLACEHOLDER: &str = "{sender}";

/// Placeholder substituted with the lowercase hex call data.
pub const GATEWAY_DATA_PLACEHOLDER: &str = "{data}";

// ═══════════════════════════════════════════════════════════════════════════════
// RESOLVER CONTRACTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Basenames L1 resolver on Ethereum mainnet.
pub const MAINNET_RESOLVER_ADDRESS: Address = address!("de9049636F4a1dfE0a64d1bFe3155C0A14C54F31");

/// Basenames L1 resolver on Sepolia.
pub const SEPOLIA_RESOLVER_ADDRESS: Address = address!("084D10C07EfEecD9fFc73DEb38ecb72f9eEb65aB");

/// Default Ethereum RPC URL when none is provided.
pub const DEFAULT_ETH_RPC_URL: &str = "https://ethereum.publicnode.com";

/// Default Sepolia RPC URL.
pub const DEFAULT_SEPOLIA_RPC_URL: &str = "https://ethereum-sepolia.publicnode.com";

// ═══════════════════════════════════════════════════════════════════════════════
// TIMEOUTS
// ═══════════════════════════════════════════════════════════════════════════════

/// Default timeout for a single ledger RPC call.
pub const DEFAULT_RPC_TIMEOUT_SECONDS: u64 = 30;

/// Default timeout for a single gateway request.
pub const DEFAULT_GATEWAY_TIMEOUT_SECONDS: u64 = 30;
