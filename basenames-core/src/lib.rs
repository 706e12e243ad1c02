//! # Basenames Core
//!
//! Core types, errors, name codec and traits for resolving `*.base.eth`
//! names through CCIP-Read (ERC-3668).
//!
//! - **Types**: name forms, offchain-lookup payloads, resolution outcomes
//! - **Name**: validation, normalization, DNS wire encoding, namehash
//! - **Errors**: the failure taxonomy reported to callers
//! - **Constants**: selectors, published resolver addresses, defaults
//! - **Traits**: the injectable ledger transport
//!
//! ## Example
//!
//! ```rust
//! use basenames_core::name::{encode_wire, name_id, normalize};
//!
//! let name = normalize("Jesse").unwrap();
//! assert_eq!(name.as_str(), "jesse.base.eth");
//!
//! let wire = encode_wire(name.as_str()).unwrap();
//! let node = name_id(name.as_str());
//! assert_eq!(wire.as_bytes().last(), Some(&0));
//! assert_eq!(node.as_bytes().len(), 32);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod name;
pub mod traits;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{FailureKind, ResolveError, Result};
pub use traits::*;
pub use types::*;
