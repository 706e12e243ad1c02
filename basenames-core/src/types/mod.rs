//! Domain types for Basenames resolution.
//!
//! - [`CanonicalName`], [`WireName`], [`NameId`]: the three forms of a name
//! - [`OffchainLookupSignal`]: a parsed `OffchainLookup` revert
//! - [`GatewaySignedResponse`]: the gateway's signed answer
//! - [`ResolutionOutcome`]: what a caller gets back from `resolve`
//! - [`Network`]: published resolver deployments

mod lookup;
mod name;
mod network;
mod outcome;

pub use lookup::*;
pub use name::*;
pub use network::*;
pub use outcome::*;
