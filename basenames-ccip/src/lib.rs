//! # Basenames CCIP-Read Resolution
//!
//! Resolves `*.base.eth` names through the L1 resolver, following
//! ERC-3668 `OffchainLookup` reverts to the Basenames gateway and back
//! through `resolveWithProof`.
//!
//! ## Example
//!
//! ```rust,ignore
//! use basenames_ccip::Resolver;
//!
//! let resolver = Resolver::new("https://ethereum.publicnode.com")?;
//! let outcome = resolver.resolve("jesse").await;
//! if let Some(address) = outcome.address {
//!     println!("{}", address);
//! }
//! resolver.close();
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod abi;
mod config;
mod gateway;
mod l1;
mod resolver;
mod transport;

pub use config::ResolverConfig;
pub use gateway::{parse_gateway_body, GatewayClient, GatewayPostBody, GatewayRequest};
pub use l1::{extract_revert, L1ResolverClient, L1Response, RevertPayload, RevertSource, REVERT_SOURCES};
pub use resolver::Resolver;
pub use transport::JsonRpcTransport;
