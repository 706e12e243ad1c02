//! Resolver configuration.

use std::time::Duration;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use basenames_core::constants::{DEFAULT_GATEWAY_TIMEOUT_SECONDS, DEFAULT_RPC_TIMEOUT_SECONDS};
use basenames_core::types::Network;

/// Resolver configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Ethereum RPC URL
    pub rpc_url: String,
    /// L1 resolver contract address
    pub resolver_address: Address,
    /// Timeout for each ledger call, in seconds
    pub rpc_timeout_seconds: u64,
    /// Timeout for each gateway request, in seconds
    pub gateway_timeout_seconds: u64,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self::for_network(Network::Mainnet)
    }
}

impl ResolverConfig {
    /// Creates a mainnet configuration with the given RPC URL.
    pub fn new(rpc_url: impl Into<String>) -> Self {
        Self {
            rpc_url: rpc_url.into(),
            ..Default::default()
        }
    }

    /// Creates a configuration for a published deployment, using that
    /// network's public RPC endpoint.
    pub fn for_network(network: Network) -> Self {
        Self {
            rpc_url: network.default_rpc_url().into(),
            resolver_address: network.resolver_address(),
            rpc_timeout_seconds: DEFAULT_RPC_TIMEOUT_SECONDS,
            gateway_timeout_seconds: DEFAULT_GATEWAY_TIMEOUT_SECONDS,
        }
    }

    /// Overrides the RPC URL.
    pub fn with_rpc(mut self, rpc_url: impl Into<String>) -> Self {
        self.rpc_url = rpc_url.into();
        self
    }

    /// Overrides the resolver contract address.
    pub fn with_resolver_address(mut self, address: Address) -> Self {
        self.resolver_address = address;
        self
    }

    /// Sets both the ledger and gateway timeouts.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.rpc_timeout_seconds = seconds;
        self.gateway_timeout_seconds = seconds;
        self
    }

    /// Ledger call timeout.
    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_seconds)
    }

    /// Gateway request timeout.
    pub fn gateway_timeout(&self) -> Duration {
        Duration::from_secs(self.gateway_timeout_seconds)
    }
}
