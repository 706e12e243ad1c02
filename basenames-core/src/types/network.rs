//! Published resolver deployments.

use std::fmt;
use std::str::FromStr;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_ETH_RPC_URL, DEFAULT_SEPOLIA_RPC_URL, MAINNET_RESOLVER_ADDRESS,
    SEPOLIA_RESOLVER_ADDRESS,
};
use crate::error::{ResolveError, Result};

/// Networks with a published Basenames L1 resolver.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Ethereum mainnet.
    #[default]
    Mainnet,
    /// Sepolia test network.
    Sepolia,
}

impl Network {
    /// Returns the resolver contract address for this network.
    pub fn resolver_address(&self) -> Address {
        match self {
            Network::Mainnet => MAINNET_RESOLVER_ADDRESS,
            Network::Sepolia => SEPOLIA_RESOLVER_ADDRESS,
        }
    }

    /// Returns the default public RPC endpoint for this network.
    pub fn default_rpc_url(&self) -> &'static str {
        match self {
            Network::Mainnet => DEFAULT_ETH_RPC_URL,
            Network::Sepolia => DEFAULT_SEPOLIA_RPC_URL,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Network::Mainnet => f.write_str("mainnet"),
            Network::Sepolia => f.write_str("sepolia"),
        }
    }
}

impl FromStr for Network {
    type Err = ResolveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" | "ethereum" => Ok(Network::Mainnet),
            "sepolia" => Ok(Network::Sepolia),
            other => Err(ResolveError::ConfigError(format!("Unknown network: {}", other))),
        }
    }
}
