//! End-to-end Basenames resolution.
//!
//! Drives one name through the CCIP-Read state machine:
//!
//! ```text
//! START → VALIDATED → L1_CALLED ─┬─→ RESOLVED
//!                                └─→ OFFCHAIN_DETECTED → GATEWAY_QUERIED → PROOF_VERIFIED → RESOLVED
//! ```
//!
//! Any state may end in FAILED. Every step runs once; nothing is retried.

use std::sync::Arc;

use alloy::primitives::Address;
use parking_lot::RwLock;
use tokio::sync::watch;
use tracing::{debug, info, instrument, warn};

use basenames_core::error::{ResolveError, Result};
use basenames_core::name::{encode_wire, name_id, normalize};
use basenames_core::traits::LedgerTransport;
use basenames_core::types::{CanonicalName, ResolutionOutcome, ResolutionState};

use crate::abi;
use crate::config::ResolverConfig;
use crate::gateway::GatewayClient;
use crate::l1::{L1ResolverClient, L1Response};
use crate::transport::JsonRpcTransport;

struct Backends {
    l1: L1ResolverClient,
    gateway: GatewayClient,
}

/// Basenames resolver.
///
/// Resolves `*.base.eth` names to addresses by:
/// 1. Normalizing the name and computing its wire encoding and namehash
/// 2. Calling `resolve` on the L1 resolver
/// 3. On an `OffchainLookup` revert, querying the first gateway URL
/// 4. Handing the gateway's signed answer to `resolveWithProof`
/// 5. Decoding the returned address
///
/// A `Resolver` is shared freely between tasks; [`Resolver::close`]
/// releases its transports and stops in-flight resolutions.
pub struct Resolver {
    config: ResolverConfig,
    backends: RwLock<Option<Arc<Backends>>>,
    closed: watch::Sender<bool>,
}

impl Resolver {
    /// Creates a resolver for the mainnet resolver contract using the given
    /// RPC URL.
    pub fn new(rpc_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ResolverConfig::new(rpc_url))
    }

    /// Creates a resolver for the contract at `resolver_address` with
    /// default timeouts.
    pub fn with_resolver_address(rpc_url: impl Into<String>, resolver_address: Address) -> Result<Self> {
        Self::with_config(ResolverConfig::new(rpc_url).with_resolver_address(resolver_address))
    }

    /// Creates a resolver with custom configuration and the JSON-RPC
    /// transport.
    pub fn with_config(config: ResolverConfig) -> Result<Self> {
        let transport = JsonRpcTransport::new(config.rpc_url.clone(), config.rpc_timeout())?;
        Self::with_transport(config, Arc::new(transport))
    }

    /// Creates a resolver on an injected ledger transport.
    pub fn with_transport(config: ResolverConfig, transport: Arc<dyn LedgerTransport>) -> Result<Self> {
        let gateway = GatewayClient::new(config.gateway_timeout())?;
        Ok(Self::with_parts(config, transport, gateway))
    }

    /// Creates a resolver from fully built parts.
    pub fn with_parts(
        config: ResolverConfig,
        transport: Arc<dyn LedgerTransport>,
        gateway: GatewayClient,
    ) -> Self {
        let backends = Backends {
            l1: L1ResolverClient::new(transport, config.resolver_address),
            gateway,
        };
        let (closed, _) = watch::channel(false);

        Self {
            config,
            backends: RwLock::new(Some(Arc::new(backends))),
            closed,
        }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Resolves a name to an address.
    ///
    /// Never fails: every failure is reported in the outcome. An unset
    /// record resolves successfully with no address.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let resolver = Resolver::new("https://eth-mainnet.g.alchemy.com/v2/KEY")?;
    /// let outcome = resolver.resolve("jesse.base.eth").await;
    /// println!("{:?}", outcome.address);
    /// ```
    #[instrument(skip(self))]
    pub async fn resolve(&self, name: &str) -> ResolutionOutcome {
        enter(name, ResolutionState::Start);

        let canonical = match normalize(name) {
            Ok(canonical) => canonical,
            Err(err) => return fail(name, None, err),
        };
        enter(canonical.as_str(), ResolutionState::Validated);

        let backends = self.backends.read().clone();
        let Some(backends) = backends else {
            let err = ResolveError::NetworkError("resolver is closed".into());
            return fail(name, Some(canonical), err);
        };

        let mut closed = self.closed.subscribe();
        let result = tokio::select! {
            result = Self::run(&backends, &canonical) => result,
            _ = closed.wait_for(|closed| *closed) => {
                Err(ResolveError::NetworkError("resolver was closed during resolution".into()))
            }
        };

        match result {
            Ok(address) => {
                enter(canonical.as_str(), ResolutionState::Resolved);
                match address {
                    Some(address) => info!(name = %canonical, %address, "Resolved name"),
                    None => info!(name = %canonical, "Name has no address record"),
                }
                ResolutionOutcome::resolved(name, canonical, address)
            }
            Err(err) => fail(name, Some(canonical), err),
        }
    }

    /// Releases the transports and stops in-flight resolutions.
    ///
    /// Later calls to [`Resolver::resolve`] fail immediately with a
    /// `NetworkError`.
    pub fn close(&self) {
        if self.backends.write().take().is_some() {
            debug!("Closing resolver");
        }
        self.closed.send_replace(true);
    }

    /// Returns true once [`Resolver::close`] has been called.
    pub fn is_closed(&self) -> bool {
        *self.closed.borrow()
    }

    async fn run(backends: &Backends, name: &CanonicalName) -> Result<Option<Address>> {
        let wire = encode_wire(name.as_str())?;
        let node = name_id(name.as_str());
        let addr_call = abi::encode_addr_call_data(node);

        enter(name.as_str(), ResolutionState::L1Called);
        let revert = match backends.l1.resolve(&wire, &addr_call).await? {
            L1Response::Success(data) => return Ok(abi::decode_address(&data)),
            L1Response::Revert(payload) => payload,
        };

        let signal = backends
            .l1
            .parse_offchain_lookup(&revert)
            .ok_or_else(|| ResolveError::UnsupportedResolution(revert.describe()))?;
        enter(name.as_str(), ResolutionState::OffchainDetected);

        if signal.sender != backends.l1.resolver_address() {
            warn!(
                sender = %signal.sender,
                resolver = %backends.l1.resolver_address(),
                "OffchainLookup sender differs from the resolver"
            );
        }

        let url = signal.primary_url().ok_or(ResolveError::NoGatewayUrls)?;
        if signal.urls.len() > 1 {
            debug!(skipped = signal.urls.len() - 1, "Only the first gateway URL is attempted");
        }

        let response = backends
            .gateway
            .query(url, signal.sender, &signal.call_data)
            .await?;

        let signed = abi::decode_gateway_tuple(&response).ok_or_else(|| {
            ResolveError::GatewayResponseMalformed(
                "response is not a (bytes, uint64, bytes) tuple".into(),
            )
        })?;
        let now = chrono::Utc::now().timestamp().max(0) as u64;
        if signed.is_expired_at(now) {
            warn!(expires = signed.expires, now, "Gateway response already expired");
        } else {
            debug!(expires = signed.expires, "Gateway response signed");
        }
        enter(name.as_str(), ResolutionState::GatewayQueried);

        enter(name.as_str(), ResolutionState::ProofVerified);
        let result = backends
            .l1
            .resolve_with_proof(&response, &signal.extra_data)
            .await?;

        Ok(abi::decode_address(&result))
    }
}

fn enter(name: &str, state: ResolutionState) {
    debug!(name, %state, "Resolution state");
}

fn fail(name: &str, canonical: Option<CanonicalName>, err: ResolveError) -> ResolutionOutcome {
    debug!(name, state = %ResolutionState::Failed, kind = %err.kind(), error = %err, "Resolution failed");
    ResolutionOutcome::failed(name, canonical, &err)
}
