//! Basenames CLI
//!
//! Command-line interface for resolving `*.base.eth` names over CCIP-Read.

use std::time::Duration;

use alloy::primitives::Address;
use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use basenames_ccip::{Resolver, ResolverConfig};
use basenames_core::name::{encode_wire, name_id, normalize};
use basenames_core::types::{Network, ResolutionOutcome};

/// Basenames - resolve *.base.eth names through the L1 resolver
#[derive(Parser)]
#[command(name = "basenames")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Print machine-readable JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a Basename to an address
    Resolve {
        /// Name to resolve (a bare label gets .base.eth appended)
        name: String,
        /// Ethereum RPC URL
        #[arg(long, env = "ETH_RPC_URL")]
        rpc_url: Option<String>,
        /// Deployment to use (mainnet or sepolia)
        #[arg(long, default_value = "mainnet")]
        network: Network,
        /// Override the L1 resolver contract address
        #[arg(long)]
        resolver: Option<Address>,
        /// Timeout for each ledger call and gateway request, in seconds
        #[arg(long)]
        timeout: Option<u64>,
    },

    /// Print the normalized name and its namehash
    Namehash {
        /// Name to hash
        name: String,
    },

    /// Print the DNS wire encoding of a name
    Encode {
        /// Name to encode
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "basenames=debug,info"
    } else {
        "basenames=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Commands::Resolve {
            name,
            rpc_url,
            network,
            resolver,
            timeout,
        } => {
            let config = build_config(network, rpc_url, resolver, timeout);
            cmd_resolve(&name, config, cli.json).await
        }
        Commands::Namehash { name } => cmd_namehash(&name, cli.json),
        Commands::Encode { name } => cmd_encode(&name, cli.json),
    }
}

fn build_config(
    network: Network,
    rpc_url: Option<String>,
    resolver: Option<Address>,
    timeout: Option<u64>,
) -> ResolverConfig {
    let mut config = ResolverConfig::for_network(network);
    if let Some(url) = rpc_url {
        config = config.with_rpc(url);
    }
    if let Some(address) = resolver {
        config = config.with_resolver_address(address);
    }
    if let Some(seconds) = timeout {
        config = config.with_timeout(seconds);
    }
    config
}

/// Resolve a name to an address
async fn cmd_resolve(name: &str, config: ResolverConfig, json: bool) -> Result<()> {
    let resolver = Resolver::with_config(config.clone()).context("Failed to create resolver")?;

    let spinner = (!json).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Resolving {} via {}", name, config.rpc_url));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let outcome = resolver.resolve(name).await;
    resolver.close();

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    match &outcome.error {
        Some(error) => bail!("resolution failed: {}", error.kind),
        None => Ok(()),
    }
}

fn print_outcome(outcome: &ResolutionOutcome) {
    let shown = outcome
        .normalized_name
        .as_ref()
        .map(|n| n.as_str())
        .unwrap_or(&outcome.name);

    match (&outcome.address, &outcome.error) {
        (_, Some(error)) => {
            println!("{} {}", "✗ Failed to resolve:".red().bold(), shown);
            println!("   {} {}", "Kind:".dimmed(), error.kind);
            println!("   {} {}", "Error:".dimmed(), error.message);
        }
        (Some(address), None) => {
            println!("{} {}", "✓ Resolved:".green().bold(), shown);
            println!("   {} {}", "Address:".yellow(), address.to_checksum(None));
        }
        (None, None) => {
            println!("{} {}", "✓ Resolved:".green().bold(), shown);
            println!("   {}", "No address record is set.".yellow());
        }
    }
}

/// Print the namehash of a name
fn cmd_namehash(name: &str, json: bool) -> Result<()> {
    let canonical = normalize(name).context("Invalid name")?;
    let node = name_id(canonical.as_str());

    if json {
        let out = serde_json::json!({
            "name": name,
            "normalized_name": canonical,
            "namehash": node.to_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{} {}", "Name:".cyan().bold(), canonical);
        println!("{} {}", "Namehash:".cyan().bold(), node.to_hex());
    }

    Ok(())
}

/// Print the DNS wire encoding of a name
fn cmd_encode(name: &str, json: bool) -> Result<()> {
    let canonical = normalize(name).context("Invalid name")?;
    let wire = encode_wire(canonical.as_str()).context("Failed to encode name")?;

    if json {
        let out = serde_json::json!({
            "name": name,
            "normalized_name": canonical,
            "wire": wire.to_hex(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    } else {
        println!("{} {}", "Name:".cyan().bold(), canonical);
        println!("{} {}", "Wire:".cyan().bold(), wire.to_hex());
    }

    Ok(())
}
