//! Crypto withdrawal portal.
//!
//! A user authenticates with the hosted wallet provider, sees their
//! token balance, and submits one full-balance transfer to the
//! operator's receiving wallet.
//!
//! # Architecture Overview
//!
//! ```text
//!                  ┌────────────────────────────────────────────┐
//!                  │             WITHDRAWAL PORTAL              │
//!                  │                                            │
//!   HTTP client    │  ┌──────┐   ┌──────────┐   ┌────────────┐  │
//!   ───────────────┼─▶│ http │──▶│ withdraw │──▶│  session   │──┼──▶ hosted wallet
//!                  │  └──────┘   │   flow   │   │  provider  │  │    provider API
//!                  │             └────┬─────┘   └────────────┘  │
//!                  │                  │                         │
//!                  │                  ▼                         │
//!                  │  ┌────────────────────────┐                │
//!                  │  │ blockchain (read-only) │────────────────┼──▶ JSON-RPC
//!                  │  │  erc20 reads, receipts │                │    endpoint
//!                  │  └────────────────────────┘                │
//!                  │                                            │
//!                  │  config · chains · observability           │
//!                  └────────────────────────────────────────────┘
//! ```

use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;

use alloy::primitives::Address;
use withdraw_portal::blockchain::ChainClient;
use withdraw_portal::config::loader::{self, ConfigError};
use withdraw_portal::config::validation::validate_config;
use withdraw_portal::config::PortalConfig;
use withdraw_portal::http::{AppState, HttpServer};
use withdraw_portal::observability;
use withdraw_portal::session::ProviderClient;
use withdraw_portal::withdraw::{FlowSettings, PortalGateway, WithdrawFlow};

#[derive(Debug, Parser)]
#[command(name = "withdraw-portal", about = "Crypto withdrawal portal")]
struct Args {
    /// Path to the TOML config file. Defaults plus environment
    /// overrides apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the effective configuration and exit.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    observability::logging::init();
    tracing::info!("withdraw-portal v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match &args.config {
        Some(path) => loader::load_config(path)?,
        None => {
            let mut config = PortalConfig::default();
            loader::apply_env_overrides(&mut config);
            validate_config(&config).map_err(ConfigError::Validation)?;
            config
        }
    };

    if args.print_config {
        println!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    tracing::info!(
        bind_address = %config.listener.bind_address,
        required_chain_id = config.chain.required_chain_id,
        token = %config.token.contract_address,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => observability::metrics::init_metrics(addr),
            Err(e) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %e,
                "Failed to parse metrics address"
            ),
        }
    }

    let chain = ChainClient::new(config.chain.clone())?;
    match chain.chain_id().await {
        Ok(id) if u64::from(id) != config.chain.required_chain_id => tracing::warn!(
            reported = u64::from(id),
            required = config.chain.required_chain_id,
            "RPC endpoint reports a different chain id"
        ),
        Ok(_) => tracing::info!("RPC endpoint verified"),
        Err(e) => tracing::warn!(error = %e, "Could not verify RPC endpoint"),
    }

    let provider = Arc::new(ProviderClient::new(config.provider.clone())?);
    if let Err(e) = provider.push_app_context(&config.public_base_url).await {
        tracing::warn!(error = %e, "Could not push app context to the provider");
    }

    let token: Address = config
        .token
        .contract_address
        .parse()
        .map_err(|e| format!("invalid token contract address: {}", e))?;
    let destination: Address = config
        .token
        .destination_address
        .parse()
        .map_err(|e| format!("invalid destination address: {}", e))?;

    let gateway = Arc::new(PortalGateway::new(
        Arc::clone(&provider),
        chain.clone(),
        token,
    ));
    let flow = Arc::new(WithdrawFlow::new(
        gateway,
        FlowSettings {
            symbol: config.token.symbol.clone(),
            token,
            destination,
            default_decimals: config.token.default_decimals,
            required_chain_id: config.chain.required_chain_id,
        },
    ));

    let state = AppState {
        flow,
        provider,
        chain,
    };

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = HttpServer::new(&config, state);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
