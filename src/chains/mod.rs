//! Static chain table.
//!
//! # Data Flow
//! ```text
//! chain id
//!     → ChainSpec (name, single RPC endpoint, explorer)
//! ```
//!
//! # Design Decisions
//! - Exactly one RPC endpoint per chain; no failover list
//! - Unknown chain ids yield None (caller error)
//! - The portal itself only ever transacts on mainnet

/// Chain id of Ethereum mainnet, the only network the withdrawal
/// flow is allowed to run on.
pub const REQUIRED_CHAIN_ID: u64 = 1;

/// Metadata for a supported chain.
#[derive(Debug, Clone, Copy)]
pub struct ChainSpec {
    /// Numeric chain id (EIP-155).
    pub id: u64,
    /// Human-readable chain name.
    pub name: &'static str,
    /// The single JSON-RPC endpoint for this chain.
    pub rpc_url: &'static str,
    /// Block-explorer transaction URL prefix, if the chain has one.
    pub explorer_tx_base: Option<&'static str>,
}

static CHAINS: &[ChainSpec] = &[
    ChainSpec {
        id: 1,
        name: "Ethereum Mainnet",
        rpc_url: "https://eth.llamarpc.com",
        explorer_tx_base: Some("https://etherscan.io/tx/"),
    },
    ChainSpec {
        id: 137,
        name: "Polygon",
        rpc_url: "https://polygon-rpc.com",
        explorer_tx_base: Some("https://polygonscan.com/tx/"),
    },
    ChainSpec {
        id: 80002,
        name: "Polygon Amoy",
        rpc_url: "https://rpc-amoy.polygon.technology",
        explorer_tx_base: None,
    },
];

/// Look up a chain by id.
pub fn chain(id: u64) -> Option<&'static ChainSpec> {
    CHAINS.iter().find(|c| c.id == id)
}

/// The RPC endpoint for a chain, if the chain is known.
pub fn rpc_url(id: u64) -> Option<&'static str> {
    chain(id).map(|c| c.rpc_url)
}

/// Public explorer link for a transaction, if the chain has an explorer.
pub fn explorer_tx_url(id: u64, tx_hash: &str) -> Option<String> {
    chain(id)
        .and_then(|c| c.explorer_tx_base)
        .map(|base| format!("{}{}", base, tx_hash))
}
