//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! chain config (endpoint, timeouts)
//!     → client.rs (read-only RPC: eth_call, receipt polling)
//!     → erc20.rs (balanceOf/decimals reads, transfer calldata)
//!     → units.rs (decimal string ↔ smallest unit)
//! ```
//!
//! # Constraints
//! - Strictly read-only: no keys, no signing, no broadcasting here
//! - One endpoint per chain; a dead endpoint degrades, it never fails over
//! - All RPC calls have configurable timeouts

pub mod client;
pub mod erc20;
pub mod types;
pub mod units;

pub use client::ChainClient;
pub use erc20::Erc20Reader;
pub use types::{ChainError, ChainId};
