//! View models rendered by the HTTP surface.
//!
//! Pure data: everything here is derived from flow and session state,
//! never fetched.

use alloy::primitives::{Address, TxHash};
use serde::Serialize;

/// What the withdrawal surface renders: the form, or a blocking
/// switch-network notice when connected to the wrong chain.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "view", rename_all = "snake_case")]
pub enum WithdrawView {
    Form(WithdrawForm),
    SwitchNetwork(NetworkNotice),
}

/// The withdrawal form.
#[derive(Debug, Clone, Serialize)]
pub struct WithdrawForm {
    /// Display symbol of the single supported token.
    pub token_symbol: String,
    /// Token contract address.
    pub token_contract: Address,
    /// Fixed destination wallet.
    pub destination: Address,
    /// Auto-filled withdrawal amount. Read-only: full withdrawal is
    /// the only supported amount.
    pub amount: String,
    /// Human-readable available balance.
    pub available: String,
    /// True while a submission is waiting for its receipt.
    pub processing: bool,
    /// Whether a submission would currently be accepted.
    pub can_submit: bool,
    /// The last confirmed transaction, while its display window is open.
    pub transaction: Option<TransactionView>,
    /// Last submission failure, if any.
    pub error: Option<String>,
}

/// A confirmed (or in-flight) transaction as displayed to the user.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionView {
    /// Full transaction hash.
    pub hash: TxHash,
    /// Truncated hash for display.
    pub hash_display: String,
    /// False while still waiting for the receipt.
    pub confirmed: bool,
    /// Public block-explorer link, when the chain has one.
    pub explorer_url: Option<String>,
}

/// Blocking notice shown when the wallet is on the wrong network.
#[derive(Debug, Clone, Serialize)]
pub struct NetworkNotice {
    pub current_chain_id: u64,
    pub required_chain_id: u64,
}

/// Navigation bar state for the landing page.
#[derive(Debug, Clone, Serialize)]
pub struct ShellView {
    /// Whether a user is logged in.
    pub authenticated: bool,
    /// Truncated primary-account address, when authenticated.
    pub address: Option<String>,
    /// The control the shell should offer: "login" or "logout".
    pub action: &'static str,
}

impl ShellView {
    /// Build the shell view from session-derived facts.
    pub fn new(authenticated: bool, address: Option<Address>) -> Self {
        Self {
            authenticated,
            address: address.map(|a| truncate_address(&a.to_string())),
            action: if authenticated { "logout" } else { "login" },
        }
    }
}

/// Shorten an address for the navigation bar: `0x1234...cdef`.
pub fn truncate_address(addr: &str) -> String {
    if addr.len() <= 10 {
        return addr.to_string();
    }
    format!("{}...{}", &addr[..6], &addr[addr.len() - 4..])
}

/// Shorten a transaction hash the way the confirmation card shows it.
pub fn truncate_hash(hash: &str) -> String {
    if hash.len() <= 18 {
        return hash.to_string();
    }
    format!("{}...{}", &hash[..10], &hash[hash.len() - 8..])
}
