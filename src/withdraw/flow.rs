//! The withdrawal flow.
//!
//! # State
//! One flow instance per running portal, owning the UI-local state the
//! original surface kept: the auto-filled amount, the loading flag and
//! the displayed transaction hash. All of it is transient.
//!
//! # Lifecycle of one submission
//! ```text
//! gates (session, smart wallet, network)
//!     → parse amount to smallest unit (decimals, default 6)
//!     → encode transfer(destination, value)
//!     → submit via hosted smart-wallet signer
//!     → poll read-only client for the receipt
//!     → record hash, clear amount, refetch balance once
//! ```
//! Failures are structured and surfaced to the caller; nothing is
//! retried, and no failure outlives the one submission that caused it.

use alloy::primitives::{Address, TxHash, U256};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use thiserror::Error;

use crate::blockchain::types::ChainError;
use crate::blockchain::units::{self, UnitsError};
use crate::blockchain::erc20;
use crate::chains;
use crate::observability::metrics;
use crate::session::{AccountKind, SessionError};
use crate::withdraw::gateway::WithdrawGateway;
use crate::withdraw::view::{
    truncate_hash, NetworkNotice, TransactionView, WithdrawForm, WithdrawView,
};

/// How long a confirmed hash stays on screen after loading ends.
pub const HASH_DISPLAY_WINDOW: Duration = Duration::from_secs(10);

/// Errors a submission can surface.
#[derive(Debug, Error)]
pub enum WithdrawError {
    #[error("Amount is empty")]
    EmptyAmount,

    #[error("Wrong network: connected to chain {current}, required chain {required}")]
    WrongNetwork { current: u64, required: u64 },

    #[error("No wallet account linked to the session")]
    NoAccount,

    #[error("Primary account is not a smart wallet")]
    NotSmartWallet,

    #[error("A withdrawal is already in flight")]
    Busy,

    #[error(transparent)]
    Amount(#[from] UnitsError),

    #[error(transparent)]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Fixed parameters of the flow, parsed once from config.
#[derive(Debug, Clone)]
pub struct FlowSettings {
    /// Display symbol of the single supported token.
    pub symbol: String,
    /// Token contract address.
    pub token: Address,
    /// Destination wallet for every withdrawal.
    pub destination: Address,
    /// Decimals assumed until `decimals()` has been read.
    pub default_decimals: u8,
    /// The only chain the flow may run on.
    pub required_chain_id: u64,
}

#[derive(Debug, Default)]
struct FlowState {
    amount: String,
    balance: Option<U256>,
    decimals: Option<u8>,
    active_chain_id: Option<u64>,
    primary_address: Option<Address>,
    primary_is_smart: bool,
    is_loading: bool,
    tx_hash: Option<TxHash>,
    last_error: Option<String>,
    /// Bumped whenever `tx_hash` or `is_loading` changes, so a pending
    /// display-clear timer can tell it has been superseded.
    display_gen: u64,
}

/// The single interactive surface: balance, amount, submission, status.
pub struct WithdrawFlow {
    gateway: Arc<dyn WithdrawGateway>,
    settings: FlowSettings,
    state: Mutex<FlowState>,
}

impl WithdrawFlow {
    pub fn new(gateway: Arc<dyn WithdrawGateway>, settings: FlowSettings) -> Self {
        Self {
            gateway,
            settings,
            state: Mutex::new(FlowState::default()),
        }
    }

    pub fn settings(&self) -> &FlowSettings {
        &self.settings
    }

    /// Re-read session, chain id, balance and decimals.
    ///
    /// Whenever the fetched balance or decimals change, the amount is
    /// overwritten with the full human-readable balance: full
    /// withdrawal is the only supported amount. A zero balance never
    /// fills the amount, so a drained wallet cannot submit a
    /// zero-value transfer.
    pub async fn refresh(&self) -> Result<(), WithdrawError> {
        let active_chain_id = match self.gateway.active_chain_id().await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read active chain id");
                None
            }
        };

        let session = self.gateway.session().await?;
        let primary = session.primary_account().cloned();
        let owner = primary.as_ref().map(|a| a.address);
        let primary_is_smart = primary
            .as_ref()
            .map(|a| a.kind == AccountKind::SmartWallet)
            .unwrap_or(false);

        let mut fetched = None;
        if let Some(owner) = owner {
            let balance = self.gateway.token_balance(owner).await?;
            let decimals = self.gateway.token_decimals().await?;
            metrics::record_balance_read();
            fetched = Some((balance, decimals));
        }

        let mut s = self.state.lock().unwrap();
        s.active_chain_id = active_chain_id;
        s.primary_address = owner;
        s.primary_is_smart = primary_is_smart;
        if let Some((balance, decimals)) = fetched {
            let changed = s.balance != Some(balance) || s.decimals != Some(decimals);
            s.balance = Some(balance);
            s.decimals = Some(decimals);
            if changed && !balance.is_zero() {
                s.amount = units::format_units(balance, decimals);
            }
        }
        Ok(())
    }

    /// Submit the withdrawal and wait for its receipt.
    ///
    /// Refuses (without touching state) when a submission is already in
    /// flight, the session has no smart-wallet account, the wallet is
    /// on the wrong network, or the amount is empty.
    pub async fn submit(self: &Arc<Self>) -> Result<TxHash, WithdrawError> {
        let session = self.gateway.session().await?;
        let primary = session
            .primary_account()
            .cloned()
            .ok_or(WithdrawError::NoAccount)?;
        if primary.kind != AccountKind::SmartWallet {
            return Err(WithdrawError::NotSmartWallet);
        }

        if let Ok(current) = self.gateway.active_chain_id().await {
            if current != self.settings.required_chain_id {
                return Err(WithdrawError::WrongNetwork {
                    current,
                    required: self.settings.required_chain_id,
                });
            }
        }

        let (amount, decimals) = {
            let mut s = self.state.lock().unwrap();
            if s.is_loading {
                return Err(WithdrawError::Busy);
            }
            if s.amount.trim().is_empty() {
                return Err(WithdrawError::EmptyAmount);
            }
            s.is_loading = true;
            s.display_gen += 1;
            (s.amount.clone(), s.decimals)
        };

        let result = self.execute(primary.address, &amount, decimals).await;

        let display_gen = {
            let mut s = self.state.lock().unwrap();
            s.is_loading = false;
            s.display_gen += 1;
            match &result {
                Ok(hash) => {
                    s.tx_hash = Some(*hash);
                    s.amount.clear();
                    s.last_error = None;
                }
                Err(e) => {
                    s.last_error = Some(e.to_string());
                }
            }
            s.display_gen
        };

        match &result {
            Ok(_) => {
                self.schedule_hash_clear(display_gen);
                if let Err(e) = self.refresh_balance().await {
                    tracing::warn!(error = %e, "Balance refetch after withdrawal failed");
                }
            }
            Err(e) => {
                metrics::record_withdraw_failed();
                tracing::error!(error = %e, "Withdrawal failed");
            }
        }
        result
    }

    async fn execute(
        &self,
        from: Address,
        amount: &str,
        decimals: Option<u8>,
    ) -> Result<TxHash, WithdrawError> {
        let decimals = decimals.unwrap_or(self.settings.default_decimals);
        let value = units::parse_units(amount, decimals)?;
        let data = erc20::transfer_calldata(self.settings.destination, value);

        metrics::record_withdraw_submitted();
        let hash = self.gateway.send_transfer(from, data).await?;
        tracing::info!(tx_hash = %hash, amount = %amount, "Withdrawal submitted, waiting for receipt");

        let block = self.gateway.wait_for_receipt(hash).await?;
        metrics::record_withdraw_confirmed();
        tracing::info!(tx_hash = %hash, block = block, "Withdrawal confirmed");
        Ok(hash)
    }

    /// The single post-confirmation balance refetch.
    async fn refresh_balance(&self) -> Result<(), WithdrawError> {
        let owner = { self.state.lock().unwrap().primary_address };
        let Some(owner) = owner else {
            return Ok(());
        };
        let balance = self.gateway.token_balance(owner).await?;
        metrics::record_balance_read();

        let mut s = self.state.lock().unwrap();
        let decimals = s.decimals.unwrap_or(self.settings.default_decimals);
        let changed = s.balance != Some(balance);
        s.balance = Some(balance);
        if changed && !balance.is_zero() {
            s.amount = units::format_units(balance, decimals);
        }
        Ok(())
    }

    /// Clear the displayed hash once its window has elapsed, unless a
    /// newer submission has superseded it.
    fn schedule_hash_clear(self: &Arc<Self>, display_gen: u64) {
        let flow = Arc::clone(self);
        tokio::spawn(async move {
            tokio::time::sleep(HASH_DISPLAY_WINDOW).await;
            let mut s = flow.state.lock().unwrap();
            if s.display_gen == display_gen && !s.is_loading {
                s.tx_hash = None;
            }
        });
    }

    /// Render the withdrawal surface from current state.
    pub fn view(&self) -> WithdrawView {
        let s = self.state.lock().unwrap();

        if let Some(current) = s.active_chain_id {
            if current != self.settings.required_chain_id {
                return WithdrawView::SwitchNetwork(NetworkNotice {
                    current_chain_id: current,
                    required_chain_id: self.settings.required_chain_id,
                });
            }
        }

        let available = match (s.balance, s.decimals) {
            (Some(balance), Some(decimals)) => units::format_units(balance, decimals),
            _ => "0".to_string(),
        };

        let transaction = s.tx_hash.map(|hash| TransactionView {
            hash,
            hash_display: truncate_hash(&hash.to_string()),
            confirmed: !s.is_loading,
            explorer_url: chains::explorer_tx_url(
                self.settings.required_chain_id,
                &hash.to_string(),
            ),
        });

        WithdrawView::Form(WithdrawForm {
            token_symbol: self.settings.symbol.clone(),
            token_contract: self.settings.token,
            destination: self.settings.destination,
            amount: s.amount.clone(),
            available,
            processing: s.is_loading,
            can_submit: !s.is_loading
                && s.primary_address.is_some()
                && s.primary_is_smart
                && !s.amount.trim().is_empty(),
            transaction,
            error: s.last_error.clone(),
        })
    }
}

impl std::fmt::Debug for WithdrawFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WithdrawFlow")
            .field("settings", &self.settings)
            .finish()
    }
}
