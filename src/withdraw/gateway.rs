//! Gateway between the withdrawal flow and the outside world.
//!
//! One trait covers everything the flow reaches for: the provider
//! session, the token reads, the smart-wallet submission and the
//! receipt wait. Production wires it to [`ProviderClient`] and
//! [`ChainClient`]; tests drive the flow with a double.

use alloy::primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;
use std::sync::Arc;

use crate::blockchain::types::ChainResult;
use crate::blockchain::{ChainClient, Erc20Reader};
use crate::session::provider::SessionResult;
use crate::session::{ProviderClient, Session, SmartWalletSigner};

/// Everything the withdrawal flow consumes from outside.
#[async_trait]
pub trait WithdrawGateway: Send + Sync {
    /// Current session from the hosted provider.
    async fn session(&self) -> SessionResult<Session>;

    /// Chain id the wallet transport is currently connected to.
    async fn active_chain_id(&self) -> ChainResult<u64>;

    /// `balanceOf(owner)` on the token contract.
    async fn token_balance(&self, owner: Address) -> ChainResult<U256>;

    /// `decimals()` on the token contract.
    async fn token_decimals(&self) -> ChainResult<u8>;

    /// Submit transfer calldata to the token contract through the
    /// smart-wallet signer; returns the transaction hash.
    async fn send_transfer(&self, from: Address, data: Bytes) -> SessionResult<TxHash>;

    /// Block until a receipt for `hash` is observed.
    async fn wait_for_receipt(&self, hash: TxHash) -> ChainResult<u64>;
}

/// Production gateway: hosted provider + read-only chain client.
pub struct PortalGateway {
    provider: Arc<ProviderClient>,
    client: ChainClient,
    erc20: Erc20Reader,
    required_chain_id: u64,
}

impl PortalGateway {
    pub fn new(provider: Arc<ProviderClient>, client: ChainClient, token: Address) -> Self {
        let required_chain_id = client.config().required_chain_id;
        let erc20 = Erc20Reader::new(client.clone(), token);
        Self {
            provider,
            client,
            erc20,
            required_chain_id,
        }
    }
}

#[async_trait]
impl WithdrawGateway for PortalGateway {
    async fn session(&self) -> SessionResult<Session> {
        self.provider.session().await
    }

    async fn active_chain_id(&self) -> ChainResult<u64> {
        self.client.chain_id().await.map(u64::from)
    }

    async fn token_balance(&self, owner: Address) -> ChainResult<U256> {
        self.erc20.balance_of(owner).await
    }

    async fn token_decimals(&self) -> ChainResult<u8> {
        self.erc20.decimals().await
    }

    async fn send_transfer(&self, from: Address, data: Bytes) -> SessionResult<TxHash> {
        self.provider
            .send_transaction(from, self.erc20.token(), data, self.required_chain_id)
            .await
    }

    async fn wait_for_receipt(&self, hash: TxHash) -> ChainResult<u64> {
        self.client.wait_for_receipt(hash).await
    }
}
