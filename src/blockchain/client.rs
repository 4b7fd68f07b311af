//! Read-only chain client.
//!
//! # Responsibilities
//! - Connect to the single configured JSON-RPC endpoint
//! - Issue contract reads (eth_call) for the token surface
//! - Poll for transaction receipts until confirmation
//! - Handle timeouts and network errors gracefully
//!
//! The client never signs or broadcasts anything; submission goes
//! through the hosted wallet provider.

use alloy::network::TransactionBuilder;
use alloy::primitives::{Address, Bytes, TxHash};
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval, timeout};

use crate::blockchain::types::{ChainError, ChainId, ChainResult};
use crate::config::ChainConfig;
use crate::observability::metrics;

/// Read-only JSON-RPC client bound to one endpoint.
#[derive(Clone)]
pub struct ChainClient {
    provider: Arc<dyn Provider + Send + Sync>,
    config: ChainConfig,
    timeout_duration: Duration,
}

impl ChainClient {
    /// Create a client for the configured chain.
    ///
    /// Fails only on an unusable endpoint URL; an unreachable endpoint
    /// degrades at call time instead.
    pub fn new(config: ChainConfig) -> ChainResult<Self> {
        let rpc_url = config.effective_rpc_url().ok_or_else(|| {
            ChainError::Config(format!(
                "no RPC endpoint for chain {}",
                config.required_chain_id
            ))
        })?;
        let url: url::Url = rpc_url
            .parse()
            .map_err(|e| ChainError::Config(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        let provider: Arc<dyn Provider + Send + Sync> =
            Arc::new(ProviderBuilder::new().connect_http(url));

        tracing::info!(
            rpc_url = %rpc_url,
            chain_id = config.required_chain_id,
            "Chain client initialized"
        );

        Ok(Self {
            provider,
            timeout_duration: Duration::from_secs(config.rpc_timeout_secs),
            config,
        })
    }

    /// Get the chain id reported by the endpoint.
    pub async fn chain_id(&self) -> ChainResult<ChainId> {
        let fut = self.provider.get_chain_id();
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(id)) => Ok(ChainId(id)),
            Ok(Err(e)) => Err(ChainError::Rpc(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Get the latest block number.
    pub async fn block_number(&self) -> ChainResult<u64> {
        let fut = self.provider.get_block_number();
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(n)) => Ok(n),
            Ok(Err(e)) => Err(ChainError::Rpc(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Execute a read-only contract call and return the raw result.
    pub async fn call(&self, to: Address, data: Bytes) -> ChainResult<Bytes> {
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        let fut = self.provider.call(tx);
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(bytes)) => Ok(bytes),
            Ok(Err(e)) => Err(ChainError::Rpc(e.to_string())),
            Err(_) => Err(ChainError::Timeout(self.config.rpc_timeout_secs)),
        }
    }

    /// Poll until a receipt for `tx_hash` is observed, or the configured
    /// receipt timeout elapses.
    ///
    /// A mined-but-reverted transaction is an error, not a confirmation.
    pub async fn wait_for_receipt(&self, tx_hash: TxHash) -> ChainResult<u64> {
        let wait = Duration::from_secs(self.config.receipt_timeout_secs);
        let poll = Duration::from_millis(self.config.receipt_poll_ms);

        let result = timeout(wait, async {
            let mut ticker = interval(poll);
            loop {
                ticker.tick().await;

                let fut = self.provider.get_transaction_receipt(tx_hash);
                let receipt = match timeout(self.timeout_duration, fut).await {
                    Ok(Ok(Some(r))) => r,
                    Ok(Ok(None)) => {
                        tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                        continue;
                    }
                    Ok(Err(e)) => {
                        tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed");
                        continue;
                    }
                    Err(_) => {
                        tracing::warn!(tx_hash = %tx_hash, "Receipt poll timed out");
                        continue;
                    }
                };

                if !receipt.status() {
                    return Err(ChainError::Reverted(format!("{}", tx_hash)));
                }
                return Ok(receipt.block_number.unwrap_or_default());
            }
        })
        .await;

        match result {
            Ok(outcome) => outcome,
            Err(_) => Err(ChainError::ReceiptTimeout(self.config.receipt_timeout_secs)),
        }
    }

    /// Check if the endpoint is reachable and healthy.
    pub async fn is_healthy(&self) -> bool {
        let healthy = self.block_number().await.is_ok();
        metrics::record_rpc_health(healthy);
        healthy
    }

    /// The chain configuration this client was built from.
    pub fn config(&self) -> &ChainConfig {
        &self.config
    }
}

impl std::fmt::Debug for ChainClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChainClient")
            .field("chain_id", &self.config.required_chain_id)
            .field("timeout_secs", &self.config.rpc_timeout_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ChainConfig {
        ChainConfig {
            required_chain_id: 1,
            rpc_url: "http://localhost:8545".to_string(),
            rpc_timeout_secs: 5,
            receipt_poll_ms: 100,
            receipt_timeout_secs: 1,
        }
    }

    #[test]
    fn test_client_creation() {
        // Creation must succeed even when the endpoint is unreachable.
        let client = ChainClient::new(test_config());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_url_rejected() {
        let config = ChainConfig {
            rpc_url: "not a url".to_string(),
            ..test_config()
        };
        let result = ChainClient::new(config);
        assert!(matches!(result, Err(ChainError::Config(_))));
    }

    #[test]
    fn test_unknown_chain_without_override_rejected() {
        let config = ChainConfig {
            required_chain_id: 31337,
            rpc_url: String::new(),
            ..test_config()
        };
        assert!(ChainClient::new(config).is_err());
    }
}
