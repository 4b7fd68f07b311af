//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the portal.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

use crate::chains;

/// Root configuration for the withdrawal portal.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct PortalConfig {
    /// Public base URL the application is served under.
    pub public_base_url: String,

    /// Listener configuration (bind address, request timeout).
    pub listener: ListenerConfig,

    /// Hosted wallet/auth provider settings.
    pub provider: ProviderConfig,

    /// Chain and RPC settings.
    pub chain: ChainConfig,

    /// Token contract and destination wallet settings.
    pub token: TokenConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,

    /// Request timeout (total time for request/response) in seconds.
    ///
    /// Must cover the receipt wait, which happens inside the submit
    /// request.
    pub request_timeout_secs: u64,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
            request_timeout_secs: 180,
        }
    }
}

/// Hosted wallet/auth provider configuration.
///
/// The provider owns identity, wallet linking and transaction signing;
/// everything here is passed through to its API.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProviderConfig {
    /// Base URL of the provider API.
    pub base_url: String,

    /// Application id issued by the provider.
    pub app_id: String,

    /// Client id issued by the provider.
    pub client_id: String,

    /// WalletConnect cloud project id.
    pub walletconnect_project_id: String,

    /// Allowed login methods, in display order.
    pub login_methods: Vec<String>,

    /// Wallet connectors offered at login.
    pub wallet_connectors: Vec<String>,

    /// Appearance options forwarded to the provider's hosted UI.
    pub appearance: AppearanceConfig,

    /// Provider request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            app_id: String::new(),
            client_id: String::new(),
            walletconnect_project_id: String::new(),
            login_methods: vec![
                "email".to_string(),
                "google".to_string(),
                "twitter".to_string(),
                "discord".to_string(),
                "wallet".to_string(),
            ],
            wallet_connectors: vec![
                "metamask".to_string(),
                "wallet_connect".to_string(),
                "coinbase_wallet".to_string(),
                "detected_wallets".to_string(),
            ],
            appearance: AppearanceConfig::default(),
            request_timeout_secs: 15,
        }
    }
}

/// Appearance options for the provider's hosted login UI.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AppearanceConfig {
    /// Logo path or URL.
    pub logo: String,

    /// Accent color (hex).
    pub accent_color: String,

    /// Theme color (hex).
    pub theme: String,

    /// Whether wallet login is shown before social login.
    pub show_wallet_login_first: bool,
}

impl Default for AppearanceConfig {
    fn default() -> Self {
        Self {
            logo: "/images/logo.webp".to_string(),
            accent_color: "#F5D469".to_string(),
            theme: "#1F1F1F".to_string(),
            show_wallet_login_first: false,
        }
    }
}

/// Chain and RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainConfig {
    /// The only chain id the withdrawal flow may run on.
    pub required_chain_id: u64,

    /// JSON-RPC endpoint override. Empty means "use the static chain
    /// table entry for `required_chain_id`".
    pub rpc_url: String,

    /// RPC request timeout in seconds.
    pub rpc_timeout_secs: u64,

    /// Receipt polling interval in milliseconds.
    pub receipt_poll_ms: u64,

    /// Maximum time to wait for a receipt in seconds.
    pub receipt_timeout_secs: u64,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            required_chain_id: chains::REQUIRED_CHAIN_ID,
            rpc_url: String::new(),
            rpc_timeout_secs: 10,
            receipt_poll_ms: 2_000,
            receipt_timeout_secs: 120,
        }
    }
}

impl ChainConfig {
    /// The effective RPC endpoint: the explicit override, or the static
    /// table entry for the required chain.
    pub fn effective_rpc_url(&self) -> Option<String> {
        if !self.rpc_url.is_empty() {
            return Some(self.rpc_url.clone());
        }
        chains::rpc_url(self.required_chain_id).map(str::to_string)
    }
}

/// Token contract and destination wallet configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Display symbol of the single supported token.
    pub symbol: String,

    /// ERC-20 contract address of the token.
    pub contract_address: String,

    /// Destination wallet all withdrawals are sent to.
    pub destination_address: String,

    /// Decimals assumed when the contract read has not completed.
    pub default_decimals: u8,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            symbol: "USDT".to_string(),
            contract_address: String::new(),
            destination_address: String::new(),
            default_decimals: 6,
        }
    }
}

/// Observability settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Enable the Prometheus metrics exporter.
    pub metrics_enabled: bool,

    /// Bind address for the metrics endpoint.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
