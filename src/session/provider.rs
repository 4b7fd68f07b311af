//! Hosted wallet/auth provider client.
//!
//! # Responsibilities
//! - Fetch the current session (readiness, auth flag, linked accounts)
//! - Log the session out
//! - Submit transactions through the provider's smart-wallet signer
//!
//! The provider API surface is a fixed external contract; this client
//! does not retry, and every call carries the configured app and
//! client ids. Login-method, connector and appearance settings are
//! forwarded as session-context metadata.

use alloy::primitives::{Address, Bytes, TxHash};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::ProviderConfig;
use crate::session::types::Session;

/// Errors from talking to the hosted provider.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No provider base URL configured.
    #[error("Wallet provider not configured")]
    NotConfigured,

    /// Transport-level failure.
    #[error("Provider request failed: {0}")]
    Http(String),

    /// The provider answered with a non-success status.
    #[error("Provider rejected the request ({status}): {message}")]
    Api { status: u16, message: String },

    /// The provider answered with a body we could not parse.
    #[error("Bad provider response: {0}")]
    InvalidResponse(String),

    /// No authenticated user behind the session.
    #[error("Not authenticated")]
    Unauthenticated,
}

/// Result type for provider operations.
pub type SessionResult<T> = Result<T, SessionError>;

/// Signer seam over the provider's smart-wallet transaction submission.
///
/// The withdrawal flow depends on this trait instead of the concrete
/// client so submissions can be driven by a test double.
#[async_trait]
pub trait SmartWalletSigner: Send + Sync {
    /// Submit `data` to `to` on `chain_id` through the smart wallet at
    /// `from`. Returns the provider-reported transaction hash.
    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
        chain_id: u64,
    ) -> SessionResult<TxHash>;
}

/// Client for the hosted provider's REST API.
#[derive(Debug, Clone)]
pub struct ProviderClient {
    http: reqwest::Client,
    config: ProviderConfig,
}

#[derive(Debug, Serialize)]
struct SendTransactionBody<'a> {
    chain_id: u64,
    to: Address,
    data: &'a Bytes,
}

#[derive(Debug, Deserialize)]
struct SendTransactionResponse {
    hash: TxHash,
}

impl ProviderClient {
    /// Create a client from the provider configuration.
    ///
    /// There is exactly one client per running portal; it is created at
    /// startup and dropped at shutdown.
    pub fn new(config: ProviderConfig) -> SessionResult<Self> {
        if config.base_url.is_empty() {
            return Err(SessionError::NotConfigured);
        }
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| SessionError::Http(e.to_string()))?;

        tracing::info!(
            base_url = %config.base_url,
            app_id = %config.app_id,
            login_methods = ?config.login_methods,
            "Provider client initialized"
        );

        Ok(Self { http, config })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    fn with_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        req.header("x-app-id", &self.config.app_id)
            .header("x-client-id", &self.config.client_id)
    }

    /// Push the application's session context (login methods, wallet
    /// connectors, appearance) to the provider.
    ///
    /// Called once at startup; the provider applies it to every hosted
    /// login surface it renders for this app.
    pub async fn push_app_context(&self, public_base_url: &str) -> SessionResult<()> {
        let body = serde_json::json!({
            "app_id": self.config.app_id,
            "app_url": public_base_url,
            "walletconnect_project_id": self.config.walletconnect_project_id,
            "login_methods": self.config.login_methods,
            "wallet_connectors": self.config.wallet_connectors,
            "appearance": self.config.appearance,
        });
        let req = self
            .with_auth(self.http.put(self.url("/v1/apps/context")))
            .json(&body);
        let resp = req.send().await.map_err(|e| SessionError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SessionError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// Fetch the current session.
    pub async fn session(&self) -> SessionResult<Session> {
        let req = self.with_auth(self.http.get(self.url("/v1/sessions/current")));
        let resp = req.send().await.map_err(|e| SessionError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SessionError::Api {
                status: status.as_u16(),
                message,
            });
        }
        resp.json::<Session>()
            .await
            .map_err(|e| SessionError::InvalidResponse(e.to_string()))
    }

    /// Tear down the current session.
    pub async fn logout(&self) -> SessionResult<()> {
        let req = self.with_auth(self.http.post(self.url("/v1/sessions/logout")));
        let resp = req.send().await.map_err(|e| SessionError::Http(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SessionError::Api {
                status: status.as_u16(),
                message,
            });
        }
        Ok(())
    }

    /// The provider configuration this client was built from.
    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

#[async_trait]
impl SmartWalletSigner for ProviderClient {
    async fn send_transaction(
        &self,
        from: Address,
        to: Address,
        data: Bytes,
        chain_id: u64,
    ) -> SessionResult<TxHash> {
        let path = format!("/v1/wallets/{}/transactions", from);
        let body = SendTransactionBody {
            chain_id,
            to,
            data: &data,
        };
        let req = self.with_auth(self.http.post(self.url(&path))).json(&body);
        let resp = req.send().await.map_err(|e| SessionError::Http(e.to_string()))?;

        let status = resp.status();
        if status.as_u16() == 401 || status.as_u16() == 403 {
            return Err(SessionError::Unauthenticated);
        }
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SessionError::Api {
                status: status.as_u16(),
                message,
            });
        }
        let parsed: SendTransactionResponse = resp
            .json()
            .await
            .map_err(|e| SessionError::InvalidResponse(e.to_string()))?;
        Ok(parsed.hash)
    }
}
