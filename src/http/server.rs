//! HTTP server setup.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID)
//! - Bind the server to a listener and serve until shutdown

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::blockchain::ChainClient;
use crate::config::PortalConfig;
use crate::http::handlers;
use crate::session::ProviderClient;
use crate::withdraw::WithdrawFlow;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub flow: Arc<WithdrawFlow>,
    pub provider: Arc<ProviderClient>,
    pub chain: ChainClient,
}

/// HTTP server for the withdrawal portal.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a server over the assembled application state.
    pub fn new(config: &PortalConfig, state: AppState) -> Self {
        let router = Self::build_router(config, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &PortalConfig, state: AppState) -> Router {
        Router::new()
            .route("/", get(handlers::get_shell))
            .route(
                "/withdraw",
                get(handlers::get_withdraw).post(handlers::post_withdraw),
            )
            .route("/session/logout", post(handlers::post_logout))
            .route("/health", get(handlers::get_health))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.listener.request_timeout_secs,
            )))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
