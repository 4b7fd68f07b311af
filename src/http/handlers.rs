//! Request handlers for the portal's JSON surface.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use uuid::Uuid;

use crate::chains;
use crate::http::server::AppState;
use crate::withdraw::{ShellView, WithdrawError};

/// Landing shell: navigation state derived from the session.
pub async fn get_shell(State(state): State<AppState>) -> impl IntoResponse {
    match state.provider.session().await {
        Ok(session) => {
            let address = session.primary_account().map(|a| a.address);
            Json(ShellView::new(session.authenticated, address)).into_response()
        }
        Err(e) => {
            tracing::error!(error = %e, "Session fetch failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// The withdrawal view: refreshes balance/decimals, then renders.
pub async fn get_withdraw(State(state): State<AppState>) -> impl IntoResponse {
    if let Err(e) = state.flow.refresh().await {
        // Render whatever state we have; the form shows a zero balance.
        tracing::warn!(error = %e, "Withdraw view refresh failed");
    }
    Json(state.flow.view())
}

/// Submit the withdrawal and wait for its receipt.
pub async fn post_withdraw(State(state): State<AppState>) -> impl IntoResponse {
    let submission_id = Uuid::new_v4();
    tracing::info!(%submission_id, "Withdrawal requested");

    match state.flow.submit().await {
        Ok(hash) => {
            let explorer_url = chains::explorer_tx_url(
                state.flow.settings().required_chain_id,
                &hash.to_string(),
            );
            (
                StatusCode::OK,
                Json(json!({
                    "tx_hash": hash,
                    "explorer_url": explorer_url,
                })),
            )
                .into_response()
        }
        Err(e) => {
            let status = match &e {
                WithdrawError::Busy => StatusCode::CONFLICT,
                WithdrawError::EmptyAmount
                | WithdrawError::Amount(_)
                | WithdrawError::WrongNetwork { .. }
                | WithdrawError::NoAccount
                | WithdrawError::NotSmartWallet => StatusCode::UNPROCESSABLE_ENTITY,
                WithdrawError::Chain(_) | WithdrawError::Session(_) => StatusCode::BAD_GATEWAY,
            };
            (status, Json(json!({ "error": e.to_string() }))).into_response()
        }
    }
}

/// Tear down the provider session.
pub async fn post_logout(State(state): State<AppState>) -> impl IntoResponse {
    match state.provider.logout().await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => {
            tracing::error!(error = %e, "Logout failed");
            (
                StatusCode::BAD_GATEWAY,
                Json(json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

/// Liveness plus RPC reachability.
pub async fn get_health(State(state): State<AppState>) -> impl IntoResponse {
    let rpc_healthy = state.chain.is_healthy().await;
    Json(json!({
        "status": "ok",
        "rpc_healthy": rpc_healthy,
    }))
}
