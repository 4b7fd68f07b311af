//! Metrics collection and exposition.
//!
//! # Metrics
//! - `portal_withdrawals_submitted_total` (counter)
//! - `portal_withdrawals_confirmed_total` (counter)
//! - `portal_withdrawals_failed_total` (counter)
//! - `portal_balance_reads_total` (counter)
//! - `portal_rpc_healthy` (gauge): 1=healthy, 0=unhealthy
//!
//! # Design Decisions
//! - Low-overhead updates (atomic operations)
//! - Prometheus exposition on a dedicated listener

use std::net::SocketAddr;

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus exporter on its own listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_withdraw_submitted() {
    counter!("portal_withdrawals_submitted_total").increment(1);
}

pub fn record_withdraw_confirmed() {
    counter!("portal_withdrawals_confirmed_total").increment(1);
}

pub fn record_withdraw_failed() {
    counter!("portal_withdrawals_failed_total").increment(1);
}

pub fn record_balance_read() {
    counter!("portal_balance_reads_total").increment(1);
}

pub fn record_rpc_health(healthy: bool) {
    gauge!("portal_rpc_healthy").set(if healthy { 1.0 } else { 0.0 });
}
