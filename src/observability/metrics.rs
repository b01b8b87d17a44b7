//! Metrics collection and exposition.
//!
//! # Metrics
//! - `airdrop_requests_total` (counter): claims by outcome
//! - `airdrop_request_duration_seconds` (histogram): claim latency
//! - `airdrop_tokens_dispensed_total` (counter): whole tokens sent
//! - `airdrop_rpc_calls_total` (counter): RPC calls by operation, status
//! - `airdrop_rpc_duration_seconds` (histogram): RPC latency by operation
//! - `airdrop_rpc_health` (gauge): 1=reachable, 0=unreachable
//!
//! Without an installed recorder every call is a no-op.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

/// Install the Prometheus recorder and its scrape listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished claim.
pub fn record_claim(outcome: &'static str, start: Instant) {
    counter!("airdrop_requests_total", "outcome" => outcome).increment(1);
    histogram!("airdrop_request_duration_seconds", "outcome" => outcome)
        .record(start.elapsed().as_secs_f64());
}

/// Record tokens that left the sender wallet.
pub fn record_dispensed(amount: u64) {
    counter!("airdrop_tokens_dispensed_total").increment(amount);
}

/// Record one RPC round-trip.
pub fn record_rpc_call(operation: &'static str, status: &'static str, start: Instant) {
    counter!("airdrop_rpc_calls_total", "operation" => operation, "status" => status).increment(1);
    histogram!("airdrop_rpc_duration_seconds", "operation" => operation)
        .record(start.elapsed().as_secs_f64());
}

/// Record RPC reachability.
pub fn record_rpc_health(healthy: bool) {
    gauge!("airdrop_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}
