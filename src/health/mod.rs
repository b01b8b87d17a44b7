//! Health reporting.
//!
//! `GET /health` answers 200 while the RPC node is reachable and 503 when it
//! is not, so orchestrators can hold traffic during node outages.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::http::server::AppState;

/// Body of the health endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthReport {
    pub status: String,
    pub version: String,
    pub rpc_reachable: bool,
    pub claims_enabled: bool,
}

impl HealthReport {
    pub fn new(rpc_reachable: bool, claims_enabled: bool) -> Self {
        let status = if rpc_reachable && claims_enabled { "ok" } else { "degraded" };
        Self {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            rpc_reachable,
            claims_enabled,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        if self.status == "ok" {
            StatusCode::OK
        } else {
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let report = HealthReport::new(state.ledger.is_healthy().await, state.dispenser.is_ok());
    (report.status_code(), Json(report))
}
