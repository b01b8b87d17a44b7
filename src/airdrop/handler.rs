use std::str::FromStr;
use std::time::Instant;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use solana_sdk::pubkey::Pubkey;

use crate::airdrop::error::AirdropError;
use crate::airdrop::types::{ClaimReceipt, ClaimRequest};
use crate::http::request::request_id;
use crate::http::server::AppState;
use crate::observability::metrics;

/// `POST /api/airdrop`
pub async fn claim(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let start = Instant::now();
    let request_id = request_id(&headers);

    match process_claim(&state, &body).await {
        Ok(receipt) => {
            metrics::record_claim("success", start);
            tracing::info!(request_id = %request_id, signature = %receipt.signature, "Claim succeeded");
            (StatusCode::OK, Json(receipt)).into_response()
        }
        Err(e) => {
            metrics::record_claim(e.outcome(), start);
            tracing::info!(
                request_id = %request_id,
                outcome = e.outcome(),
                status = e.status().as_u16(),
                "Claim rejected"
            );
            e.into_response()
        }
    }
}

async fn process_claim(state: &AppState, body: &[u8]) -> Result<ClaimReceipt, AirdropError> {
    let request = ClaimRequest::from_body(body);
    let address = request
        .wallet_address()
        .ok_or(AirdropError::MissingWalletAddress)?;

    let recipient = Pubkey::from_str(address).map_err(|_| AirdropError::InvalidWalletAddress)?;

    let dispenser = state.dispenser.as_ref().map_err(Clone::clone)?;
    dispenser.dispense(&recipient).await
}

/// Any method other than POST on the claim route.
pub async fn method_not_allowed(method: Method) -> Response {
    tracing::debug!(method = %method, "Rejected claim method");
    metrics::record_claim(AirdropError::MethodNotAllowed.outcome(), Instant::now());
    AirdropError::MethodNotAllowed.into_response()
}
