//! Airdrop error taxonomy and its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::airdrop::types::ErrorBody;
use crate::blockchain::LedgerError;

/// Body used when a downstream failure carries no message.
pub const GENERIC_FAILURE: &str = "Internal server error during airdrop";

/// Everything a claim can fail with.
///
/// `Display` is the client-facing message; details that must stay on the
/// server ride in the variant fields and are only logged.
#[derive(Debug, Clone, Error)]
pub enum AirdropError {
    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Wallet address is required")]
    MissingWalletAddress,

    #[error("Invalid wallet address format")]
    InvalidWalletAddress,

    #[error("Server configuration error")]
    Configuration(String),

    #[error("Invalid sender private key format")]
    InvalidCredential(String),

    #[error("insufficient_token_balance")]
    InsufficientBalance,

    #[error("already_claimed_or_has_balance")]
    AlreadyClaimed,

    #[error("{}", downstream_message(.0))]
    Ledger(LedgerError),
}

fn downstream_message(error: &LedgerError) -> String {
    let message = error.to_string();
    if message.trim().is_empty() {
        GENERIC_FAILURE.to_string()
    } else {
        message
    }
}

impl AirdropError {
    /// HTTP status for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            AirdropError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AirdropError::MissingWalletAddress
            | AirdropError::InvalidWalletAddress
            | AirdropError::InsufficientBalance
            | AirdropError::AlreadyClaimed => StatusCode::BAD_REQUEST,
            AirdropError::Configuration(_)
            | AirdropError::InvalidCredential(_)
            | AirdropError::Ledger(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable label for metrics.
    pub fn outcome(&self) -> &'static str {
        match self {
            AirdropError::MethodNotAllowed => "method_not_allowed",
            AirdropError::MissingWalletAddress => "missing_wallet_address",
            AirdropError::InvalidWalletAddress => "invalid_wallet_address",
            AirdropError::Configuration(_) => "configuration_error",
            AirdropError::InvalidCredential(_) => "invalid_credential",
            AirdropError::InsufficientBalance => "insufficient_balance",
            AirdropError::AlreadyClaimed => "already_claimed",
            AirdropError::Ledger(_) => "ledger_error",
        }
    }
}

impl From<LedgerError> for AirdropError {
    fn from(error: LedgerError) -> Self {
        match error {
            LedgerError::AccountAlreadyInUse => AirdropError::AlreadyClaimed,
            LedgerError::InsufficientFunds => AirdropError::InsufficientBalance,
            other => AirdropError::Ledger(other),
        }
    }
}

impl IntoResponse for AirdropError {
    fn into_response(self) -> Response {
        match &self {
            AirdropError::Configuration(detail) => {
                tracing::error!(detail = %detail, "Airdrop configuration error");
            }
            AirdropError::InvalidCredential(detail) => {
                tracing::error!(detail = %detail, "Sender key could not be decoded");
            }
            AirdropError::Ledger(e) => tracing::error!(error = %e, "Airdrop failed"),
            _ => {}
        }

        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status(), Json(body)).into_response()
    }
}
