//! Claim request and response payloads.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/airdrop`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimRequest {
    #[serde(rename = "walletAddress", default)]
    pub wallet_address: Option<String>,
}

impl ClaimRequest {
    /// Parse a raw body, treating anything unreadable as an empty claim.
    pub fn from_body(body: &[u8]) -> Self {
        serde_json::from_slice(body).unwrap_or_default()
    }

    /// The wallet address, if present and non-blank.
    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet_address
            .as_deref()
            .filter(|s| !s.trim().is_empty())
    }
}

/// Successful claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClaimReceipt {
    pub success: bool,
    /// Base58 transaction signature.
    pub signature: String,
    /// Whole tokens sent.
    pub amount: u64,
    pub message: String,
}

/// Error payload shared by every failure status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}
