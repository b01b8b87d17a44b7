//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Require the sender key, token mint and RPC endpoint
//! - Check that the sender key decodes under the configured encoding
//! - Check that amount * 10^decimals fits in token units
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: config → Result<(), Vec<ValidationError>>
//! - Runs before the server binds its listener

use std::net::SocketAddr;
use std::str::FromStr;

use solana_sdk::pubkey::Pubkey;
use thiserror::Error;

use crate::blockchain::transaction::scale_amount;
use crate::blockchain::wallet::SenderWallet;
use crate::config::schema::AirdropServiceConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing required setting {0}")]
    Missing(&'static str),

    #[error("{field} is invalid: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ValidationError {
    ValidationError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Validate a fully merged configuration.
pub fn validate_config(config: &AirdropServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();
    let airdrop = &config.airdrop;

    match &airdrop.sender_private_key {
        Some(material) if !material.is_empty() => {
            // The wallet error never carries key bytes, so it is safe to keep.
            if let Err(e) = SenderWallet::from_material(material, airdrop.sender_key_encoding) {
                errors.push(invalid("airdrop.sender_private_key", e.to_string()));
            }
        }
        _ => errors.push(ValidationError::Missing("airdrop.sender_private_key")),
    }

    match airdrop.token_mint.as_deref().map(str::trim) {
        Some(mint) if !mint.is_empty() => {
            if let Err(e) = Pubkey::from_str(mint) {
                errors.push(invalid("airdrop.token_mint", e.to_string()));
            }
        }
        _ => errors.push(ValidationError::Missing("airdrop.token_mint")),
    }

    match airdrop.rpc_url.as_deref().map(str::trim) {
        Some(rpc) if !rpc.is_empty() => match url::Url::parse(rpc) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(invalid(
                "airdrop.rpc_url",
                format!("unsupported scheme '{}'", url.scheme()),
            )),
            Err(e) => errors.push(invalid("airdrop.rpc_url", e.to_string())),
        },
        _ => errors.push(ValidationError::Missing("airdrop.rpc_url")),
    }

    if airdrop.amount == 0 {
        errors.push(invalid("airdrop.amount", "must be greater than zero"));
    } else if scale_amount(airdrop.amount, airdrop.token_decimals).is_none() {
        errors.push(invalid(
            "airdrop.token_decimals",
            format!(
                "{} tokens at {} decimals overflows token units",
                airdrop.amount, airdrop.token_decimals
            ),
        ));
    }

    if SocketAddr::from_str(&config.listener.bind_address).is_err() {
        errors.push(invalid("listener.bind_address", "not a socket address"));
    }

    if config.observability.metrics_enabled
        && SocketAddr::from_str(&config.observability.metrics_address).is_err()
    {
        errors.push(invalid("observability.metrics_address", "not a socket address"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(invalid("timeouts.request_secs", "must be greater than zero"));
    }
    if config.timeouts.rpc_secs == 0 {
        errors.push(invalid("timeouts.rpc_secs", "must be greater than zero"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
