//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::{AirdropServiceConfig, SecretKeyMaterial};
use crate::config::validation::{validate_config, ValidationError};

pub const SENDER_PRIVATE_KEY_ENV: &str = "SENDER_PRIVATE_KEY";
pub const SENDER_KEY_ENCODING_ENV: &str = "SENDER_KEY_ENCODING";
pub const TOKEN_MINT_ENV: &str = "TOKEN_MINT_ADDRESS";
pub const RPC_URL_ENV: &str = "SOLANA_RPC_URL";
pub const AMOUNT_ENV: &str = "AIRDROP_AMOUNT";
pub const DECIMALS_ENV: &str = "TOKEN_DECIMALS";
pub const BIND_ADDRESS_ENV: &str = "AIRDROP_BIND_ADDRESS";

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Environment variable {var} is invalid: {reason}")]
    Env { var: &'static str, reason: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load the TOML file (if any), overlay the environment, then validate.
pub fn load_config(path: Option<&Path>) -> Result<AirdropServiceConfig, ConfigError> {
    let config = match path {
        Some(path) => {
            let content = fs::read_to_string(path)?;
            toml::from_str(&content)?
        }
        None => AirdropServiceConfig::default(),
    };

    let config = apply_env_overrides(config, |var| std::env::var(var).ok())?;
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

/// Overlay environment values on top of file values.
///
/// `lookup` abstracts `std::env::var` so the merge can be tested without
/// touching the process environment. Empty values count as unset.
pub fn apply_env_overrides<F>(
    mut config: AirdropServiceConfig,
    lookup: F,
) -> Result<AirdropServiceConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

    if let Some(key) = get(SENDER_PRIVATE_KEY_ENV) {
        config.airdrop.sender_private_key = Some(SecretKeyMaterial::new(key));
    }
    if let Some(encoding) = get(SENDER_KEY_ENCODING_ENV) {
        config.airdrop.sender_key_encoding = encoding.parse().map_err(|reason| ConfigError::Env {
            var: SENDER_KEY_ENCODING_ENV,
            reason,
        })?;
    }
    if let Some(mint) = get(TOKEN_MINT_ENV) {
        config.airdrop.token_mint = Some(mint);
    }
    if let Some(rpc) = get(RPC_URL_ENV) {
        config.airdrop.rpc_url = Some(rpc);
    }
    if let Some(amount) = get(AMOUNT_ENV) {
        config.airdrop.amount = amount.trim().parse().map_err(|e: std::num::ParseIntError| {
            ConfigError::Env {
                var: AMOUNT_ENV,
                reason: e.to_string(),
            }
        })?;
    }
    if let Some(decimals) = get(DECIMALS_ENV) {
        config.airdrop.token_decimals =
            decimals.trim().parse().map_err(|e: std::num::ParseIntError| ConfigError::Env {
                var: DECIMALS_ENV,
                reason: e.to_string(),
            })?;
    }
    if let Some(bind) = get(BIND_ADDRESS_ENV) {
        config.listener.bind_address = bind;
    }

    Ok(config)
}
