//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the airdrop
//! service. All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the airdrop service.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AirdropServiceConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Token, sender and network settings for the airdrop itself.
    pub airdrop: AirdropConfig,

    #[serde(default)]
    pub security: SecurityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Timeout configuration for various operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout in seconds for the health route.
    ///
    /// Claims are not bounded by it; a submitted transfer is always answered.
    pub request_secs: u64,

    /// Per-call RPC timeout in seconds.
    pub rpc_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 90,
            rpc_secs: 60,
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Log output format.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}

/// How the sender key material is encoded in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum KeyEncoding {
    /// Base58 string of the 64-byte keypair (Phantom/CLI export format).
    #[default]
    Base58,
    /// JSON array of byte values, as written by `solana-keygen`.
    ByteArray,
}

impl std::str::FromStr for KeyEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "base58" => Ok(KeyEncoding::Base58),
            "byte_array" | "bytes" | "json" => Ok(KeyEncoding::ByteArray),
            other => Err(format!("unknown key encoding '{}'", other)),
        }
    }
}

/// Sender key material as read from configuration.
///
/// Never printed and never serialized back out.
#[derive(Clone, Deserialize, Default)]
#[serde(transparent)]
pub struct SecretKeyMaterial(String);

impl SecretKeyMaterial {
    pub fn new(material: impl Into<String>) -> Self {
        Self(material.into())
    }

    /// Access the raw material. Callers must not log it.
    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for SecretKeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SecretKeyMaterial(<redacted>)")
    }
}

impl Serialize for SecretKeyMaterial {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str("<redacted>")
    }
}

/// Airdrop configuration: who pays, what token, how much, which network.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AirdropConfig {
    /// Sender keypair. Prefer the `SENDER_PRIVATE_KEY` environment variable.
    pub sender_private_key: Option<SecretKeyMaterial>,

    /// Encoding of `sender_private_key`.
    pub sender_key_encoding: KeyEncoding,

    /// Mint address of the token being distributed.
    pub token_mint: Option<String>,

    /// Solana JSON-RPC endpoint URL.
    pub rpc_url: Option<String>,

    /// Whole tokens sent per claim.
    pub amount: u64,

    /// Decimal precision of the mint; units = amount * 10^decimals.
    pub token_decimals: u8,

    /// Compare `token_decimals` against the mint account at startup.
    pub verify_mint_decimals: bool,

    /// Fail the request when the recipient account lookup errors instead of
    /// assuming the account is missing.
    pub strict_account_lookup: bool,
}

impl Default for AirdropConfig {
    fn default() -> Self {
        Self {
            sender_private_key: None,
            sender_key_encoding: KeyEncoding::Base58,
            token_mint: None,
            rpc_url: None,
            amount: 25_000,
            token_decimals: 9,
            verify_mint_decimals: true,
            strict_account_lookup: false,
        }
    }
}

/// Security hardening configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Maximum body size in bytes.
    pub max_body_size: usize,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            max_body_size: 16 * 1024,
        }
    }
}
