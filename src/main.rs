//! Token Airdrop Service
//!
//! Sends a fixed amount of one SPL token from a custodial wallet to any
//! wallet that asks, creating the recipient's token account when needed.
//!
//! # Architecture Overview
//!
//! ```text
//!   POST /api/airdrop
//!   ───────────────▶ ┌──────────┐   ┌──────────┐   ┌───────────────┐
//!                    │   http   │──▶│ airdrop  │──▶│  blockchain   │──▶ Solana RPC
//!   ◀─────────────── │  server  │◀──│ handler  │◀──│ ledger+wallet │◀──
//!   {signature}      └──────────┘   └──────────┘   └───────────────┘
//!
//!   config (TOML + env) · observability (tracing, prometheus) · lifecycle
//! ```
//!
//! # Environment
//! - `SENDER_PRIVATE_KEY`, `SENDER_KEY_ENCODING` (base58 | byte_array)
//! - `TOKEN_MINT_ADDRESS`, `SOLANA_RPC_URL`
//! - `AIRDROP_AMOUNT` (default 25000), `TOKEN_DECIMALS` (default 9)

use std::path::PathBuf;

use clap::Parser;

use token_airdrop::config::load_config;
use token_airdrop::lifecycle::{self, Shutdown};
use token_airdrop::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "token-airdrop")]
#[command(about = "HTTP service that airdrops a fixed amount of an SPL token", long_about = None)]
struct Cli {
    /// Optional TOML config file; environment variables override it.
    #[arg(short, long, env = "AIRDROP_CONFIG")]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("token-airdrop: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.observability);

    tracing::info!("token-airdrop v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        amount = config.airdrop.amount,
        decimals = config.airdrop.token_decimals,
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    let shutdown = Shutdown::new();
    shutdown.trigger_on_signal();

    lifecycle::run(config, shutdown).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
