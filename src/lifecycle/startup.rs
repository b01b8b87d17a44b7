//! Startup orchestration.
//!
//! # Responsibilities
//! - Start the metrics exporter
//! - Build the RPC client and the HTTP server
//! - Check the configured decimals against the mint
//! - Bind the listener and serve until shutdown
//!
//! # Design Decisions
//! - Fail fast: configuration problems are fatal
//! - An unreachable RPC node at startup only warns
//! - Listener binds last (traffic only when ready)

use std::net::SocketAddr;
use std::sync::Arc;

use thiserror::Error;
use tokio::net::TcpListener;

use crate::airdrop::AirdropError;
use crate::blockchain::{LedgerError, SolanaLedger};
use crate::config::AirdropServiceConfig;
use crate::http::HttpServer;
use crate::lifecycle::Shutdown;
use crate::observability::metrics;

/// Fatal startup failures.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("RPC client: {0}")]
    Ledger(#[from] LedgerError),

    #[error("airdrop configuration: {0}")]
    Airdrop(String),

    #[error("listener: {0}")]
    Io(#[from] std::io::Error),
}

/// Start every subsystem and serve until `shutdown` fires.
pub async fn run(config: AirdropServiceConfig, shutdown: Shutdown) -> Result<(), StartupError> {
    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse::<SocketAddr>() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let rpc_url = config
        .airdrop
        .rpc_url
        .clone()
        .ok_or_else(|| StartupError::Airdrop("missing rpc_url".to_string()))?;
    let ledger = Arc::new(SolanaLedger::new(&rpc_url, config.timeouts.rpc_secs)?);

    let verify_decimals = config.airdrop.verify_mint_decimals;
    let bind_address = config.listener.bind_address.clone();
    let server = HttpServer::new(config, ledger);

    let dispenser = server
        .dispenser()
        .ok_or_else(|| StartupError::Airdrop("airdrop settings did not resolve".to_string()))?;

    if verify_decimals {
        match dispenser.verify_mint().await {
            Ok(()) => tracing::info!("Mint decimals verified"),
            Err(AirdropError::Ledger(e)) => {
                tracing::warn!(error = %e, "Could not verify mint decimals, continuing");
            }
            Err(AirdropError::Configuration(detail)) => return Err(StartupError::Airdrop(detail)),
            Err(e) => return Err(StartupError::Airdrop(e.to_string())),
        }
    }

    let listener = TcpListener::bind(&bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    server.run(listener, shutdown.subscribe()).await?;
    Ok(())
}
