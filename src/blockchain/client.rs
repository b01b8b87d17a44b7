//! Solana JSON-RPC client with timeout and error handling.
//!
//! # Responsibilities
//! - Connect to a JSON-RPC endpoint at `confirmed` commitment
//! - Query token balances, account existence and mint metadata
//! - Submit transactions and classify their failures
//! - Provide health check for blockchain connectivity

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use solana_client::client_error::ClientError;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use tokio::time::timeout;

use crate::blockchain::transaction::classify_submission_error;
use crate::blockchain::types::{LedgerError, LedgerResult, TokenLedger};
use crate::observability::metrics;

/// `TokenLedger` backed by a Solana RPC node.
#[derive(Clone)]
pub struct SolanaLedger {
    rpc: Arc<RpcClient>,
    rpc_url: String,
    /// Bound on each query; submission uses the client's confirmation wait.
    timeout_duration: Duration,
}

impl SolanaLedger {
    /// Create a new ledger client.
    ///
    /// No network traffic happens here; an unreachable node surfaces on the
    /// first call.
    pub fn new(rpc_url: &str, rpc_timeout_secs: u64) -> LedgerResult<Self> {
        let parsed: url::Url = rpc_url
            .parse()
            .map_err(|e| LedgerError::Rpc(format!("Invalid RPC URL '{}': {}", rpc_url, e)))?;

        let timeout_duration = Duration::from_secs(rpc_timeout_secs);
        let rpc = RpcClient::new_with_timeout_and_commitment(
            parsed.to_string(),
            timeout_duration,
            CommitmentConfig::confirmed(),
        );

        tracing::info!(rpc_url = %rpc_url, "Solana RPC client initialized");

        Ok(Self {
            rpc: Arc::new(rpc),
            rpc_url: rpc_url.to_string(),
            timeout_duration,
        })
    }

    /// Run one RPC query under the per-call timeout.
    async fn query<T, F>(&self, operation: &'static str, fut: F) -> LedgerResult<T>
    where
        F: Future<Output = Result<T, ClientError>>,
    {
        let start = Instant::now();
        match timeout(self.timeout_duration, fut).await {
            Ok(Ok(value)) => {
                metrics::record_rpc_call(operation, "ok", start);
                Ok(value)
            }
            Ok(Err(e)) => {
                tracing::warn!(operation, error = %e, "RPC error");
                metrics::record_rpc_call(operation, "error", start);
                Err(LedgerError::Rpc(e.to_string()))
            }
            Err(_) => {
                tracing::warn!(operation, "RPC timeout");
                metrics::record_rpc_call(operation, "timeout", start);
                Err(LedgerError::Timeout(self.timeout_duration.as_secs()))
            }
        }
    }
}

#[async_trait]
impl TokenLedger for SolanaLedger {
    async fn token_balance(&self, token_account: &Pubkey) -> LedgerResult<u64> {
        let balance = self
            .query("token_balance", self.rpc.get_token_account_balance(token_account))
            .await?;

        balance
            .amount
            .parse::<u64>()
            .map_err(|e| LedgerError::InvalidResponse(format!("token amount '{}': {}", balance.amount, e)))
    }

    async fn account_exists(&self, account: &Pubkey) -> LedgerResult<bool> {
        let response = self
            .query(
                "account_exists",
                self.rpc.get_account_with_commitment(account, self.rpc.commitment()),
            )
            .await?;
        Ok(response.value.is_some())
    }

    async fn mint_decimals(&self, mint: &Pubkey) -> LedgerResult<u8> {
        let supply = self.query("mint_decimals", self.rpc.get_token_supply(mint)).await?;
        Ok(supply.decimals)
    }

    async fn latest_blockhash(&self) -> LedgerResult<Hash> {
        self.query("latest_blockhash", self.rpc.get_latest_blockhash()).await
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> LedgerResult<Signature> {
        let start = Instant::now();
        match self.rpc.send_and_confirm_transaction(transaction).await {
            Ok(signature) => {
                metrics::record_rpc_call("send_and_confirm", "ok", start);
                Ok(signature)
            }
            Err(e) => {
                metrics::record_rpc_call("send_and_confirm", "error", start);
                let classified = match e.get_transaction_error() {
                    Some(tx_error) => classify_submission_error(transaction, &tx_error),
                    None => LedgerError::Rpc(e.to_string()),
                };
                tracing::warn!(error = %e, classified = %classified, "Transaction submission failed");
                Err(classified)
            }
        }
    }

    async fn is_healthy(&self) -> bool {
        let healthy = self.query("health", self.rpc.get_health()).await.is_ok();
        metrics::record_rpc_health(healthy);
        healthy
    }
}

impl std::fmt::Debug for SolanaLedger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SolanaLedger")
            .field("rpc_url", &self.rpc_url)
            .field("timeout_secs", &self.timeout_duration.as_secs())
            .finish()
    }
}
