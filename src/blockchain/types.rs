//! Chain-facing port trait and error definitions.

use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_sdk::transaction::Transaction;
use thiserror::Error;

/// Errors that can occur during blockchain operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// The RPC returned data we could not interpret.
    #[error("Unexpected RPC response: {0}")]
    InvalidResponse(String),

    /// Submission tried to create an account that already exists.
    #[error("Account already in use")]
    AccountAlreadyInUse,

    /// The token program rejected the transfer for lack of funds.
    #[error("Insufficient token funds")]
    InsufficientFunds,

    /// Transaction was rejected or failed on-chain.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Invalid key material or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Instruction could not be built.
    #[error("Instruction error: {0}")]
    Instruction(String),
}

/// Result type for blockchain operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Operations the airdrop needs from the chain.
///
/// `SolanaLedger` talks to a JSON-RPC node; tests substitute an in-memory
/// ledger. Implementations attempt each call exactly once.
#[async_trait]
pub trait TokenLedger: Send + Sync {
    /// Raw token units held by a token account.
    async fn token_balance(&self, token_account: &Pubkey) -> LedgerResult<u64>;

    /// Whether any account exists at the address.
    async fn account_exists(&self, account: &Pubkey) -> LedgerResult<bool>;

    /// Decimal precision recorded on the mint account.
    async fn mint_decimals(&self, mint: &Pubkey) -> LedgerResult<u8>;

    /// Most recent blockhash for transaction freshness.
    async fn latest_blockhash(&self) -> LedgerResult<Hash>;

    /// Submit a signed transaction and wait for `confirmed` commitment.
    async fn send_and_confirm(&self, transaction: &Transaction) -> LedgerResult<Signature>;

    /// Check if the node is reachable.
    async fn is_healthy(&self) -> bool;
}
