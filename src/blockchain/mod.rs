//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Configuration (sender key, mint, RPC URL)
//!     → wallet.rs (key decoding, signing)
//!     → client.rs (RPC queries with timeouts, submission)
//!     → transaction.rs (instruction assembly, failure classification)
//! ```
//!
//! # Security Constraints
//! - Never log private keys or sensitive data
//! - All RPC queries have configurable timeouts
//! - Each chain call is attempted once; nothing is retried

pub mod client;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use client::SolanaLedger;
pub use transaction::{build_transfer_plan, scale_amount, token_account_of, TransferPlan};
pub use types::{LedgerError, LedgerResult, TokenLedger};
pub use wallet::SenderWallet;
