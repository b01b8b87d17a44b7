//! Token airdrop subsystem.
//!
//! # Data Flow
//! ```text
//! POST /api/airdrop {walletAddress}
//!     → handler.rs (method gate, body and address validation)
//!     → service.rs (balance check, recipient account lookup)
//!     → blockchain (assemble, sign, submit, confirm)
//!     → error.rs (typed failure → status + {error})
//! ```
//!
//! # Design Decisions
//! - Amount and token come from configuration only
//! - The recipient address is the only caller input reaching the chain
//! - No retries and no deduplication: a repeated claim is a new transfer

pub mod error;
pub mod handler;
pub mod service;
pub mod types;

pub use error::AirdropError;
pub use service::{AirdropSettings, Dispenser};
pub use types::{ClaimReceipt, ClaimRequest, ErrorBody};
