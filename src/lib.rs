//! Solana SPL token airdrop service library.

pub mod airdrop;
pub mod blockchain;
pub mod config;
pub mod health;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use airdrop::{AirdropError, Dispenser};
pub use blockchain::{SolanaLedger, TokenLedger};
pub use config::schema::AirdropServiceConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
