//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use solana_sdk::hash::Hash;
use solana_sdk::instruction::InstructionError;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signature, Signer};
use solana_sdk::transaction::{Transaction, TransactionError};
use tokio::net::TcpListener;

use token_airdrop::blockchain::transaction::classify_submission_error;
use token_airdrop::blockchain::{LedgerError, LedgerResult, TokenLedger};
use token_airdrop::config::{AirdropServiceConfig, SecretKeyMaterial};
use token_airdrop::{HttpServer, Shutdown};

/// In-memory chain: token accounts that exist, one sender balance, and a
/// log of every submitted transaction.
pub struct MockLedger {
    pub balance: Mutex<u64>,
    pub existing_accounts: Mutex<HashSet<Pubkey>>,
    /// Answer every existence lookup with "missing", as if each claim read
    /// the chain before any other claim landed.
    pub stale_lookups: bool,
    pub lookup_error: Option<LedgerError>,
    pub submit_error: Option<LedgerError>,
    /// Time spent waiting for confirmation after the transaction is recorded.
    pub confirm_delay: Option<Duration>,
    pub sent: Mutex<Vec<Transaction>>,
    pub balance_calls: AtomicUsize,
    pub lookup_calls: AtomicUsize,
    pub healthy: bool,
}

impl MockLedger {
    pub fn with_balance(balance: u64) -> Self {
        Self {
            balance: Mutex::new(balance),
            existing_accounts: Mutex::new(HashSet::new()),
            stale_lookups: false,
            lookup_error: None,
            submit_error: None,
            confirm_delay: None,
            sent: Mutex::new(Vec::new()),
            balance_calls: AtomicUsize::new(0),
            lookup_calls: AtomicUsize::new(0),
            healthy: true,
        }
    }

    pub fn add_account(&self, account: Pubkey) {
        self.existing_accounts.lock().unwrap().insert(account);
    }

    pub fn sent(&self) -> Vec<Transaction> {
        self.sent.lock().unwrap().clone()
    }

    pub fn total_calls(&self) -> usize {
        self.balance_calls.load(Ordering::SeqCst)
            + self.lookup_calls.load(Ordering::SeqCst)
            + self.sent.lock().unwrap().len()
    }

    /// Program id of every instruction in a transaction.
    pub fn programs(tx: &Transaction) -> Vec<Pubkey> {
        tx.message
            .instructions
            .iter()
            .map(|ix| tx.message.account_keys[ix.program_id_index as usize])
            .collect()
    }
}

#[async_trait]
impl TokenLedger for MockLedger {
    async fn token_balance(&self, _token_account: &Pubkey) -> LedgerResult<u64> {
        self.balance_calls.fetch_add(1, Ordering::SeqCst);
        Ok(*self.balance.lock().unwrap())
    }

    async fn account_exists(&self, account: &Pubkey) -> LedgerResult<bool> {
        self.lookup_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(e) = &self.lookup_error {
            return Err(e.clone());
        }
        if self.stale_lookups {
            return Ok(false);
        }
        Ok(self.existing_accounts.lock().unwrap().contains(account))
    }

    async fn mint_decimals(&self, _mint: &Pubkey) -> LedgerResult<u8> {
        Ok(9)
    }

    async fn latest_blockhash(&self) -> LedgerResult<Hash> {
        Ok(Hash::new_unique())
    }

    async fn send_and_confirm(&self, transaction: &Transaction) -> LedgerResult<Signature> {
        self.sent.lock().unwrap().push(transaction.clone());
        if let Some(delay) = self.confirm_delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(e) = &self.submit_error {
            return Err(e.clone());
        }

        // The associated token program refuses to create an account that is
        // already initialized, failing the whole transaction with IllegalOwner.
        let message = &transaction.message;
        let creates: Vec<(u8, Pubkey)> = message
            .instructions
            .iter()
            .enumerate()
            .filter(|(_, ix)| {
                message.account_keys[ix.program_id_index as usize]
                    == spl_associated_token_account::id()
            })
            .map(|(i, ix)| (i as u8, message.account_keys[ix.accounts[1] as usize]))
            .collect();

        let mut accounts = self.existing_accounts.lock().unwrap();
        if let Some((index, _)) = creates.iter().find(|(_, created)| accounts.contains(created)) {
            let chain_error =
                TransactionError::InstructionError(*index, InstructionError::IllegalOwner);
            return Err(classify_submission_error(transaction, &chain_error));
        }
        accounts.extend(creates.into_iter().map(|(_, created)| created));

        Ok(transaction.signatures[0])
    }

    async fn is_healthy(&self) -> bool {
        self.healthy
    }
}

/// Fresh sender, mint and a config wired to them.
pub struct Fixture {
    pub sender: Keypair,
    pub mint: Pubkey,
    pub config: AirdropServiceConfig,
}

impl Fixture {
    pub fn new() -> Self {
        let sender = Keypair::new();
        let mint = Pubkey::new_unique();

        let mut config = AirdropServiceConfig::default();
        config.listener.bind_address = "127.0.0.1:0".to_string();
        config.airdrop.sender_private_key = Some(SecretKeyMaterial::new(
            bs58::encode(sender.to_bytes()).into_string(),
        ));
        config.airdrop.token_mint = Some(mint.to_string());
        config.airdrop.rpc_url = Some("http://127.0.0.1:8899".to_string());

        Self { sender, mint, config }
    }

    pub fn sender_pubkey(&self) -> Pubkey {
        self.sender.pubkey()
    }
}

/// Serve the real router on an ephemeral port.
pub async fn start_server(
    config: AirdropServiceConfig,
    ledger: Arc<MockLedger>,
) -> (SocketAddr, Shutdown) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, ledger);
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
