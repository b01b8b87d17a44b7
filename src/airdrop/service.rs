//! The claim workflow: balance check, account lookup, assembly, submission.

use std::str::FromStr;
use std::sync::Arc;

use solana_sdk::pubkey::Pubkey;

use crate::airdrop::error::AirdropError;
use crate::airdrop::types::ClaimReceipt;
use crate::blockchain::transaction::{build_transfer_plan, scale_amount, token_account_of};
use crate::blockchain::{SenderWallet, TokenLedger};
use crate::config::AirdropConfig;
use crate::observability::metrics;

/// Airdrop parameters resolved from configuration.
#[derive(Debug)]
pub struct AirdropSettings {
    wallet: SenderWallet,
    mint: Pubkey,
    amount: u64,
    decimals: u8,
    units: u64,
    strict_account_lookup: bool,
}

impl AirdropSettings {
    /// Resolve required values and decode the sender key.
    ///
    /// Missing values fail before the key is touched, so a missing key and a
    /// missing mint both report as a configuration error.
    pub fn resolve(config: &AirdropConfig) -> Result<Self, AirdropError> {
        let key = config.sender_private_key.as_ref().filter(|k| !k.is_empty());
        let mint = config.token_mint.as_deref().map(str::trim).filter(|m| !m.is_empty());
        let rpc = config.rpc_url.as_deref().map(str::trim).filter(|r| !r.is_empty());

        let (key, mint) = match (key, mint, rpc) {
            (Some(key), Some(mint), Some(_)) => (key, mint),
            _ => {
                let missing: Vec<&str> = [
                    (key.is_none(), "sender_private_key"),
                    (mint.is_none(), "token_mint"),
                    (rpc.is_none(), "rpc_url"),
                ]
                .into_iter()
                .filter_map(|(absent, name)| absent.then_some(name))
                .collect();
                return Err(AirdropError::Configuration(format!(
                    "missing {}",
                    missing.join(", ")
                )));
            }
        };

        let wallet = SenderWallet::from_material(key, config.sender_key_encoding)
            .map_err(|e| AirdropError::InvalidCredential(e.to_string()))?;

        let mint = Pubkey::from_str(mint)
            .map_err(|e| AirdropError::Configuration(format!("token_mint: {}", e)))?;

        let units = scale_amount(config.amount, config.token_decimals).ok_or_else(|| {
            AirdropError::Configuration(format!(
                "amount {} overflows at {} decimals",
                config.amount, config.token_decimals
            ))
        })?;

        Ok(Self {
            wallet,
            mint,
            amount: config.amount,
            decimals: config.token_decimals,
            units,
            strict_account_lookup: config.strict_account_lookup,
        })
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn units(&self) -> u64 {
        self.units
    }

    pub fn sender(&self) -> Pubkey {
        self.wallet.pubkey()
    }
}

/// Sends the configured amount to one recipient per call.
///
/// Holds no per-request state; concurrent claims share it through an `Arc`.
pub struct Dispenser {
    settings: AirdropSettings,
    ledger: Arc<dyn TokenLedger>,
}

impl Dispenser {
    pub fn new(settings: AirdropSettings, ledger: Arc<dyn TokenLedger>) -> Self {
        tracing::info!(
            sender = %settings.sender(),
            mint = %settings.mint,
            amount = settings.amount,
            decimals = settings.decimals,
            "Airdrop dispenser ready"
        );
        Self { settings, ledger }
    }

    pub fn settings(&self) -> &AirdropSettings {
        &self.settings
    }

    /// Compare configured decimals with the mint account.
    pub async fn verify_mint(&self) -> Result<(), AirdropError> {
        let on_chain = self.ledger.mint_decimals(&self.settings.mint).await?;
        if on_chain != self.settings.decimals {
            return Err(AirdropError::Configuration(format!(
                "token_decimals is {} but mint {} has {} decimals",
                self.settings.decimals, self.settings.mint, on_chain
            )));
        }
        Ok(())
    }

    /// Transfer the configured amount to `recipient`.
    pub async fn dispense(&self, recipient: &Pubkey) -> Result<ClaimReceipt, AirdropError> {
        let settings = &self.settings;
        let sender = settings.sender();

        // Best effort: a concurrent claim can still drain the balance before
        // submission, in which case the token program rejects the transfer.
        let source = token_account_of(&sender, &settings.mint);
        let balance = self.ledger.token_balance(&source).await?;
        if balance < settings.units {
            tracing::warn!(
                balance,
                required = settings.units,
                "Sender token balance below airdrop amount"
            );
            return Err(AirdropError::InsufficientBalance);
        }

        let destination = token_account_of(recipient, &settings.mint);
        let recipient_account_exists = match self.ledger.account_exists(&destination).await {
            Ok(exists) => exists,
            Err(e) if settings.strict_account_lookup => return Err(e.into()),
            Err(e) => {
                tracing::warn!(
                    account = %destination,
                    error = %e,
                    "Recipient account lookup failed, assuming it does not exist"
                );
                false
            }
        };

        let plan = build_transfer_plan(
            &sender,
            recipient,
            &settings.mint,
            settings.units,
            settings.decimals,
            recipient_account_exists,
        )?;

        tracing::debug!(
            recipient = %recipient,
            instructions = plan.instructions.len(),
            create_account = plan.creates_recipient_account,
            "Submitting airdrop transaction"
        );

        let blockhash = self.ledger.latest_blockhash().await?;
        let transaction = settings.wallet.sign(&plan.instructions, blockhash);
        let signature = self.ledger.send_and_confirm(&transaction).await?;

        metrics::record_dispensed(settings.amount);
        tracing::info!(
            recipient = %recipient,
            signature = %signature,
            amount = settings.amount,
            "Airdrop confirmed"
        );

        Ok(ClaimReceipt {
            success: true,
            signature: signature.to_string(),
            amount: settings.amount,
            message: format!("Successfully airdropped {} tokens", settings.amount),
        })
    }
}

impl std::fmt::Debug for Dispenser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispenser")
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}
