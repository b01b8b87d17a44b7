//! Sender wallet loading and transaction signing.
//!
//! # Security
//! - Key material is read once at startup from configuration
//! - Keys are never logged or serialized
//! - Decoded bytes are zeroed after the keypair is built

use solana_sdk::hash::Hash;
use solana_sdk::instruction::Instruction;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::transaction::Transaction;
use zeroize::Zeroizing;

use crate::blockchain::types::{LedgerError, LedgerResult};
use crate::config::schema::{KeyEncoding, SecretKeyMaterial};

/// Length of an ed25519 keypair (secret half followed by public half).
pub const KEYPAIR_LENGTH: usize = 64;

/// Custodial wallet that funds every airdrop.
pub struct SenderWallet {
    keypair: Keypair,
}

impl SenderWallet {
    /// Decode key material in the configured encoding.
    ///
    /// Error messages describe the shape of the input, never its content.
    pub fn from_material(material: &SecretKeyMaterial, encoding: KeyEncoding) -> LedgerResult<Self> {
        let raw = material.expose().trim();

        let bytes: Zeroizing<Vec<u8>> = match encoding {
            KeyEncoding::Base58 => Zeroizing::new(
                bs58::decode(raw)
                    .into_vec()
                    .map_err(|_| LedgerError::Wallet("key is not valid base58".to_string()))?,
            ),
            KeyEncoding::ByteArray => Zeroizing::new(
                serde_json::from_str::<Vec<u8>>(raw).map_err(|_| {
                    LedgerError::Wallet("key is not a JSON array of bytes".to_string())
                })?,
            ),
        };

        Self::from_bytes(&bytes)
    }

    /// Build from raw keypair bytes.
    pub fn from_bytes(bytes: &[u8]) -> LedgerResult<Self> {
        if bytes.len() != KEYPAIR_LENGTH {
            return Err(LedgerError::Wallet(format!(
                "expected {} key bytes, got {}",
                KEYPAIR_LENGTH,
                bytes.len()
            )));
        }

        #[allow(deprecated)]
        let keypair = Keypair::from_bytes(bytes).map_err(|_| {
            LedgerError::Wallet("key bytes are not a valid ed25519 keypair".to_string())
        })?;

        Ok(Self { keypair })
    }

    /// The sender's public address.
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// Sign instructions into a transaction with the sender as fee payer.
    pub fn sign(&self, instructions: &[Instruction], blockhash: Hash) -> Transaction {
        Transaction::new_signed_with_payer(
            instructions,
            Some(&self.keypair.pubkey()),
            &[&self.keypair],
            blockhash,
        )
    }
}

impl std::fmt::Debug for SenderWallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SenderWallet")
            .field("pubkey", &self.keypair.pubkey())
            .finish_non_exhaustive()
    }
}
