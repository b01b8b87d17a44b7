//! Transfer instruction assembly and submission error classification.
//!
//! # Responsibilities
//! - Scale whole-token amounts into base units
//! - Build the ordered instruction list (optional ATA creation, checked transfer)
//! - Turn on-chain failures into typed `LedgerError` variants

use solana_sdk::instruction::{Instruction, InstructionError};
use solana_sdk::pubkey::Pubkey;
use solana_sdk::transaction::{Transaction, TransactionError};
use spl_associated_token_account::get_associated_token_address;
use spl_associated_token_account::instruction::create_associated_token_account;

use crate::blockchain::types::{LedgerError, LedgerResult};

/// System program error code for "account already in use".
const ACCOUNT_ALREADY_IN_USE: u32 = 0;

/// Convert whole tokens into base units, `None` on overflow.
pub fn scale_amount(amount: u64, decimals: u8) -> Option<u64> {
    10u64
        .checked_pow(u32::from(decimals))
        .and_then(|factor| amount.checked_mul(factor))
}

/// Associated token account of `owner` for `mint`.
pub fn token_account_of(owner: &Pubkey, mint: &Pubkey) -> Pubkey {
    get_associated_token_address(owner, mint)
}

/// Instructions for one airdrop, in submission order.
#[derive(Debug, Clone)]
pub struct TransferPlan {
    pub instructions: Vec<Instruction>,
    pub creates_recipient_account: bool,
}

/// Build the airdrop instruction list.
///
/// When `recipient_account_exists` is false a create-ATA instruction paid by
/// the sender is placed before the transfer. The transfer is checked against
/// `decimals`, so the token program rejects it if the mint disagrees.
pub fn build_transfer_plan(
    sender: &Pubkey,
    recipient: &Pubkey,
    mint: &Pubkey,
    units: u64,
    decimals: u8,
    recipient_account_exists: bool,
) -> LedgerResult<TransferPlan> {
    let token_program = spl_token::id();
    let source = token_account_of(sender, mint);
    let destination = token_account_of(recipient, mint);

    let mut instructions = Vec::with_capacity(2);
    if !recipient_account_exists {
        instructions.push(create_associated_token_account(
            sender,
            recipient,
            mint,
            &token_program,
        ));
    }

    let transfer = spl_token::instruction::transfer_checked(
        &token_program,
        &source,
        mint,
        &destination,
        sender,
        &[],
        units,
        decimals,
    )
    .map_err(|e| LedgerError::Instruction(e.to_string()))?;
    instructions.push(transfer);

    Ok(TransferPlan {
        instructions,
        creates_recipient_account: !recipient_account_exists,
    })
}

/// Map a failed submission onto the typed variants callers branch on.
///
/// Only failures attributable to a specific instruction are reclassified.
/// On the create-account instruction, `IllegalOwner` (the associated token
/// program finding an initialized account) and the system program's custom
/// error 0 both mean the account is already in use. The token program's
/// `InsufficientFunds` on the transfer means the balance check lost a race.
pub fn classify_submission_error(transaction: &Transaction, error: &TransactionError) -> LedgerError {
    if let TransactionError::InstructionError(index, ref ix_error) = *error {
        let program = instruction_program(transaction, index);

        match (program, ix_error) {
            (
                Some(p),
                InstructionError::IllegalOwner | InstructionError::Custom(ACCOUNT_ALREADY_IN_USE),
            ) if p == spl_associated_token_account::id() => {
                return LedgerError::AccountAlreadyInUse;
            }
            (Some(p), InstructionError::Custom(code))
                if p == spl_token::id()
                    && *code == spl_token::error::TokenError::InsufficientFunds as u32 =>
            {
                return LedgerError::InsufficientFunds;
            }
            _ => {}
        }
    }

    LedgerError::TransactionFailed(error.to_string())
}

fn instruction_program(transaction: &Transaction, index: u8) -> Option<Pubkey> {
    let message = &transaction.message;
    message
        .instructions
        .get(usize::from(index))
        .and_then(|ix| message.account_keys.get(usize::from(ix.program_id_index)))
        .copied()
}

#[cfg(test)]
mod tests {
    use super::*;
    use solana_sdk::hash::Hash;
    use solana_sdk::signature::{Keypair, Signer};

    fn plan(exists: bool) -> (Keypair, TransferPlan) {
        let sender = Keypair::new();
        let plan = build_transfer_plan(
            &sender.pubkey(),
            &Pubkey::new_unique(),
            &Pubkey::new_unique(),
            scale_amount(25_000, 9).unwrap(),
            9,
            exists,
        )
        .unwrap();
        (sender, plan)
    }

    fn signed(sender: &Keypair, plan: &TransferPlan) -> Transaction {
        Transaction::new_signed_with_payer(
            &plan.instructions,
            Some(&sender.pubkey()),
            &[sender],
            Hash::default(),
        )
    }

    #[test]
    fn test_scale_amount() {
        assert_eq!(scale_amount(25_000, 9), Some(25_000_000_000_000));
        assert_eq!(scale_amount(25_000, 6), Some(25_000_000_000));
        assert_eq!(scale_amount(1, 0), Some(1));
        assert_eq!(scale_amount(25_000, 18), None);
        assert_eq!(scale_amount(1, 20), None);
    }

    #[test]
    fn test_plan_with_account_creation() {
        let (_, plan) = plan(false);
        assert!(plan.creates_recipient_account);
        assert_eq!(plan.instructions.len(), 2);
        assert_eq!(plan.instructions[0].program_id, spl_associated_token_account::id());
        assert_eq!(plan.instructions[1].program_id, spl_token::id());
    }

    #[test]
    fn test_plan_transfer_only() {
        let (_, plan) = plan(true);
        assert!(!plan.creates_recipient_account);
        assert_eq!(plan.instructions.len(), 1);
        assert_eq!(plan.instructions[0].program_id, spl_token::id());
    }

    #[test]
    fn test_already_in_use_on_create() {
        let (sender, plan) = plan(false);
        let tx = signed(&sender, &plan);
        let err = TransactionError::InstructionError(0, InstructionError::Custom(0));
        assert_eq!(classify_submission_error(&tx, &err), LedgerError::AccountAlreadyInUse);
    }

    #[test]
    fn test_illegal_owner_on_create_is_already_in_use() {
        let (sender, plan) = plan(false);
        let tx = signed(&sender, &plan);
        let err = TransactionError::InstructionError(0, InstructionError::IllegalOwner);
        assert_eq!(classify_submission_error(&tx, &err), LedgerError::AccountAlreadyInUse);
    }

    #[test]
    fn test_illegal_owner_on_transfer_is_not_already_in_use() {
        let (sender, plan) = plan(false);
        let tx = signed(&sender, &plan);
        let err = TransactionError::InstructionError(1, InstructionError::IllegalOwner);
        assert!(matches!(
            classify_submission_error(&tx, &err),
            LedgerError::TransactionFailed(_)
        ));
    }

    #[test]
    fn test_transfer_is_checked_against_mint() {
        let (_, plan) = plan(true);
        let ix = &plan.instructions[0];
        match spl_token::instruction::TokenInstruction::unpack(&ix.data).unwrap() {
            spl_token::instruction::TokenInstruction::TransferChecked { amount, decimals } => {
                assert_eq!(amount, 25_000_000_000_000);
                assert_eq!(decimals, 9);
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
        // source, mint, destination, authority
        assert_eq!(ix.accounts.len(), 4);
    }

    #[test]
    fn test_insufficient_funds_on_transfer() {
        let (sender, plan) = plan(false);
        let tx = signed(&sender, &plan);
        let err = TransactionError::InstructionError(1, InstructionError::Custom(1));
        assert_eq!(classify_submission_error(&tx, &err), LedgerError::InsufficientFunds);
    }

    #[test]
    fn test_custom_zero_on_transfer_is_not_already_in_use() {
        let (sender, plan) = plan(true);
        let tx = signed(&sender, &plan);
        let err = TransactionError::InstructionError(0, InstructionError::Custom(0));
        assert!(matches!(
            classify_submission_error(&tx, &err),
            LedgerError::TransactionFailed(_)
        ));
    }

    #[test]
    fn test_unrelated_error_passes_through() {
        let (sender, plan) = plan(true);
        let tx = signed(&sender, &plan);
        let err = TransactionError::BlockhashNotFound;
        assert!(matches!(
            classify_submission_error(&tx, &err),
            LedgerError::TransactionFailed(_)
        ));
    }
}
