use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::find_borrower_account_address;

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub enum SampleInstruction {
    /// Flash-loan callback; same encoding as
    /// `fluf_program::instruction::BorrowerInstruction::HandleBorrow`.
    ///
    /// Accounts:
    /// 0. [signer] user
    /// 1. [writable] borrower share: This program's PDA token account
    /// 2. [writable] share vault: Lender's repayment account
    /// 3. [writable] user share: Receives what is left after repaying
    /// 4. [read]   share mint
    /// 5. [read]   token_program
    HandleBorrow { amount: u64, fee: u64 },

    /// Creates the borrower share account for a share mint.
    ///
    /// Accounts:
    /// 0. [signer, writable] payer
    /// 1. [writable] borrower share PDA: `["borrower_account", share_mint]`
    /// 2. [read]   share mint
    /// 3. [read]   system_program
    /// 4. [read]   token_program
    /// 5. [read]   rent sysvar
    CreateAccounts,
}

/// Creates a `CreateAccounts` instruction.
pub fn create_accounts(
    program_id: &Pubkey,
    payer: &Pubkey,
    share_mint: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let (borrower_share, _) = find_borrower_account_address(program_id, share_mint);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(borrower_share, false),
            AccountMeta::new_readonly(*share_mint, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: SampleInstruction::CreateAccounts.try_to_vec()?,
    })
}
