#![allow(clippy::doc_lazy_continuation)]
use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    instruction::{AccountMeta, Instruction},
    program_error::ProgramError,
    pubkey::Pubkey,
    system_program, sysvar,
};

use crate::pda::{find_program_state_address, PoolAddresses};

/// Defines the instructions available in the Fluf program.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub enum FlufInstruction {
    /// Creates the program state and records the signer as administrator.
    ///
    /// Accounts (expected):
    /// 0. [signer, writable] administrator: Pays for and owns the deployment
    /// 1. [writable] program state PDA: `["program_state"]`
    /// 2. [read]   system_program: Solana System Program
    /// 3. [read]   rent sysvar: Solana Rent Sysvar
    Initialize,

    /// Creates the pool for a base mint together with its share mint and vaults.
    ///
    /// Accounts (expected):
    /// 0. [signer, writable] payer: Account funding the new pool
    /// 1. [writable] pool PDA: `["pool", base_mint]`
    /// 2. [read]   base mint: Mint accepted as deposits
    /// 3. [writable] base vault PDA: `["pool_account", base_mint]`
    /// 4. [writable] share mint PDA: `["fluf_mint", base_mint]`
    /// 5. [writable] share vault PDA: `["pool_fluf_account", base_mint]`
    /// 6. [writable] fee vault PDA: `["fee_account", base_mint]`
    /// 7. [read]   system_program: Solana System Program
    /// 8. [read]   token_program: SPL Token Program
    /// 9. [read]   rent sysvar: Solana Rent Sysvar
    CreatePool {
        /// Share mint decimals; must equal the base mint's
        decimals: u8,
        /// Flash-loan fee in basis points
        flash_fee_bps: u16,
    },

    /// Deposits base asset and mints shares at the current rate.
    ///
    /// Accounts:
    /// 0. [signer] user: The depositor
    /// 1. [read]   pool: The pool record
    /// 2. [read]   base mint
    /// 3. [writable] base vault
    /// 4. [writable] user base: User's source base token account
    /// 5. [writable] share mint
    /// 6. [writable] user share: User's destination share token account
    /// 7. [read]   token_program: SPL Token Program
    Deposit {
        /// Amount of base asset to deposit
        amount: u64,
    },

    /// Burns the caller's whole share balance and pays out base asset.
    ///
    /// Accounts:
    /// 0. [signer] user: The share holder
    /// 1. [read]   pool: The pool record
    /// 2. [read]   base mint
    /// 3. [writable] base vault
    /// 4. [writable] user base: User's destination base token account
    /// 5. [writable] share mint
    /// 6. [writable] user share: User's share token account (burned from)
    /// 7. [read]   token_program: SPL Token Program
    Withdraw,

    /// Lends shares to a borrower program and requires repayment plus fee
    /// before the instruction returns.
    ///
    /// Accounts:
    /// 0. [signer] user: Initiator, forwarded to the borrower as signer
    /// 1. [read]   pool: The pool record
    /// 2. [read]   base mint
    /// 3. [read]   base vault
    /// 4. [writable] share mint
    /// 5. [writable] share vault: Repayment target
    /// 6. [writable] fee vault
    /// 7. [writable] borrower share: Receives the loan
    /// 8. [writable] user share: Forwarded to the borrower
    /// 9. [read]   token_program: SPL Token Program
    /// 10.[read]   borrower program: Executable implementing `BorrowerInstruction`
    /// 11..        remaining accounts, forwarded verbatim to the borrower
    LendAndCall {
        /// Amount of shares to lend
        amount: u64,
    },

    /// Sweeps a pool's fee vault. Administrator only.
    ///
    /// Accounts:
    /// 0. [signer] administrator
    /// 1. [read]   program state PDA
    /// 2. [read]   pool
    /// 3. [read]   base mint
    /// 4. [writable] fee vault
    /// 5. [writable] collector: Share token account receiving the fees
    /// 6. [read]   token_program: SPL Token Program
    WithdrawFees,
}

/// Instruction a borrower program must accept from `LendAndCall`.
///
/// Accounts passed by the lender:
/// 0. [signer] user
/// 1. [writable] borrower share: Holds the loan
/// 2. [writable] share vault: Where principal plus fee must be returned
/// 3. [writable] user share
/// 4. [read]   share mint
/// 5. [read]   token_program
/// 6..         remaining accounts of the `LendAndCall` instruction
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub enum BorrowerInstruction {
    HandleBorrow {
        /// Principal lent
        amount: u64,
        /// Fee owed on top of the principal
        fee: u64,
    },
}

/// Creates an `Initialize` instruction.
pub fn initialize(program_id: &Pubkey, administrator: &Pubkey) -> Result<Instruction, ProgramError> {
    let (program_state, _) = find_program_state_address(program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*administrator, true),
            AccountMeta::new(program_state, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: FlufInstruction::Initialize.try_to_vec()?,
    })
}

/// Creates a `CreatePool` instruction.
pub fn create_pool(
    program_id: &Pubkey,
    payer: &Pubkey,
    base_mint: &Pubkey,
    decimals: u8,
    flash_fee_bps: u16,
) -> Result<Instruction, ProgramError> {
    let addrs = PoolAddresses::derive(program_id, base_mint);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new(*payer, true),
            AccountMeta::new(addrs.pool, false),
            AccountMeta::new_readonly(*base_mint, false),
            AccountMeta::new(addrs.base_vault, false),
            AccountMeta::new(addrs.share_mint, false),
            AccountMeta::new(addrs.share_vault, false),
            AccountMeta::new(addrs.fee_vault, false),
            AccountMeta::new_readonly(system_program::id(), false),
            AccountMeta::new_readonly(spl_token::id(), false),
            AccountMeta::new_readonly(sysvar::rent::id(), false),
        ],
        data: FlufInstruction::CreatePool {
            decimals,
            flash_fee_bps,
        }
        .try_to_vec()?,
    })
}

/// Creates a `Deposit` instruction.
pub fn deposit(
    program_id: &Pubkey,
    user: &Pubkey,
    base_mint: &Pubkey,
    user_base: &Pubkey,
    user_share: &Pubkey,
    amount: u64,
) -> Result<Instruction, ProgramError> {
    let addrs = PoolAddresses::derive(program_id, base_mint);
    Ok(Instruction {
        program_id: *program_id,
        accounts: share_exchange_accounts(&addrs, user, base_mint, user_base, user_share),
        data: FlufInstruction::Deposit { amount }.try_to_vec()?,
    })
}

/// Creates a `Withdraw` instruction.
pub fn withdraw(
    program_id: &Pubkey,
    user: &Pubkey,
    base_mint: &Pubkey,
    user_base: &Pubkey,
    user_share: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let addrs = PoolAddresses::derive(program_id, base_mint);
    Ok(Instruction {
        program_id: *program_id,
        accounts: share_exchange_accounts(&addrs, user, base_mint, user_base, user_share),
        data: FlufInstruction::Withdraw.try_to_vec()?,
    })
}

fn share_exchange_accounts(
    addrs: &PoolAddresses,
    user: &Pubkey,
    base_mint: &Pubkey,
    user_base: &Pubkey,
    user_share: &Pubkey,
) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(*user, true),
        AccountMeta::new_readonly(addrs.pool, false),
        AccountMeta::new_readonly(*base_mint, false),
        AccountMeta::new(addrs.base_vault, false),
        AccountMeta::new(*user_base, false),
        AccountMeta::new(addrs.share_mint, false),
        AccountMeta::new(*user_share, false),
        AccountMeta::new_readonly(spl_token::id(), false),
    ]
}

/// Creates a `LendAndCall` instruction.
///
/// `borrower_accounts` are appended after the fixed accounts and handed to
/// the borrower program unchanged.
#[allow(clippy::too_many_arguments)]
pub fn lend_and_call(
    program_id: &Pubkey,
    user: &Pubkey,
    base_mint: &Pubkey,
    borrower_share: &Pubkey,
    user_share: &Pubkey,
    borrower_program: &Pubkey,
    amount: u64,
    borrower_accounts: Vec<AccountMeta>,
) -> Result<Instruction, ProgramError> {
    let addrs = PoolAddresses::derive(program_id, base_mint);
    let mut accounts = vec![
        AccountMeta::new_readonly(*user, true),
        AccountMeta::new_readonly(addrs.pool, false),
        AccountMeta::new_readonly(*base_mint, false),
        AccountMeta::new_readonly(addrs.base_vault, false),
        AccountMeta::new(addrs.share_mint, false),
        AccountMeta::new(addrs.share_vault, false),
        AccountMeta::new(addrs.fee_vault, false),
        AccountMeta::new(*borrower_share, false),
        AccountMeta::new(*user_share, false),
        AccountMeta::new_readonly(spl_token::id(), false),
        AccountMeta::new_readonly(*borrower_program, false),
    ];
    accounts.extend(borrower_accounts);
    Ok(Instruction {
        program_id: *program_id,
        accounts,
        data: FlufInstruction::LendAndCall { amount }.try_to_vec()?,
    })
}

/// Creates a `WithdrawFees` instruction.
pub fn withdraw_fees(
    program_id: &Pubkey,
    administrator: &Pubkey,
    base_mint: &Pubkey,
    collector: &Pubkey,
) -> Result<Instruction, ProgramError> {
    let addrs = PoolAddresses::derive(program_id, base_mint);
    let (program_state, _) = find_program_state_address(program_id);
    Ok(Instruction {
        program_id: *program_id,
        accounts: vec![
            AccountMeta::new_readonly(*administrator, true),
            AccountMeta::new_readonly(program_state, false),
            AccountMeta::new_readonly(addrs.pool, false),
            AccountMeta::new_readonly(*base_mint, false),
            AccountMeta::new(addrs.fee_vault, false),
            AccountMeta::new(*collector, false),
            AccountMeta::new_readonly(spl_token::id(), false),
        ],
        data: FlufInstruction::WithdrawFees.try_to_vec()?,
    })
}
