use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::pubkey::Pubkey;

/// Singleton record created by `Initialize`.
///
/// The signer of `Initialize` becomes the administrator for the life of the
/// deployment; only the administrator can sweep pool fee vaults.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct ProgramState {
    /// Identity allowed to withdraw accumulated fees.
    pub administrator: Pubkey,
    /// The bump seed used to derive the program state PDA.
    pub bump: u8,
}

impl ProgramState {
    /// Serialized size in bytes.
    pub const LEN: usize = 32 + 1;
}

/// Per-base-mint pool record.
///
/// It stores references to:
/// - The base mint accepted as deposits and the pool's share mint.
/// - The base vault holding deposits.
/// - The share vault that receives flash-loan repayments.
/// - The fee vault accumulating flash-loan fees.
///
/// None of these change after creation; only the balances held by the
/// referenced token accounts do.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct Pool {
    /// Mint of the asset deposited into the pool.
    pub base_mint: Pubkey,
    /// Mint of the pool shares. Authority: the pool PDA.
    pub share_mint: Pubkey,
    /// Token account holding deposited base asset.
    pub base_vault: Pubkey,
    /// Share token account that flash-loan borrowers repay into.
    pub share_vault: Pubkey,
    /// Share token account accumulating flash-loan fees.
    pub fee_vault: Pubkey,
    /// Decimals of the share mint, equal to the base mint's.
    pub share_decimals: u8,
    /// Flash-loan fee in basis points of the borrowed amount.
    pub flash_fee_bps: u16,
    /// The bump seed used to derive the pool PDA.
    pub bump: u8,
}

impl Pool {
    /// Serialized size in bytes.
    pub const LEN: usize = 32 * 5 + 1 + 2 + 1;
}
