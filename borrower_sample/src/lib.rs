//! Reference borrower for Fluf flash loans.
//!
//! The borrower holds shares in a token account at its own PDA. On
//! `HandleBorrow` it repays as much of the loan plus fee as that account can
//! cover and forwards whatever is left to the caller.

pub mod instruction;
pub mod processor;

#[cfg(not(feature = "no-entrypoint"))]
pub mod entrypoint;

// Export crate version
pub use solana_program;

use solana_program::pubkey::Pubkey;

solana_program::declare_id!("BiBiaMTWecRB3cbz6oMfrKq3F1VKCRLCxKgS3NYLTMCK");

/// Seed of the borrower's share account, followed by the share mint.
pub const BORROWER_ACCOUNT_SEED: &[u8] = b"borrower_account";

/// Get the borrower share account PDA and bump seed for a share mint
pub fn find_borrower_account_address(program_id: &Pubkey, share_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[BORROWER_ACCOUNT_SEED, share_mint.as_ref()], program_id)
}
