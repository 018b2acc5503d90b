//! Seed tags, fee limits and defaults shared by the program and its clients.

/// Seed of the singleton [`crate::state::ProgramState`] record.
pub const PROGRAM_STATE_SEED: &[u8] = b"program_state";
/// Seed of a [`crate::state::Pool`] record, followed by the base mint.
pub const POOL_SEED: &[u8] = b"pool";
/// Seed of the base-asset vault, followed by the base mint.
pub const BASE_VAULT_SEED: &[u8] = b"pool_account";
/// Seed of the share mint, followed by the base mint.
pub const SHARE_MINT_SEED: &[u8] = b"fluf_mint";
/// Seed of the share vault that receives flash-loan repayments.
pub const SHARE_VAULT_SEED: &[u8] = b"pool_fluf_account";
/// Seed of the per-pool fee vault.
pub const FEE_VAULT_SEED: &[u8] = b"fee_account";

/// Basis-point denominator for fee rates.
pub const BPS_DENOMINATOR: u64 = 10_000;
/// Flash-loan fee used by clients when none is given: 1%.
pub const DEFAULT_FLASH_FEE_BPS: u16 = 100;
/// Upper bound accepted by `CreatePool`: 10%.
pub const MAX_FLASH_FEE_BPS: u16 = 1_000;
