use crate::constants::{
    BASE_VAULT_SEED, FEE_VAULT_SEED, POOL_SEED, PROGRAM_STATE_SEED, SHARE_MINT_SEED,
    SHARE_VAULT_SEED,
};
use crate::error::FlufError;
use solana_program::{
    account_info::AccountInfo, bpf_loader, bpf_loader_deprecated, bpf_loader_upgradeable, msg,
    program_error::ProgramError, program_option::COption, program_pack::Pack,
    pubkey::Pubkey,
};
use solana_sdk_ids::native_loader;
use spl_token::{
    state::{Account as TokenAccount, AccountState, Mint},
    ID as TOKEN_PROGRAM_ID,
};

/// Get the program state PDA and bump seed
pub fn find_program_state_address(program_id: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[PROGRAM_STATE_SEED], program_id)
}

/// Get the pool PDA and bump seed for a base mint
pub fn find_pool_address(program_id: &Pubkey, base_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[POOL_SEED, base_mint.as_ref()], program_id)
}

/// Get the base vault PDA and bump seed for a base mint
pub fn find_base_vault_address(program_id: &Pubkey, base_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[BASE_VAULT_SEED, base_mint.as_ref()], program_id)
}

/// Get the share mint PDA and bump seed for a base mint
pub fn find_share_mint_address(program_id: &Pubkey, base_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SHARE_MINT_SEED, base_mint.as_ref()], program_id)
}

/// Get the share vault PDA and bump seed for a base mint
pub fn find_share_vault_address(program_id: &Pubkey, base_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[SHARE_VAULT_SEED, base_mint.as_ref()], program_id)
}

/// Get the fee vault PDA and bump seed for a base mint
pub fn find_fee_vault_address(program_id: &Pubkey, base_mint: &Pubkey) -> (Pubkey, u8) {
    Pubkey::find_program_address(&[FEE_VAULT_SEED, base_mint.as_ref()], program_id)
}

/// Get the pool seeds with bump for signing
pub fn get_pool_seeds<'a>(base_mint: &'a Pubkey, bump_seed: &'a [u8]) -> [&'a [u8]; 3] {
    [POOL_SEED, base_mint.as_ref(), bump_seed]
}

/// Every address owned by the pool of one base mint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolAddresses {
    pub pool: Pubkey,
    pub base_vault: Pubkey,
    pub share_mint: Pubkey,
    pub share_vault: Pubkey,
    pub fee_vault: Pubkey,
}

impl PoolAddresses {
    pub fn derive(program_id: &Pubkey, base_mint: &Pubkey) -> Self {
        Self {
            pool: find_pool_address(program_id, base_mint).0,
            base_vault: find_base_vault_address(program_id, base_mint).0,
            share_mint: find_share_mint_address(program_id, base_mint).0,
            share_vault: find_share_vault_address(program_id, base_mint).0,
            fee_vault: find_fee_vault_address(program_id, base_mint).0,
        }
    }
}

/// Checks that `account_info` sits at the address derived from `seed` and the
/// base mint, returning the bump.
pub fn validate_vault_address(
    account_info: &AccountInfo,
    program_id: &Pubkey,
    seed: &[u8],
    base_mint: &Pubkey,
) -> Result<u8, ProgramError> {
    let (expected, bump) = Pubkey::find_program_address(&[seed, base_mint.as_ref()], program_id);
    if account_info.key != &expected {
        msg!(
            "Vault PDA Error: Expected {}, got {}",
            expected,
            account_info.key
        );
        return Err(FlufError::IncorrectVaultPDA.into());
    }
    Ok(bump)
}

/// Validates a token account held by the pool.
/// Checks: address matches the pool record, Token Program owner, Initialized,
/// Internal Owner (Pool PDA), Mint.
pub fn validate_pool_vault(
    vault_info: &AccountInfo,
    expected_key: &Pubkey,
    pool_pda: &Pubkey,
    expected_mint: &Pubkey,
) -> Result<TokenAccount, ProgramError> {
    if vault_info.key != expected_key {
        msg!(
            "Vault Error: Expected {}, got {}",
            expected_key,
            vault_info.key
        );
        return Err(FlufError::VaultMismatch.into());
    }
    validate_token_account_basic(vault_info, Some(pool_pda), expected_mint)
}

/// Validates basic properties of any SPL Token account.
/// Checks: Token Program owner, Initialized, Internal Owner (when given), Mint.
pub fn validate_token_account_basic(
    account_info: &AccountInfo,
    expected_owner: Option<&Pubkey>,
    expected_mint: &Pubkey,
) -> Result<TokenAccount, ProgramError> {
    if account_info.owner != &TOKEN_PROGRAM_ID {
        msg!(
            "Token Account Error: Account {} owned by {}, expected {}",
            account_info.key,
            account_info.owner,
            TOKEN_PROGRAM_ID
        );
        return Err(FlufError::InvalidAccountData.into());
    }

    let token_account_data = TokenAccount::unpack(&account_info.data.borrow())
        .map_err(|_| FlufError::UnpackAccountFailed)?;

    if token_account_data.state != AccountState::Initialized {
        msg!(
            "Token Account Error: Account {} is not initialized",
            account_info.key
        );
        return Err(FlufError::InvalidAccountData.into());
    }

    if let Some(expected_owner) = expected_owner {
        if &token_account_data.owner != expected_owner {
            msg!(
                "Token Account Error: Account {} owner {} does not match expected owner {}",
                account_info.key,
                token_account_data.owner,
                expected_owner
            );
            return Err(FlufError::InvalidAccountOwner.into());
        }
    }

    if &token_account_data.mint != expected_mint {
        msg!(
            "Token Account Error: Account {} mint {} does not match expected mint {}",
            account_info.key,
            token_account_data.mint,
            expected_mint
        );
        return Err(FlufError::TokenMintMismatch.into());
    }

    Ok(token_account_data)
}

/// Validates basic properties of an SPL Mint account.
/// Checks: Token Program owner, Initialized.
pub fn validate_mint_basic(mint_info: &AccountInfo) -> Result<Mint, ProgramError> {
    if mint_info.owner != &TOKEN_PROGRAM_ID {
        msg!(
            "Mint Error: Account {} owned by {}, expected {}",
            mint_info.key,
            mint_info.owner,
            TOKEN_PROGRAM_ID
        );
        return Err(FlufError::InvalidAccountData.into());
    }

    let mint_data =
        Mint::unpack(&mint_info.data.borrow()).map_err(|_| FlufError::UnpackAccountFailed)?;

    if !mint_data.is_initialized {
        msg!("Mint Error: Account {} is not initialized", mint_info.key);
        return Err(FlufError::InvalidAccountData.into());
    }

    Ok(mint_data)
}

/// Validates the pool's share mint: key from the pool record, SPL mint,
/// minted by the pool PDA, no freeze authority.
pub fn validate_share_mint(
    mint_info: &AccountInfo,
    expected_key: &Pubkey,
    pool_pda: &Pubkey,
) -> Result<Mint, ProgramError> {
    if mint_info.key != expected_key {
        msg!(
            "Share Mint Error: Expected {}, got {}",
            expected_key,
            mint_info.key
        );
        return Err(FlufError::ShareMintMismatch.into());
    }
    let mint_data = validate_mint_basic(mint_info)?;
    if mint_data.mint_authority != COption::Some(*pool_pda) || mint_data.freeze_authority.is_some()
    {
        msg!(
            "Share Mint Error: authority {:?} / freeze {:?}, expected {}",
            mint_data.mint_authority,
            mint_data.freeze_authority,
            pool_pda
        );
        return Err(FlufError::InvalidMintAuthority.into());
    }
    Ok(mint_data)
}

/// Validates that the provided account's key matches the expected program ID.
pub fn validate_program_id(
    account_info: &AccountInfo,
    expected_program_id: &Pubkey,
) -> Result<(), ProgramError> {
    if account_info.key != expected_program_id {
        msg!(
            "Program ID Error: Expected {}, got {}",
            expected_program_id,
            account_info.key
        );
        Err(FlufError::IncorrectProgramId.into())
    } else {
        Ok(())
    }
}

/// Validates that the provided account is an executable program.
///
/// Builtins loaded by the native loader are accepted alongside the BPF
/// loaders so that in-process test banks can host the borrower.
pub fn validate_executable(account_info: &AccountInfo) -> Result<(), ProgramError> {
    if !account_info.executable {
        msg!("Exec Error: Account {} is not executable", account_info.key);
        return Err(FlufError::AccountNotExecutable.into());
    }

    let loader = account_info.owner;
    if loader != &bpf_loader::id()
        && loader != &bpf_loader_deprecated::id()
        && loader != &bpf_loader_upgradeable::id()
        && loader != &native_loader::id()
    {
        msg!(
            "Exec Error: Account {} owned by {}, expected a program loader",
            account_info.key,
            account_info.owner
        );
        return Err(FlufError::InvalidAccountData.into());
    }

    Ok(())
}
