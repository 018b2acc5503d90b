use num_derive::FromPrimitive;
use solana_program::program_error::ProgramError;
use thiserror::Error;

/// Custom errors that can be returned by the Fluf program.
///
/// The discriminant is the `ProgramError::Custom` code seen by clients, so
/// variants must only ever be appended.
#[derive(Error, Debug, Copy, Clone, PartialEq, Eq, FromPrimitive)]
pub enum FlufError {
    /// The pool for this base mint has already been created.
    #[error("Pool already exists")]
    AlreadyExists,

    /// The program state has already been initialized.
    #[error("Program already initialized")]
    AlreadyInitialized,

    /// The base asset is not an initialized SPL mint.
    #[error("Invalid base asset")]
    InvalidAsset,

    /// Zero amount provided, or an amount too small to mint a share.
    #[error("Zero amount")]
    ZeroAmount,

    /// The caller holds no shares to redeem.
    #[error("Zero share balance")]
    ZeroBalance,

    /// Not enough funds to perform the operation.
    #[error("Insufficient funds")]
    InsufficientFunds,

    /// The borrower did not return the loan plus fee.
    #[error("Flash loan not repaid")]
    Unrepaid,

    /// The signer is not the program administrator.
    #[error("Unauthorized")]
    Unauthorized,

    /// Invalid instruction data passed.
    #[error("Invalid instruction data")]
    InvalidInstructionData,

    /// Missing required signature.
    #[error("Missing required signature")]
    MissingRequiredSignature,

    /// Provided program ID is incorrect
    #[error("Incorrect program ID provided")]
    IncorrectProgramId,

    /// Expected pool PDA doesn't match provided account
    #[error("Incorrect pool PDA provided")]
    IncorrectPoolPDA,

    /// A vault or share mint address doesn't match its derivation
    #[error("Incorrect vault PDA provided")]
    IncorrectVaultPDA,

    /// Expected program state PDA doesn't match provided account
    #[error("Incorrect program state PDA provided")]
    IncorrectProgramStatePDA,

    /// Pool state is not owned by this program (usually: pool not created)
    #[error("Invalid pool state owner")]
    InvalidPoolStateOwner,

    /// Vault account doesn't match the pool record
    #[error("Vault account mismatch")]
    VaultMismatch,

    /// Share mint doesn't match the pool record
    #[error("Share mint mismatch")]
    ShareMintMismatch,

    /// Token account mint doesn't match the expected mint
    #[error("Token mint mismatch")]
    TokenMintMismatch,

    /// Token account is not owned by the expected wallet or PDA
    #[error("Invalid token account owner")]
    InvalidAccountOwner,

    /// An account's data was invalid.
    #[error("Invalid account data")]
    InvalidAccountData,

    /// Failed to unpack an account.
    #[error("Failed to unpack account")]
    UnpackAccountFailed,

    /// Share mint authority is not the pool PDA, or a freeze authority is set
    #[error("Invalid mint authority")]
    InvalidMintAuthority,

    /// Provided account is not executable
    #[error("Account not executable")]
    AccountNotExecutable,

    /// Requested share decimals differ from the base mint decimals
    #[error("Decimals do not match the base mint")]
    DecimalsMismatch,

    /// Flash-loan fee rate above the allowed maximum
    #[error("Invalid fee rate")]
    InvalidFeeRate,

    /// The pool holds no base asset, so loans cannot be priced
    #[error("Empty pool")]
    EmptyPool,

    /// An arithmetic operation overflowed.
    #[error("Arithmetic overflow")]
    ArithmeticOverflow,
}

impl From<FlufError> for ProgramError {
    fn from(e: FlufError) -> Self {
        ProgramError::Custom(e as u32)
    }
}
