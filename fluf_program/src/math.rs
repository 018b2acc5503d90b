//! Share accounting and flash-loan fee arithmetic.
//!
//! Every conversion is computed in `u128` and rounded in the pool's favour:
//! deposits and withdrawals round down, fees round up.

use crate::constants::BPS_DENOMINATOR;
use crate::error::FlufError;

/// Shares minted for a deposit of `amount` base units.
///
/// An empty pool (no shares outstanding, or nothing left in the base vault to
/// price them against) mints one share per base unit. Otherwise the depositor
/// receives `floor(amount * share_supply / vault_balance)`.
pub fn shares_for_deposit(
    amount: u64,
    vault_balance: u64,
    share_supply: u64,
) -> Result<u64, FlufError> {
    if share_supply == 0 || vault_balance == 0 {
        return Ok(amount);
    }
    let shares = (amount as u128)
        .checked_mul(share_supply as u128)
        .ok_or(FlufError::ArithmeticOverflow)?
        / vault_balance as u128;
    u64::try_from(shares).map_err(|_| FlufError::ArithmeticOverflow)
}

/// Base units paid out for redeeming `share_balance` shares:
/// `floor(share_balance * vault_balance / share_supply)`.
pub fn payout_for_withdraw(
    share_balance: u64,
    vault_balance: u64,
    share_supply: u64,
) -> Result<u64, FlufError> {
    if share_supply == 0 {
        return Ok(0);
    }
    if share_balance > share_supply {
        return Err(FlufError::InsufficientFunds);
    }
    let payout = (share_balance as u128)
        .checked_mul(vault_balance as u128)
        .ok_or(FlufError::ArithmeticOverflow)?
        / share_supply as u128;
    // share_balance <= share_supply, so payout <= vault_balance
    u64::try_from(payout).map_err(|_| FlufError::ArithmeticOverflow)
}

/// Flash-loan fee for borrowing `amount` shares at `fee_bps`, rounded up.
pub fn flash_loan_fee(amount: u64, fee_bps: u16) -> Result<u64, FlufError> {
    let numerator = (amount as u128)
        .checked_mul(fee_bps as u128)
        .ok_or(FlufError::ArithmeticOverflow)?;
    let denominator = BPS_DENOMINATOR as u128;
    let fee = numerator
        .checked_add(denominator - 1)
        .ok_or(FlufError::ArithmeticOverflow)?
        / denominator;
    u64::try_from(fee).map_err(|_| FlufError::ArithmeticOverflow)
}

/// Balance the share vault must reach after the borrower callback.
pub fn required_repayment(pre_balance: u64, amount: u64, fee: u64) -> Result<u64, FlufError> {
    pre_balance
        .checked_add(amount)
        .and_then(|v| v.checked_add(fee))
        .ok_or(FlufError::ArithmeticOverflow)
}
