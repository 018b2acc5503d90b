use borsh::BorshDeserialize;
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    msg,
    program::{invoke, invoke_signed},
    program_error::ProgramError,
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{rent::Rent, Sysvar},
};
use spl_token::state::Account as TokenAccount;

use crate::instruction::SampleInstruction;
use crate::{find_borrower_account_address, BORROWER_ACCOUNT_SEED};

pub struct Processor;
impl Processor {
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instr_data: &[u8],
    ) -> ProgramResult {
        let instruction = SampleInstruction::try_from_slice(instr_data)
            .map_err(|_| ProgramError::InvalidInstructionData)?;

        match instruction {
            SampleInstruction::HandleBorrow { amount, fee } => {
                Self::handle_borrow(program_id, accounts, amount, fee)
            }
            SampleInstruction::CreateAccounts => Self::create_accounts(program_id, accounts),
        }
    }

    pub fn handle_borrow(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
        fee: u64,
    ) -> ProgramResult {
        let acc_iter = &mut accounts.iter();
        let _user_acc = next_account_info(acc_iter)?; // 0
        let borrower_share_acc = next_account_info(acc_iter)?; // 1
        let share_vault_acc = next_account_info(acc_iter)?; // 2
        let user_share_acc = next_account_info(acc_iter)?; // 3
        let share_mint_acc = next_account_info(acc_iter)?; // 4
        let token_prog_acc = next_account_info(acc_iter)?; // 5

        if token_prog_acc.key != &spl_token::id() {
            return Err(ProgramError::IncorrectProgramId);
        }
        let (expected_pda, bump) = find_borrower_account_address(program_id, share_mint_acc.key);
        if borrower_share_acc.key != &expected_pda {
            msg!(
                "Borrower: Expected share account {}, got {}",
                expected_pda,
                borrower_share_acc.key
            );
            return Err(ProgramError::InvalidSeeds);
        }

        let balance = TokenAccount::unpack(&borrower_share_acc.data.borrow())?.amount;
        let (repay, profit) = split_repayment(balance, amount, fee)?;
        msg!(
            "Borrower: received {}, fee {}, holding {}, repaying {}",
            amount,
            fee,
            balance,
            repay
        );

        let sign_seeds: &[&[u8]] = &[BORROWER_ACCOUNT_SEED, share_mint_acc.key.as_ref(), &[bump]];

        if repay > 0 {
            invoke_signed(
                &spl_token::instruction::transfer(
                    token_prog_acc.key,
                    borrower_share_acc.key,
                    share_vault_acc.key,
                    borrower_share_acc.key,
                    &[],
                    repay,
                )?,
                &[
                    borrower_share_acc.clone(),
                    share_vault_acc.clone(),
                    token_prog_acc.clone(),
                ],
                &[sign_seeds],
            )?;
        }

        if profit > 0 {
            invoke_signed(
                &spl_token::instruction::transfer(
                    token_prog_acc.key,
                    borrower_share_acc.key,
                    user_share_acc.key,
                    borrower_share_acc.key,
                    &[],
                    profit,
                )?,
                &[
                    borrower_share_acc.clone(),
                    user_share_acc.clone(),
                    token_prog_acc.clone(),
                ],
                &[sign_seeds],
            )?;
            msg!("Borrower: forwarded {} to {}", profit, user_share_acc.key);
        }

        Ok(())
    }

    pub fn create_accounts(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        let acc_iter = &mut accounts.iter();
        let payer_acc = next_account_info(acc_iter)?; // 0
        let borrower_share_acc = next_account_info(acc_iter)?; // 1
        let share_mint_acc = next_account_info(acc_iter)?; // 2
        let system_acc = next_account_info(acc_iter)?; // 3
        let token_prog_acc = next_account_info(acc_iter)?; // 4
        let rent_acc = next_account_info(acc_iter)?; // 5

        if !payer_acc.is_signer {
            return Err(ProgramError::MissingRequiredSignature);
        }
        if token_prog_acc.key != &spl_token::id() {
            return Err(ProgramError::IncorrectProgramId);
        }
        let (expected_pda, bump) = find_borrower_account_address(program_id, share_mint_acc.key);
        if borrower_share_acc.key != &expected_pda {
            return Err(ProgramError::InvalidSeeds);
        }
        if !borrower_share_acc.data_is_empty() {
            msg!("Borrower: share account {} already exists", expected_pda);
            return Err(ProgramError::AccountAlreadyInitialized);
        }
        let rent = Rent::from_account_info(rent_acc)?;

        invoke_signed(
            &system_instruction::create_account(
                payer_acc.key,
                borrower_share_acc.key,
                rent.minimum_balance(TokenAccount::LEN),
                TokenAccount::LEN as u64,
                token_prog_acc.key,
            ),
            &[
                payer_acc.clone(),
                borrower_share_acc.clone(),
                system_acc.clone(),
            ],
            &[&[BORROWER_ACCOUNT_SEED, share_mint_acc.key.as_ref(), &[bump]]],
        )?;
        invoke(
            &spl_token::instruction::initialize_account3(
                token_prog_acc.key,
                borrower_share_acc.key,
                share_mint_acc.key,
                borrower_share_acc.key,
            )?,
            &[
                borrower_share_acc.clone(),
                share_mint_acc.clone(),
                token_prog_acc.clone(),
            ],
        )?;
        msg!("Borrower: created share account {}", expected_pda);

        Ok(())
    }
}

/// Splits the borrower's holding into what goes back to the lender (at most
/// `amount + fee`) and what is left over for the caller.
pub fn split_repayment(balance: u64, amount: u64, fee: u64) -> Result<(u64, u64), ProgramError> {
    let due = amount
        .checked_add(fee)
        .ok_or(ProgramError::ArithmeticOverflow)?;
    let repay = balance.min(due);
    Ok((repay, balance - repay))
}
