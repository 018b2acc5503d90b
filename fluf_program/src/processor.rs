use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{
    account_info::{next_account_info, AccountInfo},
    entrypoint::ProgramResult,
    instruction::{AccountMeta, Instruction},
    msg,
    program::{invoke, invoke_signed},
    program_pack::Pack,
    pubkey::Pubkey,
    system_instruction,
    sysvar::{rent::Rent, Sysvar},
};
use spl_token::state::{Account as TokenAccount, Mint};

use crate::constants::{
    BASE_VAULT_SEED, FEE_VAULT_SEED, MAX_FLASH_FEE_BPS, POOL_SEED, PROGRAM_STATE_SEED,
    SHARE_MINT_SEED, SHARE_VAULT_SEED,
};
use crate::error::FlufError;
use crate::instruction::{BorrowerInstruction, FlufInstruction};
use crate::math::{flash_loan_fee, payout_for_withdraw, required_repayment, shares_for_deposit};
use crate::pda::{
    find_pool_address, find_program_state_address, get_pool_seeds, validate_executable,
    validate_mint_basic, validate_pool_vault, validate_program_id, validate_share_mint,
    validate_token_account_basic, validate_vault_address,
};
use crate::state::{Pool, ProgramState};

/// Processes instructions for the Fluf program.
pub struct Processor;
impl Processor {
    /// Main processing function dispatching to specific instruction handlers.
    pub fn process(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        instr_data: &[u8],
    ) -> ProgramResult {
        let instruction = FlufInstruction::try_from_slice(instr_data)
            .map_err(|_| FlufError::InvalidInstructionData)?;

        match instruction {
            FlufInstruction::Initialize => Self::process_initialize(program_id, accounts),
            FlufInstruction::CreatePool {
                decimals,
                flash_fee_bps,
            } => Self::process_create_pool(program_id, accounts, decimals, flash_fee_bps),
            FlufInstruction::Deposit { amount } => {
                Self::process_deposit(program_id, accounts, amount)
            }
            FlufInstruction::Withdraw => Self::process_withdraw(program_id, accounts),
            FlufInstruction::LendAndCall { amount } => {
                Self::process_lend_and_call(program_id, accounts, amount)
            }
            FlufInstruction::WithdrawFees => Self::process_withdraw_fees(program_id, accounts),
        }
    }

    fn process_initialize(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        msg!("Fluf: process_initialize entry");
        let acc_iter = &mut accounts.iter();
        let admin_acc = next_account_info(acc_iter)?; // 0
        let state_acc = next_account_info(acc_iter)?; // 1
        let system_acc = next_account_info(acc_iter)?; // 2
        let rent_acc = next_account_info(acc_iter)?; // 3

        if !admin_acc.is_signer {
            msg!("Administrator did not sign");
            return Err(FlufError::MissingRequiredSignature.into());
        }
        validate_program_id(system_acc, &solana_program::system_program::id())?;
        validate_program_id(rent_acc, &solana_program::sysvar::rent::id())?;
        let rent = Rent::from_account_info(rent_acc)?;

        let (expected_state_pda, bump) = find_program_state_address(program_id);
        if &expected_state_pda != state_acc.key {
            msg!(
                "Fluf ERROR: Expected program state pda {}, got {}",
                expected_state_pda,
                state_acc.key
            );
            return Err(FlufError::IncorrectProgramStatePDA.into());
        }
        if !state_acc.data_is_empty() {
            msg!("Program state {} already initialized", state_acc.key);
            return Err(FlufError::AlreadyInitialized.into());
        }

        let state = ProgramState {
            administrator: *admin_acc.key,
            bump,
        };
        let state_bytes = state.try_to_vec()?;
        create_pda_account(
            admin_acc,
            state_acc,
            system_acc,
            &rent,
            state_bytes.len(),
            program_id,
            &[PROGRAM_STATE_SEED, &[bump]],
        )?;
        state_acc.data.borrow_mut().copy_from_slice(&state_bytes);
        msg!("Fluf: initialized, administrator {}", admin_acc.key);

        Ok(())
    }

    fn process_create_pool(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        decimals: u8,
        flash_fee_bps: u16,
    ) -> ProgramResult {
        msg!("Fluf: process_create_pool entry");
        let acc_iter = &mut accounts.iter();
        let payer_acc = next_account_info(acc_iter)?; // 0
        let pool_acc = next_account_info(acc_iter)?; // 1
        let base_mint_acc = next_account_info(acc_iter)?; // 2
        let base_vault_acc = next_account_info(acc_iter)?; // 3
        let share_mint_acc = next_account_info(acc_iter)?; // 4
        let share_vault_acc = next_account_info(acc_iter)?; // 5
        let fee_vault_acc = next_account_info(acc_iter)?; // 6
        let system_acc = next_account_info(acc_iter)?; // 7
        let token_prog_acc = next_account_info(acc_iter)?; // 8
        let rent_acc = next_account_info(acc_iter)?; // 9

        // --- Initial Validations ---
        if !payer_acc.is_signer {
            msg!("Payer did not sign");
            return Err(FlufError::MissingRequiredSignature.into());
        }
        validate_program_id(system_acc, &solana_program::system_program::id())?;
        validate_program_id(token_prog_acc, &spl_token::id())?;
        validate_program_id(rent_acc, &solana_program::sysvar::rent::id())?;
        let rent = Rent::from_account_info(rent_acc)?;

        // --- PDA Derivation & Validation ---
        let base_mint = base_mint_acc.key;
        let (expected_pool_pda, pool_bump) = find_pool_address(program_id, base_mint);
        if &expected_pool_pda != pool_acc.key {
            msg!(
                "Fluf ERROR: Expected pool pda {}, got {}",
                expected_pool_pda,
                pool_acc.key
            );
            return Err(FlufError::IncorrectPoolPDA.into());
        }
        let base_vault_bump =
            validate_vault_address(base_vault_acc, program_id, BASE_VAULT_SEED, base_mint)?;
        let share_mint_bump =
            validate_vault_address(share_mint_acc, program_id, SHARE_MINT_SEED, base_mint)?;
        let share_vault_bump =
            validate_vault_address(share_vault_acc, program_id, SHARE_VAULT_SEED, base_mint)?;
        let fee_vault_bump =
            validate_vault_address(fee_vault_acc, program_id, FEE_VAULT_SEED, base_mint)?;

        if !pool_acc.data_is_empty() {
            msg!("Pool {} for mint {} already exists", pool_acc.key, base_mint);
            return Err(FlufError::AlreadyExists.into());
        }

        // --- Base Asset & Parameters ---
        let base_mint_data = validate_mint_basic(base_mint_acc).map_err(|_| {
            msg!("Base mint {} is not an initialized SPL mint", base_mint);
            FlufError::InvalidAsset
        })?;
        if decimals != base_mint_data.decimals {
            msg!(
                "Requested decimals {} differ from base mint decimals {}",
                decimals,
                base_mint_data.decimals
            );
            return Err(FlufError::DecimalsMismatch.into());
        }
        if flash_fee_bps > MAX_FLASH_FEE_BPS {
            msg!(
                "Flash fee {} bps above maximum {}",
                flash_fee_bps,
                MAX_FLASH_FEE_BPS
            );
            return Err(FlufError::InvalidFeeRate.into());
        }
        msg!("Fluf CreatePool: All account validations passed.");

        // --- Share Mint ---
        create_pda_account(
            payer_acc,
            share_mint_acc,
            system_acc,
            &rent,
            Mint::LEN,
            &spl_token::id(),
            &[SHARE_MINT_SEED, base_mint.as_ref(), &[share_mint_bump]],
        )?;
        invoke(
            &spl_token::instruction::initialize_mint2(
                token_prog_acc.key,
                share_mint_acc.key,
                &expected_pool_pda,
                None,
                decimals,
            )?,
            &[share_mint_acc.clone(), token_prog_acc.clone()],
        )?;

        // --- Vaults ---
        let vaults = [
            (base_vault_acc, BASE_VAULT_SEED, base_vault_bump, base_mint),
            (share_vault_acc, SHARE_VAULT_SEED, share_vault_bump, share_mint_acc.key),
            (fee_vault_acc, FEE_VAULT_SEED, fee_vault_bump, share_mint_acc.key),
        ];
        for (vault_acc, seed, bump, mint) in vaults {
            create_pda_account(
                payer_acc,
                vault_acc,
                system_acc,
                &rent,
                TokenAccount::LEN,
                &spl_token::id(),
                &[seed, base_mint.as_ref(), &[bump]],
            )?;
            let mint_acc = if mint == base_mint {
                base_mint_acc
            } else {
                share_mint_acc
            };
            invoke(
                &spl_token::instruction::initialize_account3(
                    token_prog_acc.key,
                    vault_acc.key,
                    mint,
                    &expected_pool_pda,
                )?,
                &[vault_acc.clone(), mint_acc.clone(), token_prog_acc.clone()],
            )?;
        }

        // --- Pool Record ---
        let pool = Pool {
            base_mint: *base_mint,
            share_mint: *share_mint_acc.key,
            base_vault: *base_vault_acc.key,
            share_vault: *share_vault_acc.key,
            fee_vault: *fee_vault_acc.key,
            share_decimals: decimals,
            flash_fee_bps,
            bump: pool_bump,
        };
        let pool_bytes = pool.try_to_vec()?;
        create_pda_account(
            payer_acc,
            pool_acc,
            system_acc,
            &rent,
            pool_bytes.len(),
            program_id,
            &[POOL_SEED, base_mint.as_ref(), &[pool_bump]],
        )?;
        pool_acc.data.borrow_mut().copy_from_slice(&pool_bytes);
        msg!(
            "Fluf: pool {} created for mint {}, fee {} bps",
            pool_acc.key,
            base_mint,
            flash_fee_bps
        );

        Ok(())
    }

    fn process_deposit(program_id: &Pubkey, accounts: &[AccountInfo], amount: u64) -> ProgramResult {
        msg!("Fluf Deposit: Processing");
        let acc_iter = &mut accounts.iter();
        let user_acc = next_account_info(acc_iter)?; // 0
        let pool_acc = next_account_info(acc_iter)?; // 1
        let base_mint_acc = next_account_info(acc_iter)?; // 2
        let base_vault_acc = next_account_info(acc_iter)?; // 3
        let user_base_acc = next_account_info(acc_iter)?; // 4
        let share_mint_acc = next_account_info(acc_iter)?; // 5
        let user_share_acc = next_account_info(acc_iter)?; // 6
        let token_prog_acc = next_account_info(acc_iter)?; // 7

        // --- Load State & Basic Checks ---
        if !user_acc.is_signer {
            return Err(FlufError::MissingRequiredSignature.into());
        }
        if amount == 0 {
            return Err(FlufError::ZeroAmount.into());
        }
        validate_program_id(token_prog_acc, &spl_token::id())?;
        let pool = load_pool(program_id, pool_acc, base_mint_acc)?;

        // --- Account Data Validations ---
        let vault_data =
            validate_pool_vault(base_vault_acc, &pool.base_vault, pool_acc.key, &pool.base_mint)?;
        let share_mint_data = validate_share_mint(share_mint_acc, &pool.share_mint, pool_acc.key)?;
        let user_base_data =
            validate_token_account_basic(user_base_acc, Some(user_acc.key), &pool.base_mint)?;
        validate_token_account_basic(user_share_acc, Some(user_acc.key), &pool.share_mint)?;
        if user_base_data.amount < amount {
            msg!(
                "User base balance {} insufficient for depositing {}",
                user_base_data.amount,
                amount
            );
            return Err(FlufError::InsufficientFunds.into());
        }

        // --- Share Calculation ---
        let shares = shares_for_deposit(amount, vault_data.amount, share_mint_data.supply)?;
        if shares == 0 {
            msg!(
                "Deposit of {} too small to mint a share (vault {}, supply {})",
                amount,
                vault_data.amount,
                share_mint_data.supply
            );
            return Err(FlufError::ZeroAmount.into());
        }

        // Transfer amount from user -> base vault
        invoke(
            &spl_token::instruction::transfer(
                token_prog_acc.key,
                user_base_acc.key,
                base_vault_acc.key,
                user_acc.key,
                &[],
                amount,
            )?,
            &[
                user_base_acc.clone(),
                base_vault_acc.clone(),
                user_acc.clone(),
                token_prog_acc.clone(),
            ],
        )?;

        // Mint shares to user
        let bump_seed = [pool.bump];
        let sign_seeds = get_pool_seeds(&pool.base_mint, &bump_seed);
        invoke_signed(
            &spl_token::instruction::mint_to(
                token_prog_acc.key,
                share_mint_acc.key,
                user_share_acc.key,
                pool_acc.key,
                &[],
                shares,
            )?,
            &[
                share_mint_acc.clone(),
                user_share_acc.clone(),
                pool_acc.clone(),
                token_prog_acc.clone(),
            ],
            &[&sign_seeds],
        )?;
        msg!("Fluf Deposit: {} base -> {} shares", amount, shares);

        Ok(())
    }

    fn process_withdraw(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        msg!("Fluf Withdraw: Processing");
        let acc_iter = &mut accounts.iter();
        let user_acc = next_account_info(acc_iter)?; // 0
        let pool_acc = next_account_info(acc_iter)?; // 1
        let base_mint_acc = next_account_info(acc_iter)?; // 2
        let base_vault_acc = next_account_info(acc_iter)?; // 3
        let user_base_acc = next_account_info(acc_iter)?; // 4
        let share_mint_acc = next_account_info(acc_iter)?; // 5
        let user_share_acc = next_account_info(acc_iter)?; // 6
        let token_prog_acc = next_account_info(acc_iter)?; // 7

        // --- Load State & Basic Checks ---
        if !user_acc.is_signer {
            return Err(FlufError::MissingRequiredSignature.into());
        }
        validate_program_id(token_prog_acc, &spl_token::id())?;
        let pool = load_pool(program_id, pool_acc, base_mint_acc)?;

        // --- Account Data Validations ---
        let vault_data =
            validate_pool_vault(base_vault_acc, &pool.base_vault, pool_acc.key, &pool.base_mint)?;
        let share_mint_data = validate_share_mint(share_mint_acc, &pool.share_mint, pool_acc.key)?;
        validate_token_account_basic(user_base_acc, Some(user_acc.key), &pool.base_mint)?;
        let user_share_data =
            validate_token_account_basic(user_share_acc, Some(user_acc.key), &pool.share_mint)?;

        let balance = user_share_data.amount;
        if balance == 0 {
            msg!("User share account {} is empty", user_share_acc.key);
            return Err(FlufError::ZeroBalance.into());
        }
        let payout = payout_for_withdraw(balance, vault_data.amount, share_mint_data.supply)?;

        // Burn the whole share balance - user authorizes
        invoke(
            &spl_token::instruction::burn(
                token_prog_acc.key,
                user_share_acc.key,
                share_mint_acc.key,
                user_acc.key,
                &[],
                balance,
            )?,
            &[
                user_share_acc.clone(),
                share_mint_acc.clone(),
                user_acc.clone(),
                token_prog_acc.clone(),
            ],
        )?;

        // Pay out base asset - pool PDA authorizes
        if payout > 0 {
            let bump_seed = [pool.bump];
            let sign_seeds = get_pool_seeds(&pool.base_mint, &bump_seed);
            invoke_signed(
                &spl_token::instruction::transfer(
                    token_prog_acc.key,
                    base_vault_acc.key,
                    user_base_acc.key,
                    pool_acc.key,
                    &[],
                    payout,
                )?,
                &[
                    base_vault_acc.clone(),
                    user_base_acc.clone(),
                    pool_acc.clone(),
                    token_prog_acc.clone(),
                ],
                &[&sign_seeds],
            )?;
        }
        msg!("Fluf Withdraw: {} shares -> {} base", balance, payout);

        Ok(())
    }

    fn process_lend_and_call(
        program_id: &Pubkey,
        accounts: &[AccountInfo],
        amount: u64,
    ) -> ProgramResult {
        msg!("Fluf LendAndCall: Processing");
        let acc_iter = &mut accounts.iter();
        let user_acc = next_account_info(acc_iter)?; // 0
        let pool_acc = next_account_info(acc_iter)?; // 1
        let base_mint_acc = next_account_info(acc_iter)?; // 2
        let base_vault_acc = next_account_info(acc_iter)?; // 3
        let share_mint_acc = next_account_info(acc_iter)?; // 4
        let share_vault_acc = next_account_info(acc_iter)?; // 5
        let fee_vault_acc = next_account_info(acc_iter)?; // 6
        let borrower_share_acc = next_account_info(acc_iter)?; // 7
        let user_share_acc = next_account_info(acc_iter)?; // 8
        let token_prog_acc = next_account_info(acc_iter)?; // 9
        let borrower_prog_acc = next_account_info(acc_iter)?; // 10
        let remaining = acc_iter.as_slice(); // 11..

        // --- Load State & Basic Checks ---
        if !user_acc.is_signer {
            return Err(FlufError::MissingRequiredSignature.into());
        }
        if amount == 0 {
            return Err(FlufError::ZeroAmount.into());
        }
        validate_program_id(token_prog_acc, &spl_token::id())?;
        validate_executable(borrower_prog_acc)?;
        if borrower_prog_acc.key == program_id {
            msg!("Borrower program cannot be the lender itself");
            return Err(FlufError::IncorrectProgramId.into());
        }
        let pool = load_pool(program_id, pool_acc, base_mint_acc)?;

        // --- Account Data Validations ---
        let base_vault_data =
            validate_pool_vault(base_vault_acc, &pool.base_vault, pool_acc.key, &pool.base_mint)?;
        if base_vault_data.amount == 0 {
            msg!("Pool {} holds no base asset", pool_acc.key);
            return Err(FlufError::EmptyPool.into());
        }
        validate_share_mint(share_mint_acc, &pool.share_mint, pool_acc.key)?;
        let share_vault_data = validate_pool_vault(
            share_vault_acc,
            &pool.share_vault,
            pool_acc.key,
            &pool.share_mint,
        )?;
        validate_pool_vault(fee_vault_acc, &pool.fee_vault, pool_acc.key, &pool.share_mint)?;
        validate_token_account_basic(borrower_share_acc, None, &pool.share_mint)?;
        validate_token_account_basic(user_share_acc, None, &pool.share_mint)?;

        let pre_balance = share_vault_data.amount;
        let fee = flash_loan_fee(amount, pool.flash_fee_bps)?;
        let required = required_repayment(pre_balance, amount, fee)?;
        msg!(
            "Fluf LendAndCall: lending {} shares, fee {}, vault before {}",
            amount,
            fee,
            pre_balance
        );

        // Flash-mint the principal to the borrower
        let bump_seed = [pool.bump];
        let sign_seeds = get_pool_seeds(&pool.base_mint, &bump_seed);
        invoke_signed(
            &spl_token::instruction::mint_to(
                token_prog_acc.key,
                share_mint_acc.key,
                borrower_share_acc.key,
                pool_acc.key,
                &[],
                amount,
            )?,
            &[
                share_mint_acc.clone(),
                borrower_share_acc.clone(),
                pool_acc.clone(),
                token_prog_acc.clone(),
            ],
            &[&sign_seeds],
        )?;

        // --- Borrower Callback ---
        let mut metas = vec![
            AccountMeta::new_readonly(*user_acc.key, true),
            AccountMeta::new(*borrower_share_acc.key, false),
            AccountMeta::new(*share_vault_acc.key, false),
            AccountMeta::new(*user_share_acc.key, false),
            AccountMeta::new_readonly(*share_mint_acc.key, false),
            AccountMeta::new_readonly(*token_prog_acc.key, false),
        ];
        let mut infos = vec![
            user_acc.clone(),
            borrower_share_acc.clone(),
            share_vault_acc.clone(),
            user_share_acc.clone(),
            share_mint_acc.clone(),
            token_prog_acc.clone(),
        ];
        for acc in remaining {
            metas.push(AccountMeta {
                pubkey: *acc.key,
                is_signer: acc.is_signer,
                is_writable: acc.is_writable,
            });
            infos.push(acc.clone());
        }
        infos.push(borrower_prog_acc.clone());
        let callback = Instruction {
            program_id: *borrower_prog_acc.key,
            accounts: metas,
            data: BorrowerInstruction::HandleBorrow { amount, fee }.try_to_vec()?,
        };
        msg!("Fluf: About to invoke borrower {}", borrower_prog_acc.key);
        invoke(&callback, &infos)?;
        msg!("Fluf: Borrower invoke returned Ok");

        // --- Repayment Check (live balance) ---
        let post_balance = TokenAccount::unpack(&share_vault_acc.data.borrow())
            .map_err(|_| FlufError::UnpackAccountFailed)?
            .amount;
        if post_balance < required {
            msg!(
                "Flash loan not repaid: vault {} < required {}",
                post_balance,
                required
            );
            return Err(FlufError::Unrepaid.into());
        }

        // Fee -> fee vault
        if fee > 0 {
            invoke_signed(
                &spl_token::instruction::transfer(
                    token_prog_acc.key,
                    share_vault_acc.key,
                    fee_vault_acc.key,
                    pool_acc.key,
                    &[],
                    fee,
                )?,
                &[
                    share_vault_acc.clone(),
                    fee_vault_acc.clone(),
                    pool_acc.clone(),
                    token_prog_acc.clone(),
                ],
                &[&sign_seeds],
            )?;
        }

        // Burn principal plus any surplus
        let returned = post_balance
            .checked_sub(pre_balance)
            .and_then(|v| v.checked_sub(fee))
            .ok_or(FlufError::ArithmeticOverflow)?;
        invoke_signed(
            &spl_token::instruction::burn(
                token_prog_acc.key,
                share_vault_acc.key,
                share_mint_acc.key,
                pool_acc.key,
                &[],
                returned,
            )?,
            &[
                share_vault_acc.clone(),
                share_mint_acc.clone(),
                pool_acc.clone(),
                token_prog_acc.clone(),
            ],
            &[&sign_seeds],
        )?;
        msg!(
            "Fluf LendAndCall: repaid, fee {} collected, {} shares burned",
            fee,
            returned
        );

        Ok(())
    }

    fn process_withdraw_fees(program_id: &Pubkey, accounts: &[AccountInfo]) -> ProgramResult {
        msg!("Fluf WithdrawFees: Processing");
        let acc_iter = &mut accounts.iter();
        let admin_acc = next_account_info(acc_iter)?; // 0
        let state_acc = next_account_info(acc_iter)?; // 1
        let pool_acc = next_account_info(acc_iter)?; // 2
        let base_mint_acc = next_account_info(acc_iter)?; // 3
        let fee_vault_acc = next_account_info(acc_iter)?; // 4
        let collector_acc = next_account_info(acc_iter)?; // 5
        let token_prog_acc = next_account_info(acc_iter)?; // 6

        if !admin_acc.is_signer {
            return Err(FlufError::MissingRequiredSignature.into());
        }
        validate_program_id(token_prog_acc, &spl_token::id())?;

        // --- Authorization ---
        let (expected_state_pda, _bump) = find_program_state_address(program_id);
        if &expected_state_pda != state_acc.key {
            return Err(FlufError::IncorrectProgramStatePDA.into());
        }
        if state_acc.owner != program_id {
            msg!("Program state {} not initialized", state_acc.key);
            return Err(FlufError::InvalidAccountData.into());
        }
        let state = ProgramState::try_from_slice(&state_acc.data.borrow())
            .map_err(|_| FlufError::InvalidAccountData)?;
        if admin_acc.key != &state.administrator {
            msg!(
                "Signer {} is not the administrator {}",
                admin_acc.key,
                state.administrator
            );
            return Err(FlufError::Unauthorized.into());
        }

        // --- Pool & Accounts ---
        let pool = load_pool(program_id, pool_acc, base_mint_acc)?;
        let fee_vault_data =
            validate_pool_vault(fee_vault_acc, &pool.fee_vault, pool_acc.key, &pool.share_mint)?;
        validate_token_account_basic(collector_acc, None, &pool.share_mint)?;

        let fees = fee_vault_data.amount;
        if fees == 0 {
            msg!("Fees from {} pool withdrawn: 0", pool.base_mint);
            return Ok(());
        }

        let bump_seed = [pool.bump];
        let sign_seeds = get_pool_seeds(&pool.base_mint, &bump_seed);
        invoke_signed(
            &spl_token::instruction::transfer(
                token_prog_acc.key,
                fee_vault_acc.key,
                collector_acc.key,
                pool_acc.key,
                &[],
                fees,
            )?,
            &[
                fee_vault_acc.clone(),
                collector_acc.clone(),
                pool_acc.clone(),
                token_prog_acc.clone(),
            ],
            &[&sign_seeds],
        )?;
        msg!("Fees from {} pool withdrawn: {}", pool.base_mint, fees);

        Ok(())
    }
}

/// Loads the pool record for `base_mint_acc` and checks it lives at the
/// derived pool address.
fn load_pool(
    program_id: &Pubkey,
    pool_acc: &AccountInfo,
    base_mint_acc: &AccountInfo,
) -> Result<Pool, FlufError> {
    let (expected_pda, _bump) = find_pool_address(program_id, base_mint_acc.key);
    if &expected_pda != pool_acc.key {
        msg!(
            "Fluf ERROR: Expected pool pda {}, got {}",
            expected_pda,
            pool_acc.key
        );
        return Err(FlufError::IncorrectPoolPDA);
    }
    if pool_acc.owner != program_id {
        msg!("Pool {} not created", pool_acc.key);
        return Err(FlufError::InvalidPoolStateOwner);
    }
    let pool = Pool::try_from_slice(&pool_acc.data.borrow())
        .map_err(|_| FlufError::InvalidAccountData)?;
    if &pool.base_mint != base_mint_acc.key {
        return Err(FlufError::TokenMintMismatch);
    }
    Ok(pool)
}

/// Creates a program-derived account, coping with addresses that already
/// hold lamports (where `create_account` would fail).
fn create_pda_account<'a>(
    payer: &AccountInfo<'a>,
    new_account: &AccountInfo<'a>,
    system_acc: &AccountInfo<'a>,
    rent: &Rent,
    space: usize,
    owner: &Pubkey,
    signer_seeds: &[&[u8]],
) -> ProgramResult {
    let required_lamports = rent.minimum_balance(space);
    let current_lamports = new_account.lamports();

    if current_lamports == 0 {
        return invoke_signed(
            &system_instruction::create_account(
                payer.key,
                new_account.key,
                required_lamports,
                space as u64,
                owner,
            ),
            &[payer.clone(), new_account.clone(), system_acc.clone()],
            &[signer_seeds],
        );
    }

    msg!(
        "Account {} pre-funded with {} lamports",
        new_account.key,
        current_lamports
    );
    let top_up = required_lamports.saturating_sub(current_lamports);
    if top_up > 0 {
        invoke(
            &system_instruction::transfer(payer.key, new_account.key, top_up),
            &[payer.clone(), new_account.clone(), system_acc.clone()],
        )?;
    }
    invoke_signed(
        &system_instruction::allocate(new_account.key, space as u64),
        &[new_account.clone(), system_acc.clone()],
        &[signer_seeds],
    )?;
    invoke_signed(
        &system_instruction::assign(new_account.key, owner),
        &[new_account.clone(), system_acc.clone()],
        &[signer_seeds],
    )
}
