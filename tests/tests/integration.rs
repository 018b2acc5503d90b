use {
    borsh::BorshDeserialize,
    fluf_program::{
        error::FlufError,
        instruction,
        math::payout_for_withdraw,
        pda::{find_program_state_address, PoolAddresses},
        state::{Pool, ProgramState},
    },
    solana_program_test::{processor, BanksClientError, ProgramTest, ProgramTestContext},
    solana_sdk::{
        instruction::{Instruction, InstructionError},
        program_pack::Pack,
        pubkey::Pubkey,
        signature::{Keypair, Signer},
        system_instruction,
        transaction::{Transaction, TransactionError},
    },
};

const DECIMALS: u8 = 6;
const UNIT: u64 = 1_000_000;
const FEE_BPS: u16 = 100;

// Holds the common setup elements: an initialized program and one pool.
struct TestSetup {
    context: ProgramTestContext,
    payer: Keypair,
    mint_authority: Keypair,
    base_mint: Pubkey,
    addrs: PoolAddresses,
}

fn program_test() -> ProgramTest {
    let mut program_test = ProgramTest::new(
        "fluf_program",
        fluf_program::id(),
        processor!(fluf_program::processor::Processor::process),
    );
    program_test.add_program(
        "borrower_sample",
        borrower_sample::id(),
        processor!(borrower_sample::processor::Processor::process),
    );
    program_test.add_program(
        "spl_token",
        spl_token::id(),
        processor!(spl_token::processor::Processor::process),
    );
    program_test
}

// Sends `instructions` paid by the context payer. Every call waits for a new
// blockhash so that repeating an instruction never hits the status cache.
async fn send_tx(
    context: &mut ProgramTestContext,
    instructions: &[Instruction],
    signers: &[&Keypair],
) -> Result<(), BanksClientError> {
    let payer = context.payer.insecure_clone();
    let blockhash = context.get_new_latest_blockhash().await.unwrap();
    let mut all_signers = vec![&payer];
    all_signers.extend(signers.iter().filter(|s| s.pubkey() != payer.pubkey()));
    let tx = Transaction::new_signed_with_payer(
        instructions,
        Some(&payer.pubkey()),
        &all_signers,
        blockhash,
    );
    context.banks_client.process_transaction(tx).await
}

fn assert_fluf_error(result: Result<(), BanksClientError>, expected: FlufError) {
    let err = result.expect_err("transaction should have failed").unwrap();
    assert_eq!(
        err,
        TransactionError::InstructionError(0, InstructionError::Custom(expected as u32)),
        "expected {expected:?}"
    );
}

async fn create_mint(context: &mut ProgramTestContext, authority: &Pubkey, decimals: u8) -> Pubkey {
    let mint = Keypair::new();
    let payer = context.payer.pubkey();
    let rent = context.banks_client.get_rent().await.unwrap();
    let ixs = [
        system_instruction::create_account(
            &payer,
            &mint.pubkey(),
            rent.minimum_balance(spl_token::state::Mint::LEN),
            spl_token::state::Mint::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_mint2(
            &spl_token::id(),
            &mint.pubkey(),
            authority,
            None,
            decimals,
        )
        .unwrap(),
    ];
    send_tx(context, &ixs, &[&mint]).await.unwrap();
    mint.pubkey()
}

async fn create_token_account(
    context: &mut ProgramTestContext,
    mint: &Pubkey,
    owner: &Pubkey,
) -> Pubkey {
    let account = Keypair::new();
    let payer = context.payer.pubkey();
    let rent = context.banks_client.get_rent().await.unwrap();
    let ixs = [
        system_instruction::create_account(
            &payer,
            &account.pubkey(),
            rent.minimum_balance(spl_token::state::Account::LEN),
            spl_token::state::Account::LEN as u64,
            &spl_token::id(),
        ),
        spl_token::instruction::initialize_account3(&spl_token::id(), &account.pubkey(), mint, owner)
            .unwrap(),
    ];
    send_tx(context, &ixs, &[&account]).await.unwrap();
    account.pubkey()
}

async fn get_token_balance(context: &mut ProgramTestContext, account: &Pubkey) -> u64 {
    let account = context
        .banks_client
        .get_account(*account)
        .await
        .unwrap()
        .expect("token account missing");
    spl_token::state::Account::unpack(&account.data)
        .unwrap()
        .amount
}

async fn get_mint_supply(context: &mut ProgramTestContext, mint: &Pubkey) -> u64 {
    let account = context
        .banks_client
        .get_account(*mint)
        .await
        .unwrap()
        .expect("mint missing");
    spl_token::state::Mint::unpack(&account.data).unwrap().supply
}

async fn fund(context: &mut ProgramTestContext, to: &Pubkey) {
    let payer = context.payer.pubkey();
    send_tx(
        context,
        &[system_instruction::transfer(&payer, to, 1_000_000_000)],
        &[],
    )
    .await
    .unwrap();
}

// A user holding `base_amount` of the pool's base asset and an empty share account.
struct User {
    keypair: Keypair,
    base: Pubkey,
    share: Pubkey,
}

impl TestSetup {
    // Initializes the program (payer is the administrator) and creates a
    // pool for a fresh 6-decimal mint.
    async fn new() -> Self {
        let mut context = program_test().start_with_context().await;
        let payer = context.payer.insecure_clone();
        let mint_authority = Keypair::new();

        send_tx(
            &mut context,
            &[instruction::initialize(&fluf_program::id(), &payer.pubkey()).unwrap()],
            &[],
        )
        .await
        .unwrap();

        let base_mint = create_mint(&mut context, &mint_authority.pubkey(), DECIMALS).await;
        send_tx(
            &mut context,
            &[instruction::create_pool(
                &fluf_program::id(),
                &payer.pubkey(),
                &base_mint,
                DECIMALS,
                FEE_BPS,
            )
            .unwrap()],
            &[],
        )
        .await
        .unwrap();

        Self {
            context,
            payer,
            mint_authority,
            addrs: PoolAddresses::derive(&fluf_program::id(), &base_mint),
            base_mint,
        }
    }

    async fn new_user(&mut self, base_amount: u64) -> User {
        let keypair = Keypair::new();
        fund(&mut self.context, &keypair.pubkey()).await;
        let base = create_token_account(&mut self.context, &self.base_mint, &keypair.pubkey()).await;
        let share =
            create_token_account(&mut self.context, &self.addrs.share_mint, &keypair.pubkey()).await;
        if base_amount > 0 {
            self.mint_base(&base, base_amount).await;
        }
        User {
            keypair,
            base,
            share,
        }
    }

    async fn mint_base(&mut self, to: &Pubkey, amount: u64) {
        let ix = spl_token::instruction::mint_to(
            &spl_token::id(),
            &self.base_mint,
            to,
            &self.mint_authority.pubkey(),
            &[],
            amount,
        )
        .unwrap();
        let authority = self.mint_authority.insecure_clone();
        send_tx(&mut self.context, &[ix], &[&authority]).await.unwrap();
    }

    async fn deposit(&mut self, user: &User, amount: u64) -> Result<(), BanksClientError> {
        let ix = instruction::deposit(
            &fluf_program::id(),
            &user.keypair.pubkey(),
            &self.base_mint,
            &user.base,
            &user.share,
            amount,
        )
        .unwrap();
        self.checked_step(&[ix], &[&user.keypair]).await
    }

    async fn withdraw(&mut self, user: &User) -> Result<(), BanksClientError> {
        let ix = instruction::withdraw(
            &fluf_program::id(),
            &user.keypair.pubkey(),
            &self.base_mint,
            &user.base,
            &user.share,
        )
        .unwrap();
        self.checked_step(&[ix], &[&user.keypair]).await
    }

    // Creates the sample borrower's share account and returns its address.
    async fn create_borrower_account(&mut self) -> Pubkey {
        let ix = borrower_sample::instruction::create_accounts(
            &borrower_sample::id(),
            &self.payer.pubkey(),
            &self.addrs.share_mint,
        )
        .unwrap();
        send_tx(&mut self.context, &[ix], &[]).await.unwrap();
        borrower_sample::find_borrower_account_address(
            &borrower_sample::id(),
            &self.addrs.share_mint,
        )
        .0
    }

    async fn transfer_shares(&mut self, user: &User, to: &Pubkey, amount: u64) {
        let ix = spl_token::instruction::transfer(
            &spl_token::id(),
            &user.share,
            to,
            &user.keypair.pubkey(),
            &[],
            amount,
        )
        .unwrap();
        send_tx(&mut self.context, &[ix], &[&user.keypair]).await.unwrap();
    }

    async fn lend(
        &mut self,
        user: &User,
        borrower_share: &Pubkey,
        amount: u64,
    ) -> Result<(), BanksClientError> {
        let ix = instruction::lend_and_call(
            &fluf_program::id(),
            &user.keypair.pubkey(),
            &self.base_mint,
            borrower_share,
            &user.share,
            &borrower_sample::id(),
            amount,
            vec![],
        )
        .unwrap();
        self.checked_step(&[ix], &[&user.keypair]).await
    }

    async fn withdraw_fees(
        &mut self,
        administrator: &Keypair,
        collector: &Pubkey,
    ) -> Result<(), BanksClientError> {
        let ix = instruction::withdraw_fees(
            &fluf_program::id(),
            &administrator.pubkey(),
            &self.base_mint,
            collector,
        )
        .unwrap();
        self.checked_step(&[ix], &[administrator]).await
    }

    async fn balance(&mut self, account: &Pubkey) -> u64 {
        get_token_balance(&mut self.context, account).await
    }

    async fn share_supply(&mut self) -> u64 {
        let mint = self.addrs.share_mint;
        get_mint_supply(&mut self.context, &mint).await
    }

    // (base vault balance, share supply)
    async fn snapshot(&mut self) -> (u64, u64) {
        let vault = self.addrs.base_vault;
        (self.balance(&vault).await, self.share_supply().await)
    }

    // Sends a pool operation and, when it lands, checks that the value of a
    // share did not fall and that the whole supply is still redeemable.
    async fn checked_step(
        &mut self,
        instructions: &[Instruction],
        signers: &[&Keypair],
    ) -> Result<(), BanksClientError> {
        let before = self.snapshot().await;
        let result = send_tx(&mut self.context, instructions, signers).await;
        if result.is_ok() {
            self.assert_solvent(before).await;
        } else {
            assert_eq!(self.snapshot().await, before, "failed step moved funds");
        }
        result
    }

    async fn assert_solvent(&mut self, (vault_before, supply_before): (u64, u64)) {
        let (vault, supply) = self.snapshot().await;
        assert!(
            payout_for_withdraw(supply, vault, supply).unwrap() <= vault,
            "supply {supply} not covered by vault {vault}"
        );
        if supply_before > 0 && supply > 0 {
            assert!(
                vault as u128 * supply_before as u128 >= vault_before as u128 * supply as u128,
                "share value fell: {vault_before}/{supply_before} -> {vault}/{supply}"
            );
        }
    }
}

#[tokio::test]
async fn test_initialize_records_administrator() {
    let mut setup = TestSetup::new().await;
    let (state_pda, bump) = find_program_state_address(&fluf_program::id());
    let account = setup
        .context
        .banks_client
        .get_account(state_pda)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.owner, fluf_program::id());
    let state = ProgramState::try_from_slice(&account.data).unwrap();
    assert_eq!(state.administrator, setup.payer.pubkey());
    assert_eq!(state.bump, bump);

    // A second Initialize fails, whoever sends it.
    let other = Keypair::new();
    fund(&mut setup.context, &other.pubkey()).await;
    let result = send_tx(
        &mut setup.context,
        &[instruction::initialize(&fluf_program::id(), &other.pubkey()).unwrap()],
        &[&other],
    )
    .await;
    assert_fluf_error(result, FlufError::AlreadyInitialized);
}

#[tokio::test]
async fn test_create_pool_layout() {
    let mut setup = TestSetup::new().await;
    let account = setup
        .context
        .banks_client
        .get_account(setup.addrs.pool)
        .await
        .unwrap()
        .unwrap();
    let pool = Pool::try_from_slice(&account.data).unwrap();
    assert_eq!(pool.base_mint, setup.base_mint);
    assert_eq!(pool.share_mint, setup.addrs.share_mint);
    assert_eq!(pool.base_vault, setup.addrs.base_vault);
    assert_eq!(pool.share_vault, setup.addrs.share_vault);
    assert_eq!(pool.fee_vault, setup.addrs.fee_vault);
    assert_eq!(pool.share_decimals, DECIMALS);
    assert_eq!(pool.flash_fee_bps, FEE_BPS);

    let share_mint = setup
        .context
        .banks_client
        .get_account(setup.addrs.share_mint)
        .await
        .unwrap()
        .unwrap();
    let share_mint = spl_token::state::Mint::unpack(&share_mint.data).unwrap();
    assert_eq!(share_mint.decimals, DECIMALS);
    assert_eq!(share_mint.supply, 0);
    assert_eq!(
        share_mint.mint_authority,
        solana_program::program_option::COption::Some(setup.addrs.pool)
    );
    assert!(share_mint.freeze_authority.is_none());

    for vault in [setup.addrs.base_vault, setup.addrs.share_vault, setup.addrs.fee_vault] {
        assert_eq!(setup.balance(&vault).await, 0);
    }
}

#[tokio::test]
async fn test_create_pool_twice_fails() {
    let mut setup = TestSetup::new().await;
    let other = Keypair::new();
    fund(&mut setup.context, &other.pubkey()).await;
    let ix = instruction::create_pool(
        &fluf_program::id(),
        &other.pubkey(),
        &setup.base_mint,
        DECIMALS,
        FEE_BPS,
    )
    .unwrap();
    let result = send_tx(&mut setup.context, &[ix], &[&other]).await;
    assert_fluf_error(result, FlufError::AlreadyExists);
}

#[tokio::test]
async fn test_create_pool_rejects_bad_parameters() {
    let mut setup = TestSetup::new().await;
    let payer = setup.payer.pubkey();
    let authority = setup.mint_authority.pubkey();
    let mint = create_mint(&mut setup.context, &authority, 9).await;

    let ix = instruction::create_pool(&fluf_program::id(), &payer, &mint, DECIMALS, FEE_BPS).unwrap();
    let result = send_tx(&mut setup.context, &[ix], &[]).await;
    assert_fluf_error(result, FlufError::DecimalsMismatch);

    // A wallet is not an asset.
    let not_a_mint = Keypair::new().pubkey();
    let ix =
        instruction::create_pool(&fluf_program::id(), &payer, &not_a_mint, DECIMALS, FEE_BPS)
            .unwrap();
    let result = send_tx(&mut setup.context, &[ix], &[]).await;
    assert_fluf_error(result, FlufError::InvalidAsset);
}

#[tokio::test]
async fn test_create_pool_at_prefunded_addresses() {
    let mut setup = TestSetup::new().await;
    let payer = setup.payer.pubkey();
    let authority = setup.mint_authority.pubkey();
    let mint = create_mint(&mut setup.context, &authority, DECIMALS).await;
    let addrs = PoolAddresses::derive(&fluf_program::id(), &mint);

    // Someone sends lamports to the pool and share-mint addresses first.
    send_tx(
        &mut setup.context,
        &[
            system_instruction::transfer(&payer, &addrs.pool, 1_000_000),
            system_instruction::transfer(&payer, &addrs.share_mint, 1_000_000),
        ],
        &[],
    )
    .await
    .unwrap();

    let ix = instruction::create_pool(&fluf_program::id(), &payer, &mint, DECIMALS, 0).unwrap();
    send_tx(&mut setup.context, &[ix], &[]).await.unwrap();

    let pool = setup
        .context
        .banks_client
        .get_account(addrs.pool)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(pool.owner, fluf_program::id());
    assert_eq!(Pool::try_from_slice(&pool.data).unwrap().flash_fee_bps, 0);
}

#[tokio::test]
async fn test_deposit_withdraw_round_trip() {
    let mut setup = TestSetup::new().await;
    let user = setup.new_user(50 * UNIT).await;

    setup.deposit(&user, 50 * UNIT).await.unwrap();
    assert_eq!(setup.balance(&user.share).await, 50 * UNIT);
    assert_eq!(setup.balance(&user.base).await, 0);
    let vault = setup.addrs.base_vault;
    assert_eq!(setup.balance(&vault).await, 50 * UNIT);
    assert_eq!(setup.share_supply().await, 50 * UNIT);

    setup.withdraw(&user).await.unwrap();
    assert_eq!(setup.balance(&user.base).await, 50 * UNIT);
    assert_eq!(setup.balance(&user.share).await, 0);
    assert_eq!(setup.balance(&vault).await, 0);
    assert_eq!(setup.share_supply().await, 0);
}

#[tokio::test]
async fn test_deposit_failures() {
    let mut setup = TestSetup::new().await;
    let user = setup.new_user(10).await;

    assert_fluf_error(setup.deposit(&user, 0).await, FlufError::ZeroAmount);
    assert_fluf_error(setup.deposit(&user, 11).await, FlufError::InsufficientFunds);
    assert_fluf_error(setup.withdraw(&user).await, FlufError::ZeroBalance);

    // Nothing moved.
    assert_eq!(setup.balance(&user.base).await, 10);
    assert_eq!(setup.share_supply().await, 0);
}

#[tokio::test]
async fn test_deposit_after_donation_is_proportional() {
    let mut setup = TestSetup::new().await;
    let alice = setup.new_user(50).await;
    let bob = setup.new_user(30).await;
    setup.deposit(&alice, 50).await.unwrap();

    // Direct transfer into the vault doubles the rate.
    let vault = setup.addrs.base_vault;
    setup.mint_base(&vault, 50).await;

    setup.deposit(&bob, 30).await.unwrap();
    assert_eq!(setup.balance(&bob.share).await, 15);

    setup.withdraw(&alice).await.unwrap();
    assert_eq!(setup.balance(&alice.base).await, 100);
    setup.withdraw(&bob).await.unwrap();
    assert_eq!(setup.balance(&bob.base).await, 30);
    assert_eq!(setup.balance(&vault).await, 0);
}

#[tokio::test]
async fn test_flash_loan_repaid_with_fee() {
    let mut setup = TestSetup::new().await;
    let user = setup.new_user(1_000).await;
    setup.deposit(&user, 1_000).await.unwrap();
    let borrower_share = setup.create_borrower_account().await;

    // The borrower needs 3 extra shares to cover the 1% fee on 300.
    setup.transfer_shares(&user, &borrower_share, 3).await;
    setup.lend(&user, &borrower_share, 300).await.unwrap();

    let (share_vault, fee_vault, base_vault) = (
        setup.addrs.share_vault,
        setup.addrs.fee_vault,
        setup.addrs.base_vault,
    );
    assert_eq!(setup.balance(&fee_vault).await, 3);
    assert_eq!(setup.balance(&share_vault).await, 0);
    assert_eq!(setup.balance(&borrower_share).await, 0);
    assert_eq!(setup.balance(&user.share).await, 997);
    assert_eq!(setup.balance(&base_vault).await, 1_000);
    assert_eq!(setup.share_supply().await, 1_000);
}

#[tokio::test]
async fn test_flash_loan_surplus_goes_to_caller() {
    let mut setup = TestSetup::new().await;
    let user = setup.new_user(1_000).await;
    setup.deposit(&user, 1_000).await.unwrap();
    let borrower_share = setup.create_borrower_account().await;

    setup.transfer_shares(&user, &borrower_share, 10).await;
    setup.lend(&user, &borrower_share, 300).await.unwrap();

    let fee_vault = setup.addrs.fee_vault;
    assert_eq!(setup.balance(&fee_vault).await, 3);
    assert_eq!(setup.balance(&borrower_share).await, 0);
    assert_eq!(setup.balance(&user.share).await, 997);
    assert_eq!(setup.share_supply().await, 1_000);
}

#[tokio::test]
async fn test_flash_loan_with_shares_already_in_vault() {
    let mut setup = TestSetup::new().await;
    let user = setup.new_user(1_000).await;
    setup.deposit(&user, 1_000).await.unwrap();
    let borrower_share = setup.create_borrower_account().await;
    setup.transfer_shares(&user, &borrower_share, 3).await;

    // Shares parked in the share vault ahead of the loan, in the same
    // transaction, count towards the starting balance and are left untouched.
    let share_vault = setup.addrs.share_vault;
    let park = spl_token::instruction::transfer(
        &spl_token::id(),
        &user.share,
        &share_vault,
        &user.keypair.pubkey(),
        &[],
        5,
    )
    .unwrap();
    let lend = instruction::lend_and_call(
        &fluf_program::id(),
        &user.keypair.pubkey(),
        &setup.base_mint,
        &borrower_share,
        &user.share,
        &borrower_sample::id(),
        300,
        vec![],
    )
    .unwrap();
    setup.checked_step(&[park, lend], &[&user.keypair]).await.unwrap();

    let fee_vault = setup.addrs.fee_vault;
    assert_eq!(setup.balance(&share_vault).await, 5);
    assert_eq!(setup.balance(&fee_vault).await, 3);
    assert_eq!(setup.balance(&borrower_share).await, 0);
    assert_eq!(setup.balance(&user.share).await, 992);
    assert_eq!(setup.share_supply().await, 1_000);

    // A second loan starts from the parked balance again.
    setup.transfer_shares(&user, &borrower_share, 3).await;
    setup.lend(&user, &borrower_share, 300).await.unwrap();
    assert_eq!(setup.balance(&share_vault).await, 5);
    assert_eq!(setup.balance(&fee_vault).await, 6);
    assert_eq!(setup.share_supply().await, 1_000);
}

#[tokio::test]
async fn test_flash_loan_over_repayment_is_burned() {
    let mut setup = TestSetup::new().await;
    let user = setup.new_user(1_000).await;
    setup.deposit(&user, 1_000).await.unwrap();
    let borrower_share = setup.create_borrower_account().await;
    setup.transfer_shares(&user, &borrower_share, 10).await;

    // Naming the share vault as the caller's account makes the borrower send
    // its 7 spare shares back to the lender on top of principal and fee.
    let share_vault = setup.addrs.share_vault;
    let ix = instruction::lend_and_call(
        &fluf_program::id(),
        &user.keypair.pubkey(),
        &setup.base_mint,
        &borrower_share,
        &share_vault,
        &borrower_sample::id(),
        300,
        vec![],
    )
    .unwrap();
    setup.checked_step(&[ix], &[&user.keypair]).await.unwrap();

    let (fee_vault, base_vault) = (setup.addrs.fee_vault, setup.addrs.base_vault);
    assert_eq!(setup.balance(&fee_vault).await, 3);
    assert_eq!(setup.balance(&share_vault).await, 0);
    assert_eq!(setup.balance(&borrower_share).await, 0);
    assert_eq!(setup.balance(&user.share).await, 990);
    assert_eq!(setup.share_supply().await, 993);
    assert_eq!(setup.balance(&base_vault).await, 1_000);

    // Remaining holders split the same base among fewer shares.
    setup.withdraw(&user).await.unwrap();
    assert_eq!(setup.balance(&user.base).await, 1_000 * 990 / 993);
}

#[tokio::test]
async fn test_flash_loan_unrepaid_is_rolled_back() {
    let mut setup = TestSetup::new().await;
    let user = setup.new_user(1_000).await;
    setup.deposit(&user, 1_000).await.unwrap();
    let borrower_share = setup.create_borrower_account().await;

    // Borrower can only return the principal.
    assert_fluf_error(
        setup.lend(&user, &borrower_share, 300).await,
        FlufError::Unrepaid,
    );

    let (share_vault, fee_vault) = (setup.addrs.share_vault, setup.addrs.fee_vault);
    assert_eq!(setup.balance(&share_vault).await, 0);
    assert_eq!(setup.balance(&fee_vault).await, 0);
    assert_eq!(setup.balance(&borrower_share).await, 0);
    assert_eq!(setup.balance(&user.share).await, 1_000);
    assert_eq!(setup.share_supply().await, 1_000);

    assert_fluf_error(
        setup.lend(&user, &borrower_share, 0).await,
        FlufError::ZeroAmount,
    );
}

#[tokio::test]
async fn test_flash_loan_from_empty_pool() {
    let mut setup = TestSetup::new().await;
    let user = setup.new_user(0).await;
    let borrower_share = setup.create_borrower_account().await;

    assert_fluf_error(
        setup.lend(&user, &borrower_share, 300).await,
        FlufError::EmptyPool,
    );
}

#[tokio::test]
async fn test_withdraw_fees_administrator_only() {
    let mut setup = TestSetup::new().await;
    let user = setup.new_user(1_000).await;
    setup.deposit(&user, 1_000).await.unwrap();
    let borrower_share = setup.create_borrower_account().await;
    setup.transfer_shares(&user, &borrower_share, 3).await;
    setup.lend(&user, &borrower_share, 300).await.unwrap();

    let outsider = setup.new_user(0).await;
    let outsider_keypair = outsider.keypair.insecure_clone();
    assert_fluf_error(
        setup.withdraw_fees(&outsider_keypair, &outsider.share).await,
        FlufError::Unauthorized,
    );

    let admin = setup.payer.insecure_clone();
    let share_mint = setup.addrs.share_mint;
    let collector = create_token_account(&mut setup.context, &share_mint, &admin.pubkey()).await;
    setup.withdraw_fees(&admin, &collector).await.unwrap();

    let fee_vault = setup.addrs.fee_vault;
    assert_eq!(setup.balance(&collector).await, 3);
    assert_eq!(setup.balance(&fee_vault).await, 0);

    // Sweeping an empty vault is a no-op.
    setup.withdraw_fees(&admin, &collector).await.unwrap();
    assert_eq!(setup.balance(&collector).await, 3);
}
