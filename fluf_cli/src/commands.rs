use anyhow::{anyhow, bail, Context, Result};
use fluf_program::{
    error::FlufError,
    instruction,
    pda::{find_program_state_address, PoolAddresses},
};
use log::{debug, info};
use num_traits::FromPrimitive;
use solana_client::{client_error::ClientError, rpc_client::RpcClient};
use solana_sdk::{
    instruction::{Instruction, InstructionError},
    program_pack::Pack,
    pubkey::Pubkey,
    signature::{read_keypair_file, Keypair, Signature, Signer},
    transaction::{Transaction, TransactionError},
};
use spl_associated_token_account::{
    get_associated_token_address, instruction::create_associated_token_account_idempotent,
};
use spl_token::state::{Account as TokenAccount, Mint};

use crate::cli::{default_keypair_path, resolve_url, Cli, Command};

pub fn run(cli: Cli) -> Result<()> {
    let url = resolve_url(&cli.url);
    let keypair_path = match cli.keypair {
        Some(path) => path,
        None => default_keypair_path().context("HOME is not set, pass --keypair")?,
    };
    let payer = read_keypair_file(&keypair_path)
        .map_err(|e| anyhow!("failed to read keypair {}: {}", keypair_path.display(), e))?;
    info!("RPC URL: {}", url);
    info!("Payer: {}", payer.pubkey());
    debug!("Program: {}", cli.program_id);

    let client = Client {
        rpc: RpcClient::new_with_commitment(url, cli.commitment),
        payer,
        program_id: cli.program_id,
    };

    match cli.command {
        Command::Initialize => client.initialize(),
        Command::Create { base_mint, fee_bps } => client.create(&base_mint, fee_bps),
        Command::Deposit {
            base_mint,
            amount,
            source,
            share_account,
        } => client.deposit(&base_mint, amount, &source, share_account),
        Command::Withdraw {
            base_mint,
            destination,
            share_account,
        } => client.withdraw(&base_mint, &destination, share_account),
        Command::Run {
            base_mint,
            amount,
            borrower_share_account,
            user_share_account,
            borrower_program,
        } => client.lend_and_call(
            &base_mint,
            amount,
            &borrower_share_account,
            &user_share_account,
            &borrower_program,
        ),
        Command::FeesBalance { base_mint } => client.fees_balance(&base_mint),
        Command::FeesWithdraw {
            base_mint,
            collector,
        } => client.fees_withdraw(&base_mint, &collector),
    }
}

struct Client {
    rpc: RpcClient,
    payer: Keypair,
    program_id: Pubkey,
}

impl Client {
    fn pool_addresses(&self, base_mint: &Pubkey) -> PoolAddresses {
        let addrs = PoolAddresses::derive(&self.program_id, base_mint);
        debug!(
            "Pool {} base vault {} share mint {} share vault {} fee vault {}",
            addrs.pool, addrs.base_vault, addrs.share_mint, addrs.share_vault, addrs.fee_vault
        );
        addrs
    }

    fn send(&self, instructions: &[Instruction]) -> Result<Signature> {
        let blockhash = self
            .rpc
            .get_latest_blockhash()
            .context("failed to fetch latest blockhash")?;
        let tx = Transaction::new_signed_with_payer(
            instructions,
            Some(&self.payer.pubkey()),
            &[&self.payer],
            blockhash,
        );
        self.rpc.send_and_confirm_transaction(&tx).map_err(|err| {
            match decode_program_error(&err, instructions, &self.program_id) {
                Some(fluf_err) => anyhow!("transaction failed: {:?} ({})", fluf_err, fluf_err),
                None => anyhow!(err).context("transaction failed"),
            }
        })
    }

    fn read_mint(&self, mint: &Pubkey) -> Result<Mint> {
        let account = self
            .rpc
            .get_account(mint)
            .with_context(|| format!("mint {} not found", mint))?;
        if account.owner != spl_token::id() {
            bail!("{} is not an SPL token mint", mint);
        }
        Mint::unpack(&account.data).with_context(|| format!("{} is not an SPL token mint", mint))
    }

    fn initialize(&self) -> Result<()> {
        let (state, _) = find_program_state_address(&self.program_id);
        debug!("Program state: {}", state);
        let ix = instruction::initialize(&self.program_id, &self.payer.pubkey())?;
        let signature = self.send(&[ix])?;
        println!("initialize transaction signature {}", signature);
        println!("Protocol initialized for fee collector: {}", self.payer.pubkey());
        Ok(())
    }

    fn create(&self, base_mint: &Pubkey, fee_bps: u16) -> Result<()> {
        let mint = self.read_mint(base_mint)?;
        info!("Base mint decimals: {}", mint.decimals);
        let addrs = self.pool_addresses(base_mint);
        let ix = instruction::create_pool(
            &self.program_id,
            &self.payer.pubkey(),
            base_mint,
            mint.decimals,
            fee_bps,
        )?;
        let signature = self.send(&[ix])?;
        println!("create_pool transaction signature {}", signature);
        println!("Pool created. Share mint: {}", addrs.share_mint);
        Ok(())
    }

    fn deposit(
        &self,
        base_mint: &Pubkey,
        amount: u64,
        source: &Pubkey,
        share_account: Option<Pubkey>,
    ) -> Result<()> {
        let addrs = self.pool_addresses(base_mint);
        let mut instructions = Vec::with_capacity(2);
        let share_account = match share_account {
            Some(account) => account,
            None => {
                instructions.push(create_associated_token_account_idempotent(
                    &self.payer.pubkey(),
                    &self.payer.pubkey(),
                    &addrs.share_mint,
                    &spl_token::id(),
                ));
                get_associated_token_address(&self.payer.pubkey(), &addrs.share_mint)
            }
        };
        info!("Share account: {}", share_account);
        instructions.push(instruction::deposit(
            &self.program_id,
            &self.payer.pubkey(),
            base_mint,
            source,
            &share_account,
            amount,
        )?);
        let signature = self.send(&instructions)?;
        println!("deposit transaction signature {}", signature);
        Ok(())
    }

    fn withdraw(
        &self,
        base_mint: &Pubkey,
        destination: &Pubkey,
        share_account: Option<Pubkey>,
    ) -> Result<()> {
        let addrs = self.pool_addresses(base_mint);
        let share_account = share_account
            .unwrap_or_else(|| get_associated_token_address(&self.payer.pubkey(), &addrs.share_mint));
        info!("Share account: {}", share_account);
        let ix = instruction::withdraw(
            &self.program_id,
            &self.payer.pubkey(),
            base_mint,
            destination,
            &share_account,
        )?;
        let signature = self.send(&[ix])?;
        println!("withdraw transaction signature {}", signature);
        Ok(())
    }

    fn lend_and_call(
        &self,
        base_mint: &Pubkey,
        amount: u64,
        borrower_share: &Pubkey,
        user_share: &Pubkey,
        borrower_program: &Pubkey,
    ) -> Result<()> {
        let addrs = self.pool_addresses(base_mint);
        let ix = instruction::lend_and_call(
            &self.program_id,
            &self.payer.pubkey(),
            base_mint,
            borrower_share,
            user_share,
            borrower_program,
            amount,
            vec![],
        )?;
        let signature = self.send(&[ix])?;
        println!("lendAndCall transaction signature {}", signature);
        println!("Lent {} shares from pool {}", amount, addrs.pool);
        Ok(())
    }

    fn fees_balance(&self, base_mint: &Pubkey) -> Result<()> {
        let addrs = self.pool_addresses(base_mint);
        let account = self
            .rpc
            .get_account(&addrs.fee_vault)
            .with_context(|| format!("no pool for {}", base_mint))?;
        let fee_vault = TokenAccount::unpack(&account.data)
            .with_context(|| format!("fee vault {} is not a token account", addrs.fee_vault))?;
        println!("fee_balance {}", fee_vault.amount);
        Ok(())
    }

    fn fees_withdraw(&self, base_mint: &Pubkey, collector: &Pubkey) -> Result<()> {
        let addrs = self.pool_addresses(base_mint);
        let ix = instruction::withdraw_fees(
            &self.program_id,
            &self.payer.pubkey(),
            base_mint,
            collector,
        )?;
        let signature = self.send(&[ix])?;
        println!("withdraw fees transaction signature {}", signature);
        println!("Fees swept from {} to {}", addrs.fee_vault, collector);
        Ok(())
    }
}

/// Maps a custom error raised by the Fluf instruction of a failed transaction
/// back to its `FlufError`. Errors from other instructions are left alone.
fn decode_program_error(
    err: &ClientError,
    instructions: &[Instruction],
    program_id: &Pubkey,
) -> Option<FlufError> {
    match err.get_transaction_error()? {
        TransactionError::InstructionError(index, InstructionError::Custom(code)) => {
            let ix = instructions.get(index as usize)?;
            if ix.program_id != *program_id {
                return None;
            }
            FlufError::from_u32(code)
        }
        _ => None,
    }
}
