use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fluf_program::DEFAULT_FLASH_FEE_BPS;
use solana_sdk::{commitment_config::CommitmentConfig, pubkey::Pubkey};

#[derive(Parser, Debug)]
#[command(name = "fluf")]
#[command(about = "Deposit into Fluf pools and run flash loans against them")]
pub struct Cli {
    /// RPC URL, or one of the monikers m[ainnet-beta], t[estnet], d[evnet], l[ocalnet]
    #[arg(short = 'u', long, global = true, env = "FLUF_RPC_URL", default_value = "devnet")]
    pub url: String,

    /// Payer keypair file [default: ~/.config/solana/id.json]
    #[arg(short = 'k', long, global = true, env = "FLUF_KEYPAIR")]
    pub keypair: Option<PathBuf>,

    /// Fluf program address
    #[arg(long, global = true, env = "FLUF_PROGRAM_ID", default_value_t = fluf_program::id())]
    pub program_id: Pubkey,

    /// Commitment level used for queries and confirmations
    #[arg(long, global = true, default_value = "confirmed", value_parser = parse_commitment)]
    pub commitment: CommitmentConfig,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Initialize the program and record the payer as fee administrator
    Initialize,
    /// Create the pool for a base mint
    Create {
        base_mint: Pubkey,
        /// Flash loan fee in basis points
        #[arg(long, default_value_t = DEFAULT_FLASH_FEE_BPS)]
        fee_bps: u16,
    },
    /// Deposit base tokens and receive shares
    Deposit {
        base_mint: Pubkey,
        /// Amount in base token units
        amount: u64,
        /// Base token account to debit
        source: Pubkey,
        /// Share account to credit [default: payer's associated account]
        share_account: Option<Pubkey>,
    },
    /// Redeem the entire share balance for base tokens
    Withdraw {
        base_mint: Pubkey,
        /// Base token account to credit
        destination: Pubkey,
        /// Share account to burn from [default: payer's associated account]
        share_account: Option<Pubkey>,
    },
    /// Take a flash loan of shares and hand it to a borrower program
    Run {
        base_mint: Pubkey,
        /// Amount of shares to lend
        amount: u64,
        borrower_share_account: Pubkey,
        user_share_account: Pubkey,
        borrower_program: Pubkey,
    },
    /// Print the accrued fee balance of a pool
    #[command(name = "feesbalance")]
    FeesBalance { base_mint: Pubkey },
    /// Sweep accrued fees to a collector share account
    #[command(name = "feeswithdraw")]
    FeesWithdraw { base_mint: Pubkey, collector: Pubkey },
}

fn parse_commitment(s: &str) -> Result<CommitmentConfig, String> {
    match s {
        "processed" => Ok(CommitmentConfig::processed()),
        "confirmed" => Ok(CommitmentConfig::confirmed()),
        "finalized" => Ok(CommitmentConfig::finalized()),
        other => Err(format!(
            "unknown commitment '{other}', expected processed, confirmed or finalized"
        )),
    }
}

/// Expands cluster monikers to their public RPC endpoints.
pub fn resolve_url(url: &str) -> String {
    match url {
        "m" | "mainnet-beta" => "https://api.mainnet-beta.solana.com",
        "t" | "testnet" => "https://api.testnet.solana.com",
        "d" | "devnet" => "https://api.devnet.solana.com",
        "l" | "localnet" | "localhost" => "http://localhost:8899",
        other => other,
    }
    .to_string()
}

pub fn default_keypair_path() -> Option<PathBuf> {
    std::env::var_os("HOME")
        .map(|home| PathBuf::from(home).join(".config").join("solana").join("id.json"))
}
