//! `fluf` - command-line client for the Fluf program.
//!
//! Commands:
//! - `fluf initialize` - record the payer as fee administrator
//! - `fluf create <BASE_MINT>` - create the pool for a base mint
//! - `fluf deposit` / `fluf withdraw` - exchange base tokens for shares and back
//! - `fluf run` - take a flash loan through a borrower program
//! - `fluf feesbalance` / `fluf feeswithdraw` - inspect and sweep accrued fees

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .init();

    let cli = cli::Cli::parse();
    commands::run(cli)
}
