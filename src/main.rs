//! Wallet Ledger CLI
//!
//! Applies wallet updates read from CSV (`operation,user,currency,amount`)
//! and prints the resulting balances.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- updates.csv > balances.csv
//! cargo run -- updates.csv transactions.jsonl > balances.csv
//! ```
//!
//! The optional second argument receives the transaction log as JSON lines.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `warn` to control logging verbosity

use log::info;
use std::env;
use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::process;
use wallet_ledger::{LedgerEngine, Result, WalletError};

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        return Err(WalletError::MissingArgument);
    }

    let input_path = &args[1];
    let file = File::open(input_path)?;
    let reader = BufReader::new(file);

    let mut engine = LedgerEngine::new();
    engine.process_csv(reader)?;
    info!(
        "{} updates applied, {} rejected",
        engine.applied(),
        engine.rejected()
    );

    if let Some(log_path) = args.get(2) {
        let log_file = File::create(log_path)?;
        engine.write_transactions(BufWriter::new(log_file))?;
    }

    let stdout = io::stdout();
    let handle = stdout.lock();
    engine.write_output(handle)?;

    Ok(())
}
