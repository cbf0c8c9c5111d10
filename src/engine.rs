//! Batch host for wallet updates.
//!
//! Streams update invocations from CSV and runs each one against an in-memory
//! ledger. Every invocation is staged and only committed once all of its
//! stages succeeded, so a rejected row never leaves a partial write.

use crate::error::{Result, WalletError};
use crate::ledger::MemoryLedger;
use crate::state::WalletState;
use crate::transaction::UpdateRequest;
use crate::wallet;
use csv::{ReaderBuilder, Trim};
use log::{debug, warn};
use std::io::{Read, Write};

/// Runs wallet updates against an owned ledger.
///
/// # Output Ordering
///
/// Final balances are written sorted by user, then currency.
#[derive(Debug, Default)]
pub struct LedgerEngine {
    ledger: MemoryLedger,

    /// Invocations that were committed.
    applied: usize,

    /// Invocations that failed and were discarded.
    rejected: usize,
}

impl LedgerEngine {
    /// Creates an engine over an empty ledger.
    pub fn new() -> Self {
        LedgerEngine::default()
    }

    /// Creates an engine over an existing ledger.
    pub fn with_ledger(ledger: MemoryLedger) -> Self {
        LedgerEngine {
            ledger,
            ..LedgerEngine::default()
        }
    }

    pub fn ledger(&self) -> &MemoryLedger {
        &self.ledger
    }

    pub fn applied(&self) -> usize {
        self.applied
    }

    pub fn rejected(&self) -> usize {
        self.rejected
    }

    /// Runs one invocation of `[operation, user, currency, amount]`.
    ///
    /// Returns the encoded transaction record. On error the ledger is unchanged.
    pub fn apply<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Vec<u8>> {
        let result = self.apply_staged(args);
        if result.is_ok() {
            self.applied += 1;
        } else {
            self.rejected += 1;
        }
        result
    }

    fn apply_staged<S: AsRef<str>>(&mut self, args: &[S]) -> Result<Vec<u8>> {
        let request = UpdateRequest::from_args(args)?;

        let mut staged = self.ledger.stage();
        let receipt = wallet::update(&mut staged, &request)?;
        staged
            .commit()
            .map_err(|e| e.into_wallet_error(&request.user))?;

        Ok(receipt)
    }

    /// Processes update rows from a CSV reader in streaming fashion.
    ///
    /// The first row is a header. Rows that fail are logged at warn level and skipped.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<()> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        for (row_idx, result) in csv_reader.records().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            match result {
                Ok(record) => {
                    let args: Vec<&str> = record.iter().collect();
                    match self.apply(&args) {
                        Ok(_) => debug!("Row {}: applied {:?}", row_num, args),
                        Err(e) => warn!("Row {}: {}", row_num, e),
                    }
                }
                Err(e) => {
                    warn!("Row {}: CSV parse error: {}", row_num, e);
                }
            }
        }

        Ok(())
    }

    /// Loads the current wallet for `user`.
    pub fn wallet(&self, user: &str) -> Result<WalletState> {
        wallet::load_state(&self.ledger, user)
    }

    /// Writes every stored balance to CSV.
    ///
    /// Amounts are formatted with exactly 4 decimal places.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record(["user", "currency", "balance"])?;

        // MemoryLedger iterates users in key order; wallets iterate currencies in order.
        for (user, _) in self.ledger.states() {
            let state = self.wallet(user)?;
            for (currency, balance) in state.balances() {
                csv_writer.write_record([user, currency, balance.to_string().as_str()])?;
            }
        }

        csv_writer.flush()?;
        Ok(())
    }

    /// Writes the transaction log as JSON lines, oldest first.
    pub fn write_transactions<W: Write>(&self, mut writer: W) -> Result<()> {
        for recorded in self.ledger.transactions() {
            let line = recorded.encode().map_err(WalletError::LogEncode)?;
            writer.write_all(&line)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }
}
