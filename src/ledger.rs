//! Ledger capabilities consumed by wallet updates.
//!
//! The wallet logic only ever talks to a [`StateStore`] (raw bytes per user
//! key) and a [`TransactionLog`] (append-only audit entries). [`MemoryLedger`]
//! implements both in memory, and [`Staged`] layers a pending write set on top
//! of any ledger so that a failed invocation leaves nothing behind, provided
//! the ledger underneath does not fail while committing.

use crate::error::{CommitError, StoreError};
use crate::transaction::{RecordedTransaction, TransactionRecord};
use std::collections::BTreeMap;

/// Result type alias for ledger capabilities
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Raw key-value access to persisted wallet state.
pub trait StateStore {
    /// Returns the bytes stored under `key`, or an empty vector if there are none.
    fn read_state(&self, key: &str) -> StoreResult<Vec<u8>>;

    fn write_state(&mut self, key: &str, bytes: Vec<u8>) -> StoreResult<()>;
}

/// Append-only log of transaction records.
pub trait TransactionLog {
    /// Appends `record` under a log-assigned id and returns the encoded entry.
    fn record(&mut self, record: TransactionRecord) -> StoreResult<Vec<u8>>;

    /// Id the next appended record will receive.
    fn next_sequence(&self) -> u64;
}

/// In-memory ledger. Transaction ids start at 1 and increase by one per record.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    states: BTreeMap<String, Vec<u8>>,
    transactions: Vec<RecordedTransaction>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        MemoryLedger::default()
    }

    /// Iterates stored `(user, bytes)` pairs in key order.
    pub fn states(&self) -> impl Iterator<Item = (&str, &[u8])> {
        self.states.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// All recorded transactions, oldest first.
    pub fn transactions(&self) -> &[RecordedTransaction] {
        &self.transactions
    }

    /// Starts a pending write set on top of this ledger.
    pub fn stage(&mut self) -> Staged<'_, Self> {
        Staged::new(self)
    }
}

impl StateStore for MemoryLedger {
    fn read_state(&self, key: &str) -> StoreResult<Vec<u8>> {
        Ok(self.states.get(key).cloned().unwrap_or_default())
    }

    fn write_state(&mut self, key: &str, bytes: Vec<u8>) -> StoreResult<()> {
        self.states.insert(key.to_string(), bytes);
        Ok(())
    }
}

impl TransactionLog for MemoryLedger {
    fn record(&mut self, record: TransactionRecord) -> StoreResult<Vec<u8>> {
        let recorded = RecordedTransaction {
            tx_id: self.next_sequence(),
            record,
        };
        let encoded = recorded.encode()?;
        self.transactions.push(recorded);
        Ok(encoded)
    }

    fn next_sequence(&self) -> u64 {
        self.transactions.len() as u64 + 1
    }
}

/// Pending writes and records over an underlying ledger.
///
/// Reads see pending writes first. Nothing reaches the underlying ledger
/// until [`Staged::commit`]; dropping a `Staged` discards everything.
///
/// Ids handed out while staged are `inner.next_sequence()` onwards, which
/// match what the inner log assigns on commit as long as it numbers records
/// sequentially. The exclusive borrow keeps other writers out meanwhile.
#[derive(Debug)]
pub struct Staged<'a, L> {
    inner: &'a mut L,
    writes: BTreeMap<String, Vec<u8>>,
    records: Vec<RecordedTransaction>,
}

impl<'a, L> Staged<'a, L>
where
    L: StateStore + TransactionLog,
{
    pub fn new(inner: &'a mut L) -> Self {
        Staged {
            inner,
            writes: BTreeMap::new(),
            records: Vec::new(),
        }
    }

    /// Number of pending state writes plus pending records.
    pub fn pending(&self) -> usize {
        self.writes.len() + self.records.len()
    }

    /// Applies every pending write, then every pending record, to the inner ledger.
    ///
    /// This is all or nothing only when the inner ledger cannot fail, as with
    /// [`MemoryLedger`]. Otherwise a failure leaves whatever was applied
    /// before it in place: on [`CommitError::Record`] the state writes have
    /// already landed.
    pub fn commit(self) -> Result<(), CommitError> {
        for (key, bytes) in self.writes {
            self.inner
                .write_state(&key, bytes)
                .map_err(CommitError::State)?;
        }
        for recorded in self.records {
            self.inner
                .record(recorded.record)
                .map_err(CommitError::Record)?;
        }
        Ok(())
    }
}

impl<L> StateStore for Staged<'_, L>
where
    L: StateStore,
{
    fn read_state(&self, key: &str) -> StoreResult<Vec<u8>> {
        match self.writes.get(key) {
            Some(bytes) => Ok(bytes.clone()),
            None => self.inner.read_state(key),
        }
    }

    fn write_state(&mut self, key: &str, bytes: Vec<u8>) -> StoreResult<()> {
        self.writes.insert(key.to_string(), bytes);
        Ok(())
    }
}

impl<L> TransactionLog for Staged<'_, L>
where
    L: TransactionLog,
{
    fn record(&mut self, record: TransactionRecord) -> StoreResult<Vec<u8>> {
        let recorded = RecordedTransaction {
            tx_id: self.next_sequence(),
            record,
        };
        let encoded = recorded.encode()?;
        self.records.push(recorded);
        Ok(encoded)
    }

    fn next_sequence(&self) -> u64 {
        self.inner.next_sequence() + self.records.len() as u64
    }
}
