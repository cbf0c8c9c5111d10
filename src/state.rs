//! Per-user multi-currency wallet state and its persisted encoding.

use crate::decimal::Amount;
use serde::de::Error as _;
use std::collections::BTreeMap;

/// Balances held by one user, keyed by currency code.
///
/// # Invariants
///
/// - Every stored balance is `>= 0`; decoding rejects anything else
/// - Currencies without an entry have an implicit balance of zero
///
/// The map is ordered so that [`WalletState::to_bytes`] is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WalletState {
    balances: BTreeMap<String, Amount>,
}

impl WalletState {
    /// Creates an empty wallet, as seen for a user the ledger has never stored.
    pub fn new() -> Self {
        WalletState::default()
    }

    /// Decodes persisted wallet bytes.
    ///
    /// Empty input means the user has no state yet and yields an empty wallet.
    /// Otherwise the bytes must be a JSON object mapping currency codes to
    /// non-negative amounts.
    pub fn from_bytes(bytes: &[u8]) -> serde_json::Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(WalletState::new());
        }

        let balances: BTreeMap<String, Amount> = serde_json::from_slice(bytes)?;
        if let Some((currency, balance)) = balances.iter().find(|(_, b)| b.is_negative()) {
            return Err(serde_json::Error::custom(format!(
                "stored balance for {} is negative ({})",
                currency, balance
            )));
        }

        Ok(WalletState { balances })
    }

    /// Encodes the wallet as a JSON object sorted by currency.
    pub fn to_bytes(&self) -> serde_json::Result<Vec<u8>> {
        serde_json::to_vec(&self.balances)
    }

    /// Balance for `currency`, zero if the wallet has never held it.
    pub fn get(&self, currency: &str) -> Amount {
        self.balances.get(currency).copied().unwrap_or(Amount::ZERO)
    }

    /// Inserts or overwrites the balance for `currency`.
    pub fn set(&mut self, currency: &str, balance: Amount) {
        self.balances.insert(currency.to_string(), balance);
    }

    /// Iterates `(currency, balance)` pairs in currency order.
    pub fn balances(&self) -> impl Iterator<Item = (&str, Amount)> {
        self.balances.iter().map(|(c, b)| (c.as_str(), *b))
    }

    pub fn is_empty(&self) -> bool {
        self.balances.is_empty()
    }
}
