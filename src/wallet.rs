//! The wallet update pipeline: load state, calculate, write state, record.
//!
//! Each stage short-circuits on failure. Nothing here retries; the host is
//! expected to run the whole invocation on top of something that discards
//! writes on error (see [`crate::ledger::Staged`]).

use crate::calculator::calculate;
use crate::error::{Result, WalletError};
use crate::ledger::{StateStore, TransactionLog};
use crate::state::WalletState;
use crate::transaction::{TransactionRecord, UpdateRequest};
use log::debug;

/// Loads the wallet stored under `user`.
pub fn load_state<S: StateStore + ?Sized>(store: &S, user: &str) -> Result<WalletState> {
    let bytes = store
        .read_state(user)
        .map_err(|source| WalletError::StateRead {
            user: user.to_string(),
            source,
        })?;

    WalletState::from_bytes(&bytes).map_err(|e| WalletError::Decode {
        user: user.to_string(),
        message: e.to_string(),
    })
}

/// Encodes and persists the wallet under `user`.
pub fn save_state<S: StateStore + ?Sized>(
    store: &mut S,
    user: &str,
    state: &WalletState,
) -> Result<()> {
    let bytes = state.to_bytes().map_err(|source| WalletError::Encode {
        user: user.to_string(),
        source,
    })?;

    store
        .write_state(user, bytes)
        .map_err(|source| WalletError::StateWrite {
            user: user.to_string(),
            source,
        })
}

/// Applies one update and returns the encoded transaction record.
///
/// Only the requested currency changes; the full wallet is written back.
pub fn update<L>(ledger: &mut L, request: &UpdateRequest) -> Result<Vec<u8>>
where
    L: StateStore + TransactionLog + ?Sized,
{
    let mut state = load_state(&*ledger, &request.user)?;

    let current = state.get(&request.currency);
    let balance = calculate(request.operation, &request.amount, current)?;
    state.set(&request.currency, balance);

    save_state(ledger, &request.user, &state)?;

    let receipt = ledger
        .record(TransactionRecord::from(request))
        .map_err(|source| WalletError::TransactionRecord {
            user: request.user.clone(),
            source,
        })?;

    debug!(
        "{} {} {} for {}: {} -> {}",
        request.operation, request.amount, request.currency, request.user, current, balance
    );

    Ok(receipt)
}

/// Parses `[operation, user, currency, amount]` and applies the update.
pub fn update_from_args<L, S>(ledger: &mut L, args: &[S]) -> Result<Vec<u8>>
where
    L: StateStore + TransactionLog + ?Sized,
    S: AsRef<str>,
{
    let request = UpdateRequest::from_args(args)?;
    update(ledger, &request)
}
