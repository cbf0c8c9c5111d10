//! Balance calculation for a single currency.
//!
//! [`calculate`] is pure: it sees only the operation, the amount literal and
//! the current balance, so it can be exercised without any store.

use crate::decimal::Amount;
use crate::error::{Result, WalletError};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

/// Direction of a balance update.
///
/// The sign of a movement lives here; amount literals are always magnitudes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Deposit,
    Withdrawal,
}

impl Operation {
    /// Canonical keyword, as written into transaction records.
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Deposit => "deposit",
            Operation::Withdrawal => "withdrawal",
        }
    }
}

impl FromStr for Operation {
    type Err = WalletError;

    /// Unrecognized keywords are rejected instead of being treated as withdrawals.
    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "deposit" => Ok(Operation::Deposit),
            "withdrawal" | "withdraw" => Ok(Operation::Withdrawal),
            _ => Err(WalletError::UnknownOperation(s.to_string())),
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A zero balance is (re)established by any movement, whatever its direction.
///
/// This means a withdrawal against an empty or fully drained wallet succeeds
/// and sets the balance to the withdrawn amount. Kept as-is pending a product
/// decision; see DESIGN.md.
pub fn is_bootstrap(current: Amount) -> bool {
    current.is_zero()
}

/// Parses an amount literal into a non-negative magnitude.
///
/// The sign is checked on the literal as written, before any conversion, so
/// `-0.00001` is negative while `-0` is zero. Literals with more than 4
/// decimal places or beyond [`Amount::MAX`] are invalid, never rounded.
pub fn parse_amount(raw: &str) -> Result<Amount> {
    let literal = raw.trim();
    let invalid = |reason: String| WalletError::InvalidAmount {
        amount: raw.to_string(),
        reason,
    };

    let value = Decimal::from_str(literal).map_err(|e| invalid(e.to_string()))?;

    // "withdraw -10" must not behave like "deposit 10".
    let has_nonzero_digit = literal.bytes().any(|b| matches!(b, b'1'..=b'9'));
    if value < Decimal::ZERO || (literal.starts_with('-') && has_nonzero_digit) {
        return Err(WalletError::NegativeAmount(literal.to_string()));
    }

    Amount::from_decimal(value).map_err(|e| invalid(e.to_string()))
}

/// Computes the new balance for one currency.
///
/// # Errors
///
/// - `InvalidAmount` if `raw_amount` is not a decimal literal, or the sum overflows
/// - `NegativeAmount` if the literal is below zero, for either operation
/// - `InsufficientFunds` if a withdrawal would take a non-zero balance below zero
pub fn calculate(operation: Operation, raw_amount: &str, current: Amount) -> Result<Amount> {
    let amount = parse_amount(raw_amount)?;

    if is_bootstrap(current) {
        return Ok(amount);
    }

    match operation {
        Operation::Deposit => {
            current
                .checked_add(amount)
                .ok_or_else(|| WalletError::InvalidAmount {
                    amount: raw_amount.to_string(),
                    reason: format!("balance overflow when adding to {}", current),
                })
        }
        Operation::Withdrawal => match current.checked_sub(amount) {
            Some(balance) if !balance.is_negative() => Ok(balance),
            _ => Err(WalletError::InsufficientFunds {
                balance: current.to_string(),
                requested: amount.to_string(),
            }),
        },
    }
}
