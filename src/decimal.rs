//! Fixed-point monetary amount with 4 decimal places.
//!
//! Balances and requested deltas are both `Amount`s. Values are kept in
//! `rust_decimal` with the scale pinned so that persisted balances encode
//! the same way no matter how the literal that produced them was written.

use crate::error::AmountError;
use rust_decimal::Decimal;
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A decimal amount that always carries exactly 4 decimal places.
///
/// Magnitudes are bounded by [`Amount::MAX`], the largest 96-bit mantissa at
/// scale 4, so every amount can be held at that scale without rounding.
///
/// # Examples
///
/// ```
/// use std::str::FromStr;
/// use wallet_ledger::Amount;
///
/// let amount = Amount::from_str("10.5").unwrap();
/// assert_eq!(amount.to_string(), "10.5000");
///
/// assert!(Amount::from_str("0.00001").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    /// Number of decimal places every amount is held at.
    pub const SCALE: u32 = 4;

    pub const ZERO: Self = Amount(Decimal::ZERO);

    /// 7922816251426433759354395.0335
    pub const MAX: Self = Amount(Decimal::from_parts(
        u32::MAX,
        u32::MAX,
        u32::MAX,
        false,
        Self::SCALE,
    ));

    /// Converts a `Decimal` without rounding.
    ///
    /// Fails if the value has significant digits past the fourth decimal
    /// place or its magnitude is above [`Amount::MAX`].
    pub fn from_decimal(value: Decimal) -> Result<Self, AmountError> {
        if value.normalize().scale() > Self::SCALE {
            return Err(AmountError::TooPrecise { max: Self::SCALE });
        }
        if value.abs() > Self::MAX.0 {
            return Err(AmountError::OutOfRange {
                max: Self::MAX.to_string(),
            });
        }

        let mut scaled = value;
        scaled.rescale(Self::SCALE);
        // -0.0000 compares equal to zero but would print with a sign.
        if scaled.is_zero() {
            scaled.set_sign_positive(true);
        }
        Ok(Amount(scaled))
    }

    /// Rounds `value` to 4 decimal places.
    ///
    /// Only for values already known to be within [`Amount::MAX`]; used where
    /// the source is inexact, such as legacy float balances.
    pub fn new(value: Decimal) -> Self {
        let rounded = value.round_dp(Self::SCALE).min(Self::MAX.0).max(-Self::MAX.0);
        // Cannot fail: rounded and clamped above.
        Amount::from_decimal(rounded).unwrap_or(Amount::ZERO)
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    /// Returns `true` for values strictly below zero. Negative zero is not negative.
    pub fn is_negative(&self) -> bool {
        self.0 < Decimal::ZERO
    }

    /// Adds two amounts, returning `None` if the result exceeds [`Amount::MAX`].
    pub fn checked_add(self, rhs: Self) -> Option<Self> {
        self.0
            .checked_add(rhs.0)
            .and_then(|sum| Amount::from_decimal(sum).ok())
    }

    /// Subtracts `rhs`, returning `None` if the result exceeds [`Amount::MAX`].
    ///
    /// The result may be negative; callers decide whether that is allowed.
    pub fn checked_sub(self, rhs: Self) -> Option<Self> {
        self.0
            .checked_sub(rhs.0)
            .and_then(|diff| Amount::from_decimal(diff).ok())
    }

    pub fn as_decimal(&self) -> Decimal {
        self.0
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let decimal = Decimal::from_str(s.trim())?;
        Amount::from_decimal(decimal)
    }
}

impl fmt::Display for Amount {
    /// The inner value is always at scale 4, so its own rendering already has
    /// exactly 4 decimal places.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

/// Accepts both `"12.5"` and `12.5`, since older wallet states were written
/// with plain JSON numbers.
impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(AmountVisitor)
    }
}

struct AmountVisitor;

impl<'de> Visitor<'de> for AmountVisitor {
    type Value = Amount;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a decimal amount as a string or number")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<Amount, E> {
        Amount::from_str(v).map_err(E::custom)
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<Amount, E> {
        Amount::from_decimal(Decimal::from(v)).map_err(E::custom)
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<Amount, E> {
        Amount::from_decimal(Decimal::from(v)).map_err(E::custom)
    }

    /// Float balances are inexact, so they are rounded to 4 places.
    fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<Amount, E> {
        if !v.is_finite() {
            return Err(E::custom(format!("non-finite amount {}", v)));
        }
        // Go through the shortest round-trip text so 0.1 stays 0.1.
        let decimal = Decimal::from_str(&v.to_string()).map_err(E::custom)?;
        Amount::from_decimal(decimal.round_dp(Amount::SCALE)).map_err(E::custom)
    }
}
