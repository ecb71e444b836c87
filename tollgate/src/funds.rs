//! Native-currency amount type for deposits, refunds, and revenue.
//!
//! Deposits in this system are wei-scale values (the canonical price is
//! 3,000,000,000,000,000), so amounts are carried as unsigned 128-bit
//! integers with checked arithmetic throughout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// An unsigned native-currency amount.
///
/// All ledger arithmetic goes through the checked methods; a wrap here
/// would silently corrupt escrow accounting.
///
/// # Examples
///
/// ```
/// use tollgate::Amount;
///
/// let price = Amount::new(3_000_000_000_000_000);
/// let deposit = Amount::new(2_000_000_000_000_000);
///
/// let shortfall = price.checked_sub(deposit).unwrap();
/// assert_eq!(shortfall.value(), 1_000_000_000_000_000);
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u128);

impl Amount {
    /// The zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from a raw value.
    #[must_use]
    pub const fn new(value: u128) -> Self {
        Self(value)
    }

    /// Returns the underlying value.
    #[must_use]
    pub const fn value(self) -> u128 {
        self.0
    }

    /// Returns `true` if the amount is zero.
    ///
    /// # Examples
    ///
    /// ```
    /// use tollgate::Amount;
    ///
    /// assert!(Amount::ZERO.is_zero());
    /// assert!(!Amount::new(1).is_zero());
    /// ```
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition. Returns `None` on overflow.
    #[must_use]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }

    /// Checked subtraction. Returns `None` on underflow.
    #[must_use]
    pub const fn checked_sub(self, other: Self) -> Option<Self> {
        match self.0.checked_sub(other.0) {
            Some(v) => Some(Self(v)),
            None => None,
        }
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u128> for Amount {
    fn from(value: u128) -> Self {
        Self(value)
    }
}

impl FromStr for Amount {
    type Err = InvalidAmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(InvalidAmountError {
                value: s.to_string(),
                reason: "amount must be non-empty".into(),
            });
        }
        trimmed
            .parse::<u128>()
            .map(Self)
            .map_err(|e| InvalidAmountError {
                value: s.to_string(),
                reason: format!("not a valid unsigned amount: {e}"),
            })
    }
}

/// Error type for unparseable amounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidAmountError {
    /// The offending input.
    pub value: String,
    /// The reason the input is invalid.
    pub reason: String,
}

impl fmt::Display for InvalidAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid amount '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for InvalidAmountError {}
