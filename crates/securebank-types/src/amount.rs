//! Fixed-point currency amounts
//!
//! The ledger does all arithmetic in integer minor units (cents) to keep the
//! conservation invariant exact. Floating point never touches a balance.

use crate::{LedgerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Minor units per major unit (cents per dollar)
pub const MINOR_PER_MAJOR: u64 = 100;

/// A non-negative currency amount in minor units
///
/// Balances and transfer amounts are always `Amount`s. Arithmetic is checked;
/// overflow and underflow surface as ledger errors rather than wrapping.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(u64);

impl Amount {
    /// Create an amount from minor units (cents)
    pub const fn from_minor(minor: u64) -> Self {
        Self(minor)
    }

    /// Create an amount from whole major units (dollars)
    pub const fn from_major(major: u64) -> Self {
        Self(major * MINOR_PER_MAJOR)
    }

    /// Create a zero amount
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Raw value in minor units
    pub const fn minor(&self) -> u64 {
        self.0
    }

    /// Check if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    pub fn checked_add(self, other: Self) -> Result<Self> {
        self.0
            .checked_add(other.0)
            .map(Self)
            .ok_or(LedgerError::AmountOverflow)
    }

    /// Checked subtraction; underflow means the caller asked for more than is there
    pub fn checked_sub(self, other: Self) -> Result<Self> {
        self.0
            .checked_sub(other.0)
            .map(Self)
            .ok_or(LedgerError::AmountUnderflow)
    }

    /// Saturating subtraction, for display math only
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "${}.{:02}",
            self.0 / MINOR_PER_MAJOR,
            self.0 % MINOR_PER_MAJOR
        )
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    /// Parse a decimal string like `"123.45"` or `"50"`
    ///
    /// Rejects negative values, more than two fractional digits, and anything
    /// that is not a plain decimal number. A leading `$` is tolerated.
    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim().strip_prefix('$').unwrap_or(s.trim());
        if s.is_empty() {
            return Err(LedgerError::invalid_amount("empty amount"));
        }
        if s.starts_with('-') || s.starts_with('+') {
            return Err(LedgerError::invalid_amount("amount must be an unsigned decimal"));
        }

        let (major_str, frac_str) = match s.split_once('.') {
            Some((m, f)) => (m, f),
            None => (s, ""),
        };

        if major_str.is_empty() || !major_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::invalid_amount("malformed amount"));
        }
        if frac_str.len() > 2 {
            return Err(LedgerError::invalid_amount(
                "amounts are limited to two decimal places",
            ));
        }
        if !frac_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(LedgerError::invalid_amount("malformed amount"));
        }

        let major: u64 = major_str
            .parse()
            .map_err(|_| LedgerError::invalid_amount("amount out of range"))?;

        // "5" -> 50 cents if one digit, "05" -> 5 cents if two
        let minor_part: u64 = if frac_str.is_empty() {
            0
        } else {
            let parsed: u64 = frac_str
                .parse()
                .map_err(|_| LedgerError::invalid_amount("malformed amount"))?;
            if frac_str.len() == 1 {
                parsed * 10
            } else {
                parsed
            }
        };

        major
            .checked_mul(MINOR_PER_MAJOR)
            .and_then(|m| m.checked_add(minor_part))
            .map(Self)
            .ok_or(LedgerError::AmountOverflow)
    }
}
