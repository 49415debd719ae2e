//! # Money Module
//!
//! Provides the `Money` type for nightly prices.
//!
//! ## Minor vs Major Units
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  properties.cost_per_night is stored in CENTS (minor units)            │
//! │                                                                         │
//! │    93061 cents  ──►  Money::from_cents(93061)  ──►  "$930.61"          │
//! │                                                                         │
//! │  Guests filter in DOLLARS (major units)                                │
//! │                                                                         │
//! │    "minimum_price_per_night": 100  ──►  cost_per_night / 100 > 100     │
//! │                                                                         │
//! │  The comparison truncates: $100.99 (10099 cents) is NOT above $100     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use lightbnb_core::money::Money;
//!
//! let price = Money::from_cents(93061);
//! assert_eq!(price.dollars(), 930);
//! assert_eq!(price.to_string(), "$930.61");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Number of minor units in one major unit.
pub const CENTS_PER_DOLLAR: i64 = 100;

/// A monetary value in the smallest currency unit (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use lightbnb_core::money::Money;
    ///
    /// let price = Money::from_cents(1099);
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar part, truncated toward zero.
    ///
    /// This is the same truncation SQLite applies to
    /// `cost_per_night / 100`, so it is what price filters compare against.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / CENTS_PER_DOLLAR
    }

    /// Returns the cents part (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % CENTS_PER_DOLLAR).abs()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_cents() {
        let money = Money::from_cents(1099);
        assert_eq!(money.cents(), 1099);
        assert_eq!(money.dollars(), 10);
        assert_eq!(money.cents_part(), 99);
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Money::from_cents(1099)), "$10.99");
        assert_eq!(format!("{}", Money::from_cents(500)), "$5.00");
        assert_eq!(format!("{}", Money::from_cents(-550)), "-$5.50");
        assert_eq!(format!("{}", Money::from_cents(0)), "$0.00");
    }

    #[test]
    fn test_dollars_truncate_like_sql_division() {
        // 10099 / 100 = 100 in integer division, so $100.99 is not "> 100"
        assert_eq!(Money::from_cents(10099).dollars(), 100);
        assert_eq!(Money::from_cents(10100).dollars(), 101);
    }

    #[test]
    fn test_ordering() {
        assert!(Money::from_cents(199) < Money::from_cents(200));
    }
}
