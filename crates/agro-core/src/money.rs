//! # Money Module
//!
//! Provides the `Money` type for menu prices, line totals and revenue.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Every price on the menu is a whole number of the smallest unit the    │
//! │  counter deals in (₹1 for the default menu). Totals are sums of        │
//! │  products of integers, so they stay exact:                             │
//! │                                                                         │
//! │    Chicken Rice ₹100 × 2  +  Chapati ₹20 × 3  =  ₹260                   │
//! │                                                                         │
//! │  Only the display layer (MoneyFormat) decides how many of those units  │
//! │  make one major unit.                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use agro_core::money::{Money, MoneyFormat};
//!
//! let price = Money::from_minor(100);
//! let line = price.multiply_quantity(2);
//! assert_eq!(line.minor(), 200);
//!
//! let fmt = MoneyFormat::new("₹", 0);
//! assert_eq!(fmt.format(line), "₹200");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit.
///
/// ## Design Decisions
/// - **i64 (signed)**: arithmetic never has to special-case underflow
/// - **Saturating arithmetic**: values restored from storage can be
///   anything, so sums and products clamp at the `i64` bounds
/// - **Single field tuple struct**: serializes as a bare JSON number, which
///   is how prices and totals are stored
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize, TS,
)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from minor units.
    #[inline]
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Returns the value in minor units.
    #[inline]
    pub const fn minor(&self) -> i64 {
        self.0
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## Example
    /// ```rust
    /// use agro_core::money::Money;
    ///
    /// let unit_price = Money::from_minor(25); // Parotta
    /// assert_eq!(unit_price.multiply_quantity(4).minor(), 100);
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: u32) -> Self {
        Money(self.0.saturating_mul(qty as i64))
    }
}

/// Shows the amount with the default counter format (`₹`, no decimals).
///
/// ## Note
/// Receipts and views go through [`MoneyFormat`] so the shop's configured
/// symbol and precision are used.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&MoneyFormat::default().format(*self))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        self.multiply_quantity(qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

// =============================================================================
// Money Format
// =============================================================================

/// How amounts are shown on screen and on receipts.
///
/// ## Examples
/// ```text
/// MoneyFormat::new("₹", 0)  →  260     → "₹260"
/// MoneyFormat::new("$", 2)  →  1234    → "$12.34"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoneyFormat {
    /// Symbol placed in front of the amount
    pub symbol: String,

    /// Number of minor-unit digits shown after the decimal point
    pub decimals: u8,
}

impl MoneyFormat {
    pub fn new(symbol: impl Into<String>, decimals: u8) -> Self {
        MoneyFormat {
            symbol: symbol.into(),
            decimals,
        }
    }

    /// Formats an amount as `<sign><symbol><whole>[.<fraction>]`.
    pub fn format(&self, amount: Money) -> String {
        let minor = amount.minor();
        let sign = if minor < 0 { "-" } else { "" };

        if self.decimals == 0 {
            return format!("{}{}{}", sign, self.symbol, minor.unsigned_abs());
        }

        // 10^19 is the largest power of ten that fits a u64
        let decimals = self.decimals.min(19);
        let divisor = 10_u64.pow(decimals as u32);
        let abs = minor.unsigned_abs();
        format!(
            "{}{}{}.{:0width$}",
            sign,
            self.symbol,
            abs / divisor,
            abs % divisor,
            width = decimals as usize
        )
    }
}

impl Default for MoneyFormat {
    fn default() -> Self {
        MoneyFormat::new("₹", 0)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
