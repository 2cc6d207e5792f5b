//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                       │
//! │                                                                   │
//! │  In floating point:                                               │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                     │
//! │                                                                   │
//! │  OUR SOLUTION: Integer Paise                                      │
//! │    ₹10.00 = 1000 paise. 1000 / 3 = 333 paise (×3 = 999).          │
//! │    We KNOW we lost 1 paisa, and handle it explicitly.             │
//! └───────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use khata_core::money::Money;
//!
//! // Create from paise (preferred)
//! let price = Money::from_paise(1250); // ₹12.50
//!
//! // Arithmetic operations
//! let doubled = price * 2;
//! let total = price + Money::from_paise(500);
//! assert_eq!(total.paise(), 1750);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in paise (the smallest rupee unit).
///
/// ## Design Decisions
/// - **i64 (signed)**: intermediate arithmetic may dip negative; persisted
///   amounts are validated non-negative before they reach storage
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Derives**: full serde support for JSON serialization
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from paise.
    ///
    /// ## Example
    /// ```rust
    /// use khata_core::money::Money;
    ///
    /// let price = Money::from_paise(1250); // ₹12.50
    /// assert_eq!(price.paise(), 1250);
    /// ```
    #[inline]
    pub const fn from_paise(paise: i64) -> Self {
        Money(paise)
    }

    /// Creates a Money value from whole rupees.
    #[inline]
    pub const fn from_rupees(rupees: i64) -> Self {
        Money(rupees * 100)
    }

    /// Returns the value in paise.
    #[inline]
    pub const fn paise(&self) -> i64 {
        self.0
    }

    /// Zero amount.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks whether the amount is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks whether the amount is strictly positive.
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Applies a basis-point fraction, truncating toward zero.
    ///
    /// Used for the ad-hoc product cost heuristic: 2000 paise at
    /// 7000 bps = 1400 paise.
    #[inline]
    pub const fn apply_bps(&self, bps: i64) -> Self {
        Money(self.0 * bps / 10_000)
    }

    /// Divides the total evenly by a count, truncating toward zero.
    ///
    /// Unit price of a line item: total amount / quantity. The
    /// remainder paisa (if any) stays in the total, never invented.
    #[inline]
    pub const fn div_quantity(&self, quantity: i64) -> Self {
        Money(self.0 / quantity)
    }
}

// =============================================================================
// Arithmetic Operators
// =============================================================================

impl Add for Money {
    type Output = Money;

    #[inline]
    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    #[inline]
    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Mul<i64> for Money {
    type Output = Money;

    #[inline]
    fn mul(self, rhs: i64) -> Money {
        Money(self.0 * rhs)
    }
}

// =============================================================================
// Display
// =============================================================================

/// Formats as rupees for logs and receipts: `₹12.50`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.abs();
        write!(f, "{}₹{}.{:02}", sign, abs / 100, abs % 100)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_paise_roundtrip() {
        assert_eq!(Money::from_paise(1250).paise(), 1250);
        assert_eq!(Money::from_rupees(12).paise(), 1200);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_paise(1000);
        let b = Money::from_paise(250);

        assert_eq!((a + b).paise(), 1250);
        assert_eq!((a - b).paise(), 750);
        assert_eq!((b * 3).paise(), 750);
    }

    #[test]
    fn test_apply_bps_truncates() {
        // ₹20 at 70% = ₹14 exactly
        assert_eq!(Money::from_paise(2000).apply_bps(7000).paise(), 1400);
        // 999 paise at 70% = 699.3 → 699
        assert_eq!(Money::from_paise(999).apply_bps(7000).paise(), 699);
    }

    #[test]
    fn test_div_quantity() {
        assert_eq!(Money::from_paise(4000).div_quantity(2).paise(), 2000);
        assert_eq!(Money::from_paise(1000).div_quantity(3).paise(), 333);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_paise(1250).to_string(), "₹12.50");
        assert_eq!(Money::from_paise(-550).to_string(), "-₹5.50");
        assert_eq!(Money::zero().to_string(), "₹0.00");
    }
}
