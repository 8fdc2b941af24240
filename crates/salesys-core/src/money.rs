//! # Money Module
//!
//! Provides the `Money` type for handling monetary values safely.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing line subtotals as floats drifts:                               │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents                                            │
//! │    Every line subtotal, the cart subtotal and the total are exact      │
//! │    integers. Rounding happens once, when tax is derived.               │
//! │                                                                         │
//! │  The backend still speaks two-decimal numbers; conversion happens at   │
//! │  the boundary only (see `wire::money`).                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use salesys_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let doubled = price.checked_mul(2);  // Some($21.98)
//! let total = price + Money::from_cents(500); // $15.99
//! assert_eq!(doubled, Some(Money::from_cents(2198)));
//! assert_eq!(total.to_string(), "$15.99");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

// =============================================================================
// Money Type
// =============================================================================

/// Represents a monetary value in the smallest currency unit (cents).
///
/// ## Where Money is Used
/// ```text
/// Product.price ──► LineItem.unit_price ──► LineItem.line_subtotal
///                                                  │
///            CartEngine.subtotal ◄─────────────────┘
///                    │
///                    ├──► taxes (16%, rounded to the cent)
///                    │
///                    └──► total ──► create_sale payload (two decimals)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents (the smallest currency unit).
    ///
    /// ## Example
    /// ```rust
    /// use salesys_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Converts a two-decimal number received from the backend into cents.
    ///
    /// The value is rounded to the nearest cent, so `5.499999` becomes `$5.50`.
    /// Only the wire adapters should need this.
    ///
    /// ## Example
    /// ```rust
    /// use salesys_core::money::Money;
    ///
    /// assert_eq!(Money::from_decimal(10.0).cents(), 1000);
    /// assert_eq!(Money::from_decimal(0.1 + 0.2).cents(), 30);
    /// ```
    pub fn from_decimal(value: f64) -> Self {
        Money((value * 100.0).round() as i64)
    }

    /// Returns the two-decimal number the backend expects.
    #[inline]
    pub fn to_decimal(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Returns the value in cents (smallest currency unit).
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
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

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax, rounding half up to the cent.
    ///
    /// ## Implementation
    /// Integer math: `(amount * bps + 5000) / 10000`.
    /// The +5000 provides rounding (5000/10000 = 0.5).
    ///
    /// ## Example
    /// ```rust
    /// use salesys_core::money::Money;
    /// use salesys_core::types::TaxRate;
    ///
    /// let subtotal = Money::from_cents(2550); // $25.50
    /// let tax = subtotal.calculate_tax(TaxRate::from_bps(1600));
    /// assert_eq!(tax.cents(), 408); // $4.08
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        // i128 keeps large subtotals from overflowing the intermediate product
        let tax_cents = (self.0 as i128 * rate.bps() as i128 + 5000) / 10000;
        Money::from_cents(tax_cents as i64)
    }

    /// Multiplies money by a quantity, or `None` if the result does not fit.
    ///
    /// ## Example
    /// ```rust
    /// use salesys_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299); // $2.99
    /// assert_eq!(unit_price.checked_mul(3), Some(Money::from_cents(897)));
    /// assert_eq!(unit_price.checked_mul(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul(self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(self, other: Self) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Shows money as `$12.34`.
///
/// ## Note
/// The desktop layer formats with the configured currency symbol; this is the
/// default used in logs and notifications.
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

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
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
    fn test_decimal_conversion_rounds_to_cents() {
        assert_eq!(Money::from_decimal(5.5).cents(), 550);
        assert_eq!(Money::from_decimal(19.99).cents(), 1999);
        assert_eq!(Money::from_decimal(4.005 + 0.0000001).cents(), 401);
        assert_eq!(Money::from_cents(408).to_decimal(), 4.08);
    }

    #[test]
    fn test_repeated_addition_does_not_drift() {
        let dime = Money::from_cents(10);
        let total: Money = std::iter::repeat(dime).take(1000).sum();
        assert_eq!(total.cents(), 10_000);

        // The float equivalent drifts away from 100.0
        let float_total: f64 = std::iter::repeat(0.1).take(1000).sum();
        assert_ne!(float_total, 100.0);
    }

    #[test]
    fn test_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.checked_mul(3), Some(Money::from_cents(3000)));
    }

    #[test]
    fn test_checked_arithmetic_overflow() {
        let huge = Money::from_cents(i64::MAX / 2 + 1);
        assert_eq!(huge.checked_mul(2), None);
        assert_eq!(huge.checked_add(huge), None);
        assert_eq!(
            Money::from_cents(i64::MAX / 4).checked_mul(2),
            Some(Money::from_cents(i64::MAX / 4 * 2))
        );
    }

    #[test]
    fn test_tax_calculation_sixteen_percent() {
        let rate = TaxRate::from_bps(1600);
        assert_eq!(Money::from_cents(1000).calculate_tax(rate).cents(), 160);
        assert_eq!(Money::from_cents(2550).calculate_tax(rate).cents(), 408);
        // $0.03 × 16% = $0.0048 → $0.00
        assert_eq!(Money::from_cents(3).calculate_tax(rate).cents(), 0);
        // $0.04 × 16% = $0.0064 → $0.01
        assert_eq!(Money::from_cents(4).calculate_tax(rate).cents(), 1);
    }

    #[test]
    fn test_zero() {
        let zero = Money::zero();
        assert!(zero.is_zero());
        assert!(!zero.is_negative());
        assert_eq!(Money::default(), zero);
    }
}
