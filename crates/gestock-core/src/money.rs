//! # Money Module
//!
//! Provides the `Money` type for FCFA amounts.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  Summing thousands of sale totals as f64 drifts:                        │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌ WRONG!                           │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Centimes                                         │
//! │    5 200 FCFA = 520 000 centimes                                        │
//! │    Monthly sums, margins and stock valuations stay exact                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! The backend stores prices in DECIMAL columns and returns them either as
//! JSON numbers (`7500`) or as strings (`"7500.00"`). Both are accepted on
//! the way in; amounts are always written back as plain JSON numbers.
//!
//! ## Usage
//! ```rust
//! use gestock_core::money::Money;
//!
//! let price = Money::from_units(7500);
//! let total = price * 3;
//! assert_eq!(total.format_price(), "22 500 FCFA");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use ts_rs::TS;

/// Centimes per FCFA unit.
const CENTIMES_PER_UNIT: i64 = 100;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centimes of FCFA.
///
/// ## Where Money is Used
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Product.prix_achat / prix_vente ──► stock valuation, margin            │
/// │                                                                         │
/// │  Purchase.prix_unitaire × quantite ──► Purchase.prix_total              │
/// │  Sale.prix_unitaire × quantite     ──► Sale.prix_total                  │
/// │                                                                         │
/// │  Σ Sale.prix_total − Σ Purchase.prix_total ──► monthly profit           │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centimes.
    #[inline]
    pub const fn from_centimes(centimes: i64) -> Self {
        Money(centimes)
    }

    /// Creates a Money value from whole FCFA.
    ///
    /// ```rust
    /// use gestock_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(5000).centimes(), 500_000);
    /// ```
    #[inline]
    pub const fn from_units(units: i64) -> Self {
        Money(units * CENTIMES_PER_UNIT)
    }

    /// Returns the value in centimes.
    #[inline]
    pub const fn centimes(&self) -> i64 {
        self.0
    }

    /// Returns the value in whole FCFA, rounded half away from zero.
    ///
    /// ```rust
    /// use gestock_core::money::Money;
    ///
    /// assert_eq!(Money::from_centimes(1050).units(), 11);
    /// assert_eq!(Money::from_centimes(-1050).units(), -11);
    /// assert_eq!(Money::from_centimes(1049).units(), 10);
    /// ```
    #[inline]
    pub const fn units(&self) -> i64 {
        let half = CENTIMES_PER_UNIT / 2;
        if self.0 >= 0 {
            (self.0 + half) / CENTIMES_PER_UNIT
        } else {
            (self.0 - half) / CENTIMES_PER_UNIT
        }
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity.
    ///
    /// ## User Workflow
    /// ```text
    /// Purchase form: 10 × 5 200 FCFA
    ///      │
    ///      ▼
    /// multiply_quantity(10) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// prix_total: 52 000 FCFA
    /// ```
    #[inline]
    pub const fn multiply_quantity(&self, qty: i64) -> Self {
        Money(self.0 * qty)
    }

    /// Parses a decimal amount such as `"5000"`, `"5000.00"` or `"1 200,50"`.
    ///
    /// Spaces are ignored and a comma is accepted as the decimal separator.
    /// Digits past the second decimal are rounded half away from zero.
    /// Returns `None` for anything that is not a plain decimal number.
    ///
    /// ```rust
    /// use gestock_core::money::Money;
    ///
    /// assert_eq!(Money::parse("5000.00"), Some(Money::from_units(5000)));
    /// assert_eq!(Money::parse(" 12,5 "), Some(Money::from_centimes(1250)));
    /// assert_eq!(Money::parse("abc"), None);
    /// ```
    pub fn parse(input: &str) -> Option<Money> {
        let cleaned: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| if c == ',' { '.' } else { c })
            .collect();

        let (negative, body) = match cleaned.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, cleaned.strip_prefix('+').unwrap_or(cleaned.as_str())),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((i, f)) => (i, f),
            None => (body, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return None;
        }
        if !int_part.chars().all(|c| c.is_ascii_digit())
            || !frac_part.chars().all(|c| c.is_ascii_digit())
        {
            return None;
        }

        let units: i64 = if int_part.is_empty() {
            0
        } else {
            int_part.parse().ok()?
        };

        let mut frac_digits = frac_part.bytes().map(|b| i64::from(b - b'0'));
        let tenths = frac_digits.next().unwrap_or(0);
        let hundredths = frac_digits.next().unwrap_or(0);
        let round_up = frac_digits.next().map(|d| d >= 5).unwrap_or(false);

        let mut centimes = units
            .checked_mul(CENTIMES_PER_UNIT)?
            .checked_add(tenths * 10 + hundredths)?;
        if round_up {
            centimes = centimes.checked_add(1)?;
        }

        Some(Money(if negative { -centimes } else { centimes }))
    }

    /// Formats the amount for display: French digit grouping, no decimals.
    ///
    /// ```rust
    /// use gestock_core::money::Money;
    ///
    /// assert_eq!(Money::from_units(7500).format_price(), "7 500 FCFA");
    /// assert_eq!(Money::from_units(-1200).format_price(), "-1 200 FCFA");
    /// ```
    pub fn format_price(&self) -> String {
        let units = self.units();
        let digits = units.unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push(' ');
            }
            grouped.push(ch);
        }

        if units < 0 {
            format!("-{} FCFA", grouped)
        } else {
            format!("{} FCFA", grouped)
        }
    }

    /// Returns `part / whole × 100`, or `0.0` when `whole` is not positive.
    ///
    /// Used for the profit margin shown on the dashboard.
    pub fn percentage(part: Money, whole: Money) -> f64 {
        if whole.0 <= 0 {
            return 0.0;
        }
        part.0 as f64 / whole.0 as f64 * 100.0
    }

    fn as_f64_units(&self) -> f64 {
        self.0 as f64 / CENTIMES_PER_UNIT as f64
    }
}

// =============================================================================
// Serde
// =============================================================================

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % CENTIMES_PER_UNIT == 0 {
            serializer.serialize_i64(self.0 / CENTIMES_PER_UNIT)
        } else {
            serializer.serialize_f64(self.as_f64_units())
        }
    }
}

struct MoneyVisitor;

impl<'de> Visitor<'de> for MoneyVisitor {
    type Value = Money;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("an amount as a number or a decimal string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Money, E> {
        v.checked_mul(CENTIMES_PER_UNIT)
            .map(Money)
            .ok_or_else(|| E::custom("amount out of range"))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Money, E> {
        let v = i64::try_from(v).map_err(|_| E::custom("amount out of range"))?;
        self.visit_i64(v)
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Money, E> {
        if !v.is_finite() {
            return Err(E::custom("amount is not finite"));
        }
        Ok(Money((v * CENTIMES_PER_UNIT as f64).round() as i64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Money, E> {
        Money::parse(v).ok_or_else(|| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(MoneyVisitor)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format_price())
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

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(-self.0)
    }
}

/// Multiplication by a quantity.
impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
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
