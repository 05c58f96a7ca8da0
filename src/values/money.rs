//! Currency-safe monetary amounts.
//!
//! [`Money`] stores an amount as a signed count of minor units (paise, cents)
//! so that every sum and difference is exact integer arithmetic. Decimal
//! values only appear at the serialization boundary.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Sub};

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Number of minor units in one major currency unit.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// A monetary amount in integer minor units.
///
/// Serialized as a decimal string with two fractional digits (`"15000.00"`).
/// Deserialization accepts strings or JSON numbers but rejects anything more
/// precise than one minor unit.
///
/// # Example
///
/// ```
/// use workforce_engine::values::Money;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// let basic = Money::from_decimal(Decimal::from_str("15000.50").unwrap()).unwrap();
/// assert_eq!(basic.minor_units(), 1_500_050);
/// assert_eq!(basic.to_string(), "15000.50");
/// assert!(Money::from_decimal(Decimal::from_str("0.005").unwrap()).is_none());
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    /// The zero amount.
    pub const ZERO: Money = Money(0);

    /// Creates an amount from a count of minor units.
    pub const fn from_minor(minor: i64) -> Self {
        Money(minor)
    }

    /// Creates an amount from whole major units.
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(MINOR_UNITS_PER_MAJOR))
    }

    /// Converts a decimal amount, returning `None` when it has sub-minor-unit
    /// precision or does not fit in the minor-unit range.
    pub fn from_decimal(value: Decimal) -> Option<Self> {
        let scaled = value.checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))?;
        if !scaled.fract().is_zero() {
            return None;
        }
        scaled.to_i64().map(Money)
    }

    /// Returns the amount as a count of minor units.
    pub const fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns the amount as a decimal with two fractional digits.
    pub fn to_decimal(self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns true if the amount is below zero.
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }
}

// Component amounts are bounded at intake, so saturation is unreachable in
// practice; it only keeps the operators total.
impl Add for Money {
    type Output = Money;

    fn add(self, other: Money) -> Money {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, other: Money) -> Money {
        Money(self.0.saturating_sub(other.0))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Money {
        iter.copied().sum()
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_decimal())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        Serialize::serialize(&self.to_decimal(), serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = <Decimal as Deserialize>::deserialize(deserializer)?;
        Money::from_decimal(value).ok_or_else(|| {
            serde::de::Error::custom(format!(
                "amount {value} has more than two decimal places or is out of range"
            ))
        })
    }
}
