//! Unit quantity type for RSU amounts
//!
//! Grants may split into fractional units, so quantities are held as
//! `rust_decimal::Decimal` rather than floats. Splits are truncated to
//! [`UNIT_SCALE`] decimal places and the remainder is assigned explicitly by
//! the caller, which keeps sums exact.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Sub};
use std::str::FromStr;

use crate::error::PortalError;

/// Decimal places kept when dividing a grant into events
pub const UNIT_SCALE: u32 = 6;

/// A quantity of restricted stock units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Units(Decimal);

impl Units {
    /// Wrap a decimal quantity
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Whole number of units
    pub fn from_whole(units: i64) -> Self {
        Self(Decimal::from(units))
    }

    /// Zero units
    pub const fn zero() -> Self {
        Self(Decimal::ZERO)
    }

    /// The underlying decimal
    pub const fn as_decimal(&self) -> Decimal {
        self.0
    }

    /// One unit of the last kept decimal place (0.000001)
    pub fn smallest() -> Self {
        Self(Decimal::new(1, UNIT_SCALE))
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0 > Decimal::ZERO
    }

    /// Split into `parts` equal shares, truncated to [`UNIT_SCALE`] places
    ///
    /// Returns `None` when `parts` is zero.
    pub fn share_of(&self, parts: u32) -> Option<Self> {
        if parts == 0 {
            return None;
        }
        let share = self.0 / Decimal::from(parts);
        Some(Self(
            share.round_dp_with_strategy(UNIT_SCALE, RoundingStrategy::ToZero),
        ))
    }

    /// Parse a unit quantity such as "4800" or "1250.5"
    pub fn parse(s: &str) -> Result<Self, PortalError> {
        Decimal::from_str(s.trim())
            .map(Self)
            .map_err(|e| PortalError::InvalidInput(format!("Invalid unit amount '{}': {}", s, e)))
    }
}

impl Default for Units {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for Units {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.normalize())
    }
}

impl FromStr for Units {
    type Err = PortalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Add for Units {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self(self.0 + other.0)
    }
}

impl AddAssign for Units {
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Units {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl Mul<u32> for Units {
    type Output = Self;

    fn mul(self, factor: u32) -> Self {
        Self(self.0 * Decimal::from(factor))
    }
}

impl std::iter::Sum for Units {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Units::zero(), |acc, u| acc + u)
    }
}

impl<'a> std::iter::Sum<&'a Units> for Units {
    fn sum<I: Iterator<Item = &'a Units>>(iter: I) -> Self {
        iter.fold(Units::zero(), |acc, u| acc + *u)
    }
}
