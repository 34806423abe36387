use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("quantity {0} is outside {}..={}", Quantity::MIN, Quantity::MAX)]
pub struct QuantityOutOfRange(pub i64);

/// Number of units of one product on a cart or order line, always within
/// `Quantity::MIN..=Quantity::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct Quantity(u8);

impl Quantity {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub const ONE: Quantity = Quantity(Self::MIN);

    /// Clamp any integer into range. Used on interactive paths where the
    /// user's intent is obvious (e.g. typing 15 into a spinner).
    pub fn clamped(value: i64) -> Self {
        let clamped = value.clamp(i64::from(Self::MIN), i64::from(Self::MAX));
        Quantity(clamped as u8)
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// Add `extra` units, saturating at `MAX`.
    pub fn saturating_add(self, extra: Quantity) -> Self {
        Quantity(self.0.saturating_add(extra.0).min(Self::MAX))
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityOutOfRange;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        if (i64::from(Self::MIN)..=i64::from(Self::MAX)).contains(&value) {
            Ok(Quantity(value as u8))
        } else {
            Err(QuantityOutOfRange(value))
        }
    }
}

impl From<Quantity> for i64 {
    fn from(q: Quantity) -> Self {
        i64::from(q.0)
    }
}

impl From<Quantity> for i32 {
    fn from(q: Quantity) -> Self {
        i32::from(q.0)
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
