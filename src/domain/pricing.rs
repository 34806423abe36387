//! Pricing engine: line totals, delivery fees and order totals.
//!
//! Every amount is an integer in the smallest currency unit. The same
//! functions price the client-side cart estimate and the server-side
//! recomputation, so both always agree on the fee table.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::catalog::Product;
use super::quantity::Quantity;

pub type Amount = i64;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown delivery area '{0}'")]
pub struct InvalidAreaError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryArea {
    Dhaka,
    Outside,
}

impl DeliveryArea {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryArea::Dhaka => "dhaka",
            DeliveryArea::Outside => "outside",
        }
    }
}

impl FromStr for DeliveryArea {
    type Err = InvalidAreaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "dhaka" => Ok(DeliveryArea::Dhaka),
            "outside" => Ok(DeliveryArea::Outside),
            other => Err(InvalidAreaError(other.to_string())),
        }
    }
}

impl fmt::Display for DeliveryArea {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Flat delivery fee per area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeeTable {
    pub dhaka: Amount,
    pub outside: Amount,
}

impl FeeTable {
    pub fn fee(&self, area: DeliveryArea) -> Amount {
        match area {
            DeliveryArea::Dhaka => self.dhaka,
            DeliveryArea::Outside => self.outside,
        }
    }
}

pub const DELIVERY_FEES: FeeTable = FeeTable {
    dhaka: 29,
    outside: 99,
};

/// Anything that contributes `unit_price * quantity` to a subtotal.
pub trait PricedLine {
    fn unit_price(&self) -> Amount;
    fn quantity(&self) -> Quantity;

    fn line_total(&self) -> Amount {
        self.unit_price().saturating_mul(i64::from(self.quantity()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub subtotal: Amount,
    pub delivery_fee: Amount,
    pub total: Amount,
}

pub fn line_total(product: &Product, quantity: Quantity) -> Amount {
    product.unit_price().saturating_mul(i64::from(quantity))
}

pub fn subtotal<'a, L, I>(lines: I) -> Amount
where
    L: PricedLine + 'a,
    I: IntoIterator<Item = &'a L>,
{
    lines
        .into_iter()
        .fold(0, |acc: Amount, line| acc.saturating_add(line.line_total()))
}

pub fn delivery_fee(area: DeliveryArea) -> Amount {
    DELIVERY_FEES.fee(area)
}

/// Fee lookup for an untyped area code; never falls back to a default area.
pub fn delivery_fee_for(code: &str) -> Result<Amount, InvalidAreaError> {
    code.parse::<DeliveryArea>().map(delivery_fee)
}

pub fn order_total<'a, L, I>(lines: I, area: DeliveryArea) -> Amount
where
    L: PricedLine + 'a,
    I: IntoIterator<Item = &'a L>,
{
    quote(lines, area).total
}

pub fn quote<'a, L, I>(lines: I, area: DeliveryArea) -> Quote
where
    L: PricedLine + 'a,
    I: IntoIterator<Item = &'a L>,
{
    let subtotal = subtotal(lines);
    let delivery_fee = delivery_fee(area);
    Quote {
        subtotal,
        delivery_fee,
        total: subtotal.saturating_add(delivery_fee),
    }
}
