use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::ProductId;
use super::errors::DomainError;
use super::pricing::{self, Amount, DeliveryArea, PricedLine, Quote};
use super::quantity::Quantity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct OrderId(pub i64);

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| DomainError::Validation(format!("invalid status '{}'", s.trim())))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── Request payload ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDetails {
    pub name: String,
    pub address: String,
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Snapshot of one cart line at submission time. Name and price are copied so
/// the stored order is independent of later catalog edits.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRequest {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: Amount,
    pub quantity: i64,
}

/// Checkout submission. `subtotal`, `delivery_fee` and `total` are the
/// client's estimate and are never persisted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub customer: CustomerDetails,
    pub delivery_area: DeliveryArea,
    #[serde(default)]
    pub subtotal: Option<Amount>,
    #[serde(default)]
    pub delivery_fee: Option<Amount>,
    #[serde(default)]
    pub total: Option<Amount>,
    pub items: Vec<OrderItemRequest>,
}

// ── Validated / persisted forms ──────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLine {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub unit_price: Amount,
    pub quantity: Quantity,
}

impl PricedLine for OrderLine {
    fn unit_price(&self) -> Amount {
        self.unit_price
    }

    fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// An order that passed boundary validation, priced by the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedOrder {
    pub customer: CustomerDetails,
    pub delivery_area: DeliveryArea,
    pub lines: Vec<OrderLine>,
    pub quote: Quote,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedOrder {
    pub id: OrderId,
    pub customer: CustomerDetails,
    pub delivery_area: DeliveryArea,
    pub delivery_fee: Amount,
    pub subtotal: Amount,
    pub total: Amount,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<OrderLine>,
}

fn required(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::Validation(format!("{field} is required")));
    }
    Ok(trimmed.to_string())
}

impl OrderRequest {
    /// Validate the payload and recompute its pricing from the submitted unit
    /// prices and the server fee table.
    pub fn validate(self) -> Result<ValidatedOrder, DomainError> {
        let name = required("name", &self.customer.name)?;
        let address = required("address", &self.customer.address)?;
        let phone = required("phone", &self.customer.phone)?;

        let email = match self.customer.email {
            Some(email) => {
                let email = email.trim().to_string();
                if email.is_empty() || !email.contains('@') {
                    return Err(DomainError::Validation(format!(
                        "email '{email}' is not a valid address"
                    )));
                }
                Some(email)
            }
            None => None,
        };
        let note = self.customer.note.map(|n| n.trim().to_string());

        if self.items.is_empty() {
            return Err(DomainError::validation("items must not be empty"));
        }

        let mut lines = Vec::with_capacity(self.items.len());
        for item in self.items {
            let quantity = Quantity::try_from(item.quantity)
                .map_err(|e| DomainError::Validation(format!("item '{}': {e}", item.name)))?;
            let item_name = item.name.trim();
            if item_name.is_empty() || item.price <= 0 {
                warn!(
                    "dropping unpriced order item (product {:?}, price {})",
                    item.product_id, item.price
                );
                continue;
            }
            lines.push(OrderLine {
                product_id: item.product_id,
                name: item_name.to_string(),
                unit_price: item.price,
                quantity,
            });
        }
        if lines.is_empty() {
            return Err(DomainError::validation("no valid items"));
        }

        let quote = pricing::quote(&lines, self.delivery_area);
        let client = (self.subtotal, self.delivery_fee, self.total);
        if client != (None, None, None)
            && client
                != (
                    Some(quote.subtotal),
                    Some(quote.delivery_fee),
                    Some(quote.total),
                )
        {
            warn!(
                "client totals {:?} differ from server quote {:?}; using server quote",
                client, quote
            );
        }

        Ok(ValidatedOrder {
            customer: CustomerDetails {
                name,
                address,
                phone,
                email,
                note,
            },
            delivery_area: self.delivery_area,
            lines,
            quote,
        })
    }
}
