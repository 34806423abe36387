//! JSON envelopes shared by the HTTP handlers and the client gateways.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::catalog::ProductId;
use crate::domain::feedback::{Comment, Review};
use crate::domain::order::{CustomerDetails, OrderId, OrderStatus, PersistedOrder};
use crate::domain::pricing::{Amount, DeliveryArea};

// ── Orders ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderResponse {
    pub ok: bool,
    pub order_id: OrderId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateRequest {
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct StatusUpdateResponse {
    pub ok: bool,
    /// Number of orders changed; 0 when the id is unknown.
    pub updated: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemResponse {
    pub product_id: Option<ProductId>,
    pub name: String,
    pub price: Amount,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: OrderId,
    pub customer: CustomerDetails,
    pub delivery_area: DeliveryArea,
    pub delivery_fee: Amount,
    pub subtotal: Amount,
    pub total: Amount,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl From<PersistedOrder> for OrderResponse {
    fn from(order: PersistedOrder) -> Self {
        Self {
            id: order.id,
            customer: order.customer,
            delivery_area: order.delivery_area,
            delivery_fee: order.delivery_fee,
            subtotal: order.subtotal,
            total: order.total,
            status: order.status,
            created_at: order.created_at,
            items: order
                .lines
                .into_iter()
                .map(|l| OrderItemResponse {
                    product_id: l.product_id,
                    name: l.name,
                    price: l.unit_price,
                    quantity: l.quantity.into(),
                })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct OrdersResponse {
    pub ok: bool,
    pub orders: Vec<OrderResponse>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListOrdersParams {
    /// Only orders created on or after this day (YYYY-MM-DD).
    pub since: Option<NaiveDate>,
}

// ── Feedback ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ProductFilter {
    pub product_id: Option<ProductId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ReviewsResponse {
    pub ok: bool,
    pub reviews: Vec<Review>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CommentsResponse {
    pub ok: bool,
    pub comments: Vec<Comment>,
}

// ── Generic ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AckResponse {
    pub ok: bool,
}

impl AckResponse {
    pub const OK: AckResponse = AckResponse { ok: true };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PingResponse {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub ok: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: error.into(),
        }
    }
}
