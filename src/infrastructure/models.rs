use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::catalog::ProductId;
use crate::domain::errors::DomainError;
use crate::domain::feedback::{Comment, Review};
use crate::domain::order::{CustomerDetails, OrderId, OrderLine, OrderStatus, PersistedOrder};
use crate::domain::pricing::DeliveryArea;
use crate::domain::quantity::Quantity;
use crate::schema::{comments, contacts, notification_outbox, order_items, orders, reviews};

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderRow {
    pub id: i64,
    pub name: String,
    pub email: Option<String>,
    pub phone: String,
    pub address: String,
    pub delivery_area: String,
    pub note: Option<String>,
    pub delivery_fee: i64,
    pub subtotal: i64,
    pub total: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = orders)]
pub struct NewOrderRow<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: &'a str,
    pub address: &'a str,
    pub delivery_area: &'a str,
    pub note: Option<&'a str>,
    pub delivery_fee: i64,
    pub subtotal: i64,
    pub total: i64,
    pub status: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable, Associations)]
#[diesel(table_name = order_items)]
#[diesel(belongs_to(OrderRow, foreign_key = order_id))]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OrderItemRow {
    pub id: i64,
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub product_name: String,
    pub unit_price: i64,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = order_items)]
pub struct NewOrderItemRow<'a> {
    pub order_id: i64,
    pub product_id: Option<i64>,
    pub product_name: &'a str,
    pub unit_price: i64,
    pub quantity: i32,
}

#[derive(Debug, Clone, Queryable, Selectable, Identifiable)]
#[diesel(table_name = notification_outbox)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct OutboxRow {
    pub id: Uuid,
    pub recipient: String,
    pub subject: String,
    pub body: String,
    pub attempts: i32,
    pub created_at: DateTime<Utc>,
    pub sent_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notification_outbox)]
pub struct NewOutboxRow<'a> {
    pub id: Uuid,
    pub recipient: &'a str,
    pub subject: &'a str,
    pub body: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = reviews)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct ReviewRow {
    pub id: i64,
    pub product_id: i64,
    pub name: String,
    pub text: String,
    pub rating: Option<i16>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = reviews)]
pub struct NewReviewRow<'a> {
    pub product_id: i64,
    pub name: &'a str,
    pub text: &'a str,
    pub rating: Option<i16>,
    pub status: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = comments)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct CommentRow {
    pub id: i64,
    pub product_id: Option<i64>,
    pub name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = comments)]
pub struct NewCommentRow<'a> {
    pub product_id: Option<i64>,
    pub name: &'a str,
    pub text: &'a str,
    pub status: &'a str,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = contacts)]
pub struct NewContactRow<'a> {
    pub name: &'a str,
    pub email: Option<&'a str>,
    pub phone: Option<&'a str>,
    pub message: &'a str,
}

// ── Row → domain ─────────────────────────────────────────────────────────────

impl OrderItemRow {
    fn into_line(self) -> Result<OrderLine, DomainError> {
        let quantity = Quantity::try_from(i64::from(self.quantity))
            .map_err(|e| DomainError::Persistence(format!("order item {}: {e}", self.id)))?;
        Ok(OrderLine {
            product_id: self.product_id.map(ProductId),
            name: self.product_name,
            unit_price: self.unit_price,
            quantity,
        })
    }
}

impl OrderRow {
    pub fn into_order(self, items: Vec<OrderItemRow>) -> Result<PersistedOrder, DomainError> {
        let delivery_area: DeliveryArea = self
            .delivery_area
            .parse()
            .map_err(|e| DomainError::Persistence(format!("order {}: {e}", self.id)))?;
        let status: OrderStatus = self
            .status
            .parse()
            .map_err(|e| DomainError::Persistence(format!("order {}: {e}", self.id)))?;
        let lines = items
            .into_iter()
            .map(OrderItemRow::into_line)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PersistedOrder {
            id: OrderId(self.id),
            customer: CustomerDetails {
                name: self.name,
                address: self.address,
                phone: self.phone,
                email: self.email,
                note: self.note,
            },
            delivery_area,
            delivery_fee: self.delivery_fee,
            subtotal: self.subtotal,
            total: self.total,
            status,
            created_at: self.created_at,
            lines,
        })
    }
}

impl From<ReviewRow> for Review {
    fn from(row: ReviewRow) -> Self {
        Review {
            id: row.id,
            product_id: ProductId(row.product_id),
            name: row.name,
            text: row.text,
            rating: row.rating,
            created_at: row.created_at,
        }
    }
}

impl From<CommentRow> for Comment {
    fn from(row: CommentRow) -> Self {
        Comment {
            id: row.id,
            product_id: row.product_id.map(ProductId),
            name: row.name,
            text: row.text,
            created_at: row.created_at,
        }
    }
}
