use chrono::{NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::order::{OrderId, OrderStatus, PersistedOrder, ValidatedOrder};
use crate::domain::ports::{Notification, OrderNotices, OrderRepository};
use crate::schema::{notification_outbox, order_items, orders};

use super::models::{NewOrderItemRow, NewOrderRow, NewOutboxRow, OrderItemRow, OrderRow};

// ── Error conversions (infrastructure concern only) ──────────────────────────

impl From<diesel::result::Error> for DomainError {
    fn from(e: diesel::result::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

impl From<r2d2::Error> for DomainError {
    fn from(e: r2d2::Error) -> Self {
        DomainError::Persistence(e.to_string())
    }
}

/// Queue notifications on an open connection so they commit (or roll back)
/// together with the write that produced them.
pub(crate) fn enqueue_notifications(
    conn: &mut PgConnection,
    notices: &[Notification],
) -> Result<(), DomainError> {
    if notices.is_empty() {
        return Ok(());
    }
    let rows: Vec<NewOutboxRow<'_>> = notices
        .iter()
        .map(|n| NewOutboxRow {
            id: Uuid::new_v4(),
            recipient: &n.recipient,
            subject: &n.subject,
            body: &n.body,
        })
        .collect();
    diesel::insert_into(notification_outbox::table)
        .values(&rows)
        .execute(conn)?;
    Ok(())
}

// ── Repository ────────────────────────────────────────────────────────────────

pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl OrderRepository for DieselOrderRepository {
    fn create(
        &self,
        order: &ValidatedOrder,
        notices: OrderNotices<'_>,
    ) -> Result<PersistedOrder, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            // 1. Insert the order header
            let customer = &order.customer;
            let header: OrderRow = diesel::insert_into(orders::table)
                .values(&NewOrderRow {
                    name: &customer.name,
                    email: customer.email.as_deref(),
                    phone: &customer.phone,
                    address: &customer.address,
                    delivery_area: order.delivery_area.as_str(),
                    note: customer.note.as_deref(),
                    delivery_fee: order.quote.delivery_fee,
                    subtotal: order.quote.subtotal,
                    total: order.quote.total,
                    status: OrderStatus::Pending.as_str(),
                })
                .returning(OrderRow::as_returning())
                .get_result(conn)?;

            // 2. Insert the line snapshots
            let new_items: Vec<NewOrderItemRow<'_>> = order
                .lines
                .iter()
                .map(|l| NewOrderItemRow {
                    order_id: header.id,
                    product_id: l.product_id.map(|p| p.0),
                    product_name: &l.name,
                    unit_price: l.unit_price,
                    quantity: i32::from(l.quantity),
                })
                .collect();
            let items: Vec<OrderItemRow> = diesel::insert_into(order_items::table)
                .values(&new_items)
                .returning(OrderItemRow::as_returning())
                .get_results(conn)?;

            let persisted = header.into_order(items)?;

            // 3. Queue confirmation notifications in the same transaction.
            enqueue_notifications(conn, &notices(&persisted))?;

            Ok(persisted)
        })
    }

    fn find_by_id(&self, id: OrderId) -> Result<Option<PersistedOrder>, DomainError> {
        let mut conn = self.pool.get()?;

        let order = orders::table
            .filter(orders::id.eq(id.0))
            .select(OrderRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(order) = order else {
            return Ok(None);
        };

        let items = OrderItemRow::belonging_to(&order)
            .select(OrderItemRow::as_select())
            .order(order_items::id.asc())
            .load(&mut conn)?;

        order.into_order(items).map(Some)
    }

    fn list(
        &self,
        since: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<PersistedOrder>, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let mut query = orders::table
                .select(OrderRow::as_select())
                .order((orders::created_at.desc(), orders::id.desc()))
                .limit(limit)
                .into_boxed();
            if let Some(start) = since.and_then(|d| d.and_hms_opt(0, 0, 0)) {
                query = query.filter(orders::created_at.ge(start.and_utc()));
            }
            let rows: Vec<OrderRow> = query.load(conn)?;

            let items = OrderItemRow::belonging_to(&rows)
                .select(OrderItemRow::as_select())
                .order(order_items::id.asc())
                .load(conn)?;

            items
                .grouped_by(&rows)
                .into_iter()
                .zip(rows)
                .map(|(items, order)| order.into_order(items))
                .collect()
        })
    }

    fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<usize, DomainError> {
        let mut conn = self.pool.get()?;

        let updated = diesel::update(orders::table.filter(orders::id.eq(id.0)))
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;
        Ok(updated)
    }
}
