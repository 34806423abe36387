use chrono::NaiveDate;
use log::{info, warn};

use crate::api::OrderResponse;
use crate::domain::order::{OrderId, OrderStatus};

use super::gateway::{AdminGateway, GatewayError};

/// Result of a status change. An unknown order is reported, not raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusChange {
    Applied,
    NotFound,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    /// Case-insensitive match on order number, name, phone, email or address.
    pub text: String,
    pub status: Option<OrderStatus>,
}

impl OrderFilter {
    fn matches(&self, order: &OrderResponse) -> bool {
        if self.status.is_some_and(|s| s != order.status) {
            return false;
        }
        let needle = self.text.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        let c = &order.customer;
        [
            Some(order.id.to_string()),
            Some(c.name.to_lowercase()),
            Some(c.phone.to_lowercase()),
            Some(c.address.to_lowercase()),
            c.email.as_ref().map(|e| e.to_lowercase()),
        ]
        .into_iter()
        .flatten()
        .any(|field| field.contains(&needle))
    }
}

/// Order list and status controls backing the admin dashboard.
pub struct AdminConsole<G> {
    gateway: G,
    orders: Vec<OrderResponse>,
}

impl<G: AdminGateway> AdminConsole<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            orders: Vec::new(),
        }
    }

    /// Reload orders from the server, newest first. The previous list is
    /// kept when the request fails.
    pub async fn refresh(&mut self, since: Option<NaiveDate>) -> Result<usize, GatewayError> {
        self.orders = self.gateway.list_orders(since).await?;
        Ok(self.orders.len())
    }

    pub fn orders(&self) -> &[OrderResponse] {
        &self.orders
    }

    pub fn filtered(&self, filter: &OrderFilter) -> Vec<&OrderResponse> {
        self.orders.iter().filter(|o| filter.matches(o)).collect()
    }

    pub async fn set_status(
        &mut self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<StatusChange, GatewayError> {
        let updated = self.gateway.update_status(id, status).await?;
        if updated == 0 {
            warn!("order #{id} no longer exists");
            self.orders.retain(|o| o.id != id);
            return Ok(StatusChange::NotFound);
        }
        info!("order #{id} marked {status}");
        if let Some(order) = self.orders.iter_mut().find(|o| o.id == id) {
            order.status = status;
        }
        Ok(StatusChange::Applied)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use chrono::Utc;

    use super::*;
    use crate::domain::order::CustomerDetails;
    use crate::domain::pricing::DeliveryArea;

    #[derive(Default)]
    struct FakeAdmin {
        orders: RefCell<Vec<OrderResponse>>,
        fail_listing: bool,
    }

    impl AdminGateway for FakeAdmin {
        async fn list_orders(
            &self,
            _since: Option<NaiveDate>,
        ) -> Result<Vec<OrderResponse>, GatewayError> {
            if self.fail_listing {
                return Err(GatewayError::Unauthorized);
            }
            Ok(self.orders.borrow().clone())
        }

        async fn update_status(
            &self,
            id: OrderId,
            status: OrderStatus,
        ) -> Result<usize, GatewayError> {
            let mut updated = 0;
            for order in self.orders.borrow_mut().iter_mut().filter(|o| o.id == id) {
                order.status = status;
                updated += 1;
            }
            Ok(updated)
        }
    }

    fn order(id: i64, name: &str, status: OrderStatus) -> OrderResponse {
        OrderResponse {
            id: OrderId(id),
            customer: CustomerDetails {
                name: name.to_string(),
                address: "Gulshan 2".to_string(),
                phone: format!("0170000000{id}"),
                email: None,
                note: None,
            },
            delivery_area: DeliveryArea::Dhaka,
            delivery_fee: 29,
            subtotal: 550,
            total: 579,
            status,
            created_at: Utc::now(),
            items: Vec::new(),
        }
    }

    fn console() -> AdminConsole<FakeAdmin> {
        AdminConsole::new(FakeAdmin {
            orders: RefCell::new(vec![
                order(2, "Nadia Islam", OrderStatus::Pending),
                order(1, "Rahim Uddin", OrderStatus::Shipped),
            ]),
            fail_listing: false,
        })
    }

    #[actix_web::test]
    async fn filters_by_text_and_status() {
        let mut console = console();
        assert_eq!(console.refresh(None).await.unwrap(), 2);

        let by_name = console.filtered(&OrderFilter {
            text: "rahim".to_string(),
            status: None,
        });
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].id, OrderId(1));

        let pending = console.filtered(&OrderFilter {
            text: String::new(),
            status: Some(OrderStatus::Pending),
        });
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, OrderId(2));
    }

    #[actix_web::test]
    async fn status_change_updates_local_copy() {
        let mut console = console();
        console.refresh(None).await.unwrap();
        let change = console.set_status(OrderId(2), OrderStatus::Confirmed).await.unwrap();
        assert_eq!(change, StatusChange::Applied);
        assert_eq!(console.orders()[0].status, OrderStatus::Confirmed);
    }

    #[actix_web::test]
    async fn zero_updated_is_not_found_not_error() {
        let mut console = console();
        console.refresh(None).await.unwrap();
        let change = console.set_status(OrderId(99), OrderStatus::Cancelled).await.unwrap();
        assert_eq!(change, StatusChange::NotFound);
        assert_eq!(console.orders().len(), 2);
    }

    #[actix_web::test]
    async fn failed_refresh_surfaces_error() {
        let mut console = AdminConsole::new(FakeAdmin {
            fail_listing: true,
            ..Default::default()
        });
        assert_eq!(console.refresh(None).await, Err(GatewayError::Unauthorized));
        assert!(console.orders().is_empty());
    }
}
