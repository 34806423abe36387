use chrono::NaiveDate;
use log::info;

use crate::domain::errors::DomainError;
use crate::domain::order::{OrderId, OrderRequest, OrderStatus, PersistedOrder};
use crate::domain::ports::OrderRepository;

use super::notifications::NotificationPolicy;

/// Upper bound on orders returned by one listing.
pub const LIST_LIMIT: i64 = 2000;

pub struct OrderService<R> {
    repo: R,
    notifications: NotificationPolicy,
}

impl<R: OrderRepository> OrderService<R> {
    pub fn new(repo: R, notifications: NotificationPolicy) -> Self {
        Self {
            repo,
            notifications,
        }
    }

    /// Validate, reprice and persist an order. Totals sent by the client are
    /// advisory only.
    pub fn place_order(&self, request: OrderRequest) -> Result<PersistedOrder, DomainError> {
        let order = request.validate()?;
        let persisted = self
            .repo
            .create(&order, &|o| self.notifications.for_order(o))?;
        info!(
            "order #{} placed: {} lines, total {}",
            persisted.id,
            persisted.lines.len(),
            persisted.total
        );
        Ok(persisted)
    }

    pub fn get_order(&self, id: OrderId) -> Result<Option<PersistedOrder>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_orders(&self, since: Option<NaiveDate>) -> Result<Vec<PersistedOrder>, DomainError> {
        self.repo.list(since, LIST_LIMIT)
    }

    /// Returns the number of orders changed; 0 means the id was unknown.
    pub fn update_status(&self, id: OrderId, status: &str) -> Result<usize, DomainError> {
        let status: OrderStatus = status.parse()?;
        let updated = self.repo.update_status(id, status)?;
        info!("order #{id} status -> {status} ({updated} updated)");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::catalog::ProductId;
    use crate::domain::order::{CustomerDetails, OrderItemRequest};
    use crate::domain::pricing::DeliveryArea;
    use crate::infrastructure::memory::InMemoryOrderRepository;

    fn service() -> OrderService<InMemoryOrderRepository> {
        OrderService::new(
            InMemoryOrderRepository::default(),
            NotificationPolicy::new(Some("admin@shop.test".to_string()), "Hide Haven"),
        )
    }

    fn request(name: &str) -> OrderRequest {
        OrderRequest {
            customer: CustomerDetails {
                name: name.to_string(),
                address: "Mirpur 10".to_string(),
                phone: "01900000000".to_string(),
                email: Some("buyer@example.com".to_string()),
                note: None,
            },
            delivery_area: DeliveryArea::Outside,
            subtotal: Some(799),
            delivery_fee: Some(99),
            total: Some(898),
            items: vec![OrderItemRequest {
                product_id: Some(ProductId(28)),
                name: "Leather Tote".to_string(),
                price: 799,
                quantity: 1,
            }],
        }
    }

    #[test]
    fn place_order_persists_pending_order_with_server_totals() {
        let service = service();
        let order = service.place_order(request("Rahim")).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!((order.subtotal, order.delivery_fee, order.total), (799, 99, 898));
        assert_eq!(service.repo.notifications().len(), 2);
    }

    #[test]
    fn place_order_with_empty_name_persists_nothing() {
        let service = service();
        let err = service.place_order(request("")).unwrap_err();

        assert!(matches!(err, DomainError::Validation(_)));
        assert!(service.list_orders(None).unwrap().is_empty());
        assert!(service.repo.notifications().is_empty());
    }

    #[test]
    fn update_status_rejects_unknown_status() {
        let service = service();
        let order = service.place_order(request("Rahim")).unwrap();
        assert!(matches!(
            service.update_status(order.id, "lost"),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn update_status_on_missing_order_reports_zero() {
        let service = service();
        assert_eq!(service.update_status(OrderId(77), "shipped").unwrap(), 0);
    }

    #[test]
    fn update_status_changes_stored_status() {
        let service = service();
        let order = service.place_order(request("Rahim")).unwrap();
        assert_eq!(service.update_status(order.id, "Delivered").unwrap(), 1);
        let stored = service.get_order(order.id).unwrap().unwrap();
        assert_eq!(stored.status, OrderStatus::Delivered);
    }

    #[test]
    fn list_orders_is_newest_first() {
        let service = service();
        let first = service.place_order(request("A")).unwrap();
        let second = service.place_order(request("B")).unwrap();
        let ids: Vec<OrderId> = service
            .list_orders(None)
            .unwrap()
            .into_iter()
            .map(|o| o.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
    }
}
