//! In-process repositories for handler and service tests.

use std::sync::Mutex;

use chrono::{Duration, NaiveDate, Utc};

use crate::domain::catalog::ProductId;
use crate::domain::errors::DomainError;
use crate::domain::feedback::{Comment, ContactMessage, NewComment, NewReview, Review};
use crate::domain::order::{OrderId, OrderStatus, PersistedOrder, ValidatedOrder};
use crate::domain::ports::{FeedbackRepository, Notification, OrderNotices, OrderRepository};

#[derive(Default)]
pub struct InMemoryOrderRepository {
    orders: Mutex<Vec<PersistedOrder>>,
    outbox: Mutex<Vec<Notification>>,
}

impl InMemoryOrderRepository {
    pub fn notifications(&self) -> Vec<Notification> {
        self.outbox.lock().unwrap().clone()
    }
}

impl OrderRepository for InMemoryOrderRepository {
    fn create(
        &self,
        order: &ValidatedOrder,
        notices: OrderNotices<'_>,
    ) -> Result<PersistedOrder, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        let id = OrderId(orders.len() as i64 + 1);
        // Spread timestamps so newest-first ordering is observable.
        let created_at = Utc::now() + Duration::milliseconds(id.0);
        let persisted = PersistedOrder {
            id,
            customer: order.customer.clone(),
            delivery_area: order.delivery_area,
            delivery_fee: order.quote.delivery_fee,
            subtotal: order.quote.subtotal,
            total: order.quote.total,
            status: OrderStatus::Pending,
            created_at,
            lines: order.lines.clone(),
        };
        self.outbox.lock().unwrap().extend(notices(&persisted));
        orders.push(persisted.clone());
        Ok(persisted)
    }

    fn find_by_id(&self, id: OrderId) -> Result<Option<PersistedOrder>, DomainError> {
        let orders = self.orders.lock().unwrap();
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    fn list(
        &self,
        since: Option<NaiveDate>,
        limit: i64,
    ) -> Result<Vec<PersistedOrder>, DomainError> {
        let orders = self.orders.lock().unwrap();
        let mut listed: Vec<PersistedOrder> = orders
            .iter()
            .filter(|o| since.map_or(true, |d| o.created_at.date_naive() >= d))
            .cloned()
            .collect();
        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        listed.truncate(limit.max(0) as usize);
        Ok(listed)
    }

    fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<usize, DomainError> {
        let mut orders = self.orders.lock().unwrap();
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.status = status;
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

#[derive(Default)]
pub struct InMemoryFeedbackRepository {
    reviews: Mutex<Vec<Review>>,
    comments: Mutex<Vec<Comment>>,
    contacts: Mutex<Vec<ContactMessage>>,
    outbox: Mutex<Vec<Notification>>,
}

impl InMemoryFeedbackRepository {
    pub fn contacts(&self) -> Vec<ContactMessage> {
        self.contacts.lock().unwrap().clone()
    }

    pub fn notifications(&self) -> Vec<Notification> {
        self.outbox.lock().unwrap().clone()
    }
}

impl FeedbackRepository for InMemoryFeedbackRepository {
    fn add_review(&self, review: &NewReview) -> Result<(), DomainError> {
        let mut reviews = self.reviews.lock().unwrap();
        let id = reviews.len() as i64 + 1;
        reviews.push(Review {
            id,
            product_id: review.product_id,
            name: review.name.clone(),
            text: review.text.clone(),
            rating: review.rating,
            created_at: Utc::now(),
        });
        Ok(())
    }

    fn list_reviews(&self, product_id: ProductId, limit: i64) -> Result<Vec<Review>, DomainError> {
        let reviews = self.reviews.lock().unwrap();
        Ok(reviews
            .iter()
            .rev()
            .filter(|r| r.product_id == product_id)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    fn add_comment(&self, comment: &NewComment) -> Result<(), DomainError> {
        let mut comments = self.comments.lock().unwrap();
        let id = comments.len() as i64 + 1;
        comments.push(Comment {
            id,
            product_id: comment.product_id,
            name: comment.name.clone(),
            text: comment.text.clone(),
            created_at: Utc::now(),
        });
        Ok(())
    }

    fn list_comments(
        &self,
        product_id: Option<ProductId>,
        limit: i64,
    ) -> Result<Vec<Comment>, DomainError> {
        let comments = self.comments.lock().unwrap();
        Ok(comments
            .iter()
            .rev()
            .filter(|c| product_id.map_or(true, |p| c.product_id == Some(p)))
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    fn add_contact(
        &self,
        message: &ContactMessage,
        notices: &[Notification],
    ) -> Result<(), DomainError> {
        self.contacts.lock().unwrap().push(message.clone());
        self.outbox.lock().unwrap().extend_from_slice(notices);
        Ok(())
    }
}
