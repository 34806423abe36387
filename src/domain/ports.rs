use chrono::NaiveDate;

use super::catalog::ProductId;
use super::errors::DomainError;
use super::feedback::{Comment, ContactMessage, NewComment, NewReview, Review};
use super::order::{OrderId, OrderStatus, PersistedOrder, ValidatedOrder};

/// Message queued for delivery after the surrounding write commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

/// Builds the notifications for an order once its identifier is known.
pub type OrderNotices<'a> = &'a dyn Fn(&PersistedOrder) -> Vec<Notification>;

pub trait OrderRepository: Send + Sync + 'static {
    /// Insert the order, its lines and its notifications as one unit.
    fn create(
        &self,
        order: &ValidatedOrder,
        notices: OrderNotices<'_>,
    ) -> Result<PersistedOrder, DomainError>;
    fn find_by_id(&self, id: OrderId) -> Result<Option<PersistedOrder>, DomainError>;
    /// Newest first, at most `limit` orders, each with its lines.
    fn list(&self, since: Option<NaiveDate>, limit: i64)
        -> Result<Vec<PersistedOrder>, DomainError>;
    /// Returns the number of rows changed; 0 when the order does not exist.
    fn update_status(&self, id: OrderId, status: OrderStatus) -> Result<usize, DomainError>;
}

pub trait FeedbackRepository: Send + Sync + 'static {
    fn add_review(&self, review: &NewReview) -> Result<(), DomainError>;
    fn list_reviews(&self, product_id: ProductId, limit: i64) -> Result<Vec<Review>, DomainError>;
    fn add_comment(&self, comment: &NewComment) -> Result<(), DomainError>;
    fn list_comments(
        &self,
        product_id: Option<ProductId>,
        limit: i64,
    ) -> Result<Vec<Comment>, DomainError>;
    fn add_contact(
        &self,
        message: &ContactMessage,
        notices: &[Notification],
    ) -> Result<(), DomainError>;
}
