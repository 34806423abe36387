use log::info;

use crate::domain::catalog::ProductId;
use crate::domain::errors::DomainError;
use crate::domain::feedback::{Comment, ContactMessage, NewComment, NewReview, Review, MAX_LISTED};
use crate::domain::ports::FeedbackRepository;

use super::notifications::NotificationPolicy;

/// Product reviews, storefront comments and contact-form messages.
pub struct FeedbackService<R> {
    repo: R,
    notifications: NotificationPolicy,
}

impl<R: FeedbackRepository> FeedbackService<R> {
    pub fn new(repo: R, notifications: NotificationPolicy) -> Self {
        Self {
            repo,
            notifications,
        }
    }

    pub fn add_review(&self, review: NewReview) -> Result<(), DomainError> {
        let review = review.validate()?;
        self.repo.add_review(&review)?;
        info!("review added for product {}", review.product_id);
        Ok(())
    }

    pub fn reviews(&self, product_id: ProductId) -> Result<Vec<Review>, DomainError> {
        self.repo.list_reviews(product_id, MAX_LISTED)
    }

    pub fn add_comment(&self, comment: NewComment) -> Result<(), DomainError> {
        let comment = comment.validate()?;
        self.repo.add_comment(&comment)
    }

    pub fn comments(&self, product_id: Option<ProductId>) -> Result<Vec<Comment>, DomainError> {
        self.repo.list_comments(product_id, MAX_LISTED)
    }

    pub fn contact(&self, message: ContactMessage) -> Result<(), DomainError> {
        let message = message.validate()?;
        let notices = self.notifications.for_contact(&message);
        self.repo.add_contact(&message, &notices)?;
        info!("contact message from {} stored", message.name);
        Ok(())
    }
}
