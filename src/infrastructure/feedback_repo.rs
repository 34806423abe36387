use diesel::prelude::*;

use crate::db::DbPool;
use crate::domain::catalog::ProductId;
use crate::domain::errors::DomainError;
use crate::domain::feedback::{Comment, ContactMessage, NewComment, NewReview, Review};
use crate::domain::ports::{FeedbackRepository, Notification};
use crate::schema::{comments, contacts, reviews};

use super::models::{CommentRow, NewCommentRow, NewContactRow, NewReviewRow, ReviewRow};
use super::order_repo::enqueue_notifications;

/// New reviews and comments are published immediately.
const APPROVED: &str = "approved";

pub struct DieselFeedbackRepository {
    pool: DbPool,
}

impl DieselFeedbackRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl FeedbackRepository for DieselFeedbackRepository {
    fn add_review(&self, review: &NewReview) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(reviews::table)
            .values(&NewReviewRow {
                product_id: review.product_id.0,
                name: &review.name,
                text: &review.text,
                rating: review.rating,
                status: APPROVED,
            })
            .execute(&mut conn)?;
        Ok(())
    }

    fn list_reviews(&self, product_id: ProductId, limit: i64) -> Result<Vec<Review>, DomainError> {
        let mut conn = self.pool.get()?;
        let rows = reviews::table
            .filter(reviews::product_id.eq(product_id.0))
            .filter(reviews::status.eq(APPROVED))
            .select(ReviewRow::as_select())
            .order(reviews::id.desc())
            .limit(limit)
            .load(&mut conn)?;
        Ok(rows.into_iter().map(Review::from).collect())
    }

    fn add_comment(&self, comment: &NewComment) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        diesel::insert_into(comments::table)
            .values(&NewCommentRow {
                product_id: comment.product_id.map(|p| p.0),
                name: &comment.name,
                text: &comment.text,
                status: APPROVED,
            })
            .execute(&mut conn)?;
        Ok(())
    }

    fn list_comments(
        &self,
        product_id: Option<ProductId>,
        limit: i64,
    ) -> Result<Vec<Comment>, DomainError> {
        let mut conn = self.pool.get()?;
        let mut query = comments::table
            .filter(comments::status.eq(APPROVED))
            .select(CommentRow::as_select())
            .order(comments::id.desc())
            .limit(limit)
            .into_boxed();
        if let Some(product_id) = product_id {
            query = query.filter(comments::product_id.eq(product_id.0));
        }
        let rows = query.load(&mut conn)?;
        Ok(rows.into_iter().map(Comment::from).collect())
    }

    fn add_contact(
        &self,
        message: &ContactMessage,
        notices: &[Notification],
    ) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;
        conn.transaction::<_, DomainError, _>(|conn| {
            diesel::insert_into(contacts::table)
                .values(&NewContactRow {
                    name: &message.name,
                    email: message.email.as_deref(),
                    phone: message.phone.as_deref(),
                    message: &message.message,
                })
                .execute(conn)?;
            enqueue_notifications(conn, notices)
        })
    }
}
