use actix_web::{web, HttpResponse};

use crate::api::{AckResponse, CommentsResponse, ProductFilter, ReviewsResponse};
use crate::application::feedback_service::FeedbackService;
use crate::domain::feedback::{ContactMessage, NewComment, NewReview};
use crate::domain::ports::FeedbackRepository;
use crate::errors::AppError;

pub type FeedbackState<R> = web::Data<FeedbackService<R>>;

/// POST /reviews
#[utoipa::path(
    post,
    path = "/reviews",
    request_body = NewReview,
    responses(
        (status = 201, description = "Review stored", body = AckResponse),
        (status = 400, description = "Invalid review", body = crate::api::ErrorResponse),
    ),
    tag = "feedback"
)]
pub async fn add_review<R: FeedbackRepository>(
    service: FeedbackState<R>,
    body: web::Json<NewReview>,
) -> Result<HttpResponse, AppError> {
    let review = body.into_inner();
    web::block(move || service.add_review(review))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(AckResponse::OK))
}

/// GET /reviews?productId=
#[utoipa::path(
    get,
    path = "/reviews",
    params(ProductFilter),
    responses(
        (status = 200, description = "Approved reviews, newest first", body = ReviewsResponse),
        (status = 400, description = "productId missing", body = crate::api::ErrorResponse),
    ),
    tag = "feedback"
)]
pub async fn list_reviews<R: FeedbackRepository>(
    service: FeedbackState<R>,
    query: web::Query<ProductFilter>,
) -> Result<HttpResponse, AppError> {
    let product_id = query
        .into_inner()
        .product_id
        .ok_or_else(|| AppError::Validation("productId is required".to_string()))?;
    let reviews = web::block(move || service.reviews(product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(ReviewsResponse { ok: true, reviews }))
}

/// POST /comments
#[utoipa::path(
    post,
    path = "/comments",
    request_body = NewComment,
    responses(
        (status = 201, description = "Comment stored", body = AckResponse),
        (status = 400, description = "Invalid comment", body = crate::api::ErrorResponse),
    ),
    tag = "feedback"
)]
pub async fn add_comment<R: FeedbackRepository>(
    service: FeedbackState<R>,
    body: web::Json<NewComment>,
) -> Result<HttpResponse, AppError> {
    let comment = body.into_inner();
    web::block(move || service.add_comment(comment))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(AckResponse::OK))
}

/// GET /comments?productId=
///
/// Without `productId` every approved comment is returned.
#[utoipa::path(
    get,
    path = "/comments",
    params(ProductFilter),
    responses((status = 200, description = "Approved comments, newest first", body = CommentsResponse)),
    tag = "feedback"
)]
pub async fn list_comments<R: FeedbackRepository>(
    service: FeedbackState<R>,
    query: web::Query<ProductFilter>,
) -> Result<HttpResponse, AppError> {
    let product_id = query.into_inner().product_id;
    let comments = web::block(move || service.comments(product_id))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Ok().json(CommentsResponse { ok: true, comments }))
}

/// POST /contact
#[utoipa::path(
    post,
    path = "/contact",
    request_body = ContactMessage,
    responses(
        (status = 201, description = "Message stored and admin notified", body = AckResponse),
        (status = 400, description = "Invalid message", body = crate::api::ErrorResponse),
    ),
    tag = "feedback"
)]
pub async fn contact<R: FeedbackRepository>(
    service: FeedbackState<R>,
    body: web::Json<ContactMessage>,
) -> Result<HttpResponse, AppError> {
    let message = body.into_inner();
    web::block(move || service.contact(message))
        .await
        .map_err(|e| AppError::Internal(e.to_string()))??;
    Ok(HttpResponse::Created().json(AckResponse::OK))
}
