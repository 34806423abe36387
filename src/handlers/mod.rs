#[cfg(test)]
macro_rules! test_app {
    () => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(crate::handlers::testing::order_state())
                .app_data(crate::handlers::testing::feedback_state())
                .app_data(actix_web::web::Data::new(crate::handlers::testing::auth()))
                .configure(
                    crate::handlers::routes::<
                        crate::infrastructure::memory::InMemoryOrderRepository,
                        crate::infrastructure::memory::InMemoryFeedbackRepository,
                    >,
                ),
        )
        .await
    };
}

pub mod feedback;
pub mod health;
pub mod orders;

use actix_web::web;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::ports::{FeedbackRepository, OrderRepository};
use crate::errors::AppError;

/// Request body size cap for JSON payloads.
const JSON_LIMIT: usize = 64 * 1024;

/// Register every route. Services and [`crate::auth::AdminAuth`] are expected
/// as app data.
pub fn routes<R: OrderRepository, F: FeedbackRepository>(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config())
        .app_data(query_config())
        .app_data(path_config())
        .route("/ping", web::get().to(health::ping))
        .route("/orders", web::post().to(orders::place_order::<R>))
        .service(
            web::scope("/admin/orders")
                .route("", web::get().to(orders::list_orders::<R>))
                .route("/{id}", web::get().to(orders::get_order::<R>))
                .route("/{id}/status", web::put().to(orders::update_status::<R>)),
        )
        .route("/reviews", web::post().to(feedback::add_review::<F>))
        .route("/reviews", web::get().to(feedback::list_reviews::<F>))
        .route("/comments", web::post().to(feedback::add_comment::<F>))
        .route("/comments", web::get().to(feedback::list_comments::<F>))
        .route("/contact", web::post().to(feedback::contact::<F>));
}

// Extractor failures use the same `{ok: false, error}` envelope as handlers.

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT)
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| AppError::Validation(err.to_string()).into())
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::ping,
        orders::place_order,
        orders::list_orders,
        orders::get_order,
        orders::update_status,
        feedback::add_review,
        feedback::list_reviews,
        feedback::add_comment,
        feedback::list_comments,
        feedback::contact,
    ),
    modifiers(&AdminTokenScheme),
    tags(
        (name = "orders", description = "Checkout"),
        (name = "admin", description = "Order administration"),
        (name = "feedback", description = "Reviews, comments and contact form"),
        (name = "health", description = "Connectivity"),
    )
)]
pub struct ApiDoc;

struct AdminTokenScheme;

impl Modify for AdminTokenScheme {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "admin_token",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}
