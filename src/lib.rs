pub mod api;
pub mod application;
pub mod auth;
pub mod config;
pub mod db;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod schema;
pub mod storefront;

use std::error::Error;

use actix_web::{middleware::Logger, web, App, HttpServer};
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::feedback_service::FeedbackService;
use application::notifications::NotificationPolicy;
use application::order_service::OrderService;
use auth::AdminAuth;
use infrastructure::feedback_repo::DieselFeedbackRepository;
use infrastructure::order_repo::DieselOrderRepository;

pub use db::{create_pool, DbPool};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Run any pending Diesel migrations against the pool's database.
pub fn run_migrations(pool: &DbPool) -> Result<(), Box<dyn Error + Send + Sync>> {
    let mut conn = pool.get()?;
    let applied = conn.run_pending_migrations(MIGRATIONS)?;
    for version in applied {
        log::info!("applied migration {version}");
    }
    Ok(())
}

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    pool: DbPool,
    auth: AdminAuth,
    notifications: NotificationPolicy,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let orders = web::Data::new(OrderService::new(
        DieselOrderRepository::new(pool.clone()),
        notifications.clone(),
    ));
    let feedback = web::Data::new(FeedbackService::new(
        DieselFeedbackRepository::new(pool),
        notifications,
    ));
    let auth = web::Data::new(auth);
    let openapi = handlers::ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(orders.clone())
            .app_data(feedback.clone())
            .app_data(auth.clone())
            .wrap(Logger::default())
            .configure(handlers::routes::<DieselOrderRepository, DieselFeedbackRepository>)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}")
                    .url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
