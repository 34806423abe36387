use std::process::ExitCode;

use log::{error, info, warn};
use storefront::application::notifications::NotificationPolicy;
use storefront::auth::AdminAuth;
use storefront::config::Settings;
use storefront::infrastructure::mailer::{LogMailer, SmtpMailer};
use storefront::infrastructure::outbox_relay::NotificationRelay;
use storefront::{build_server, create_pool, run_migrations};

#[actix_web::main]
async fn main() -> ExitCode {
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            error!("configuration error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let pool = match create_pool(&settings.database_url) {
        Ok(pool) => pool,
        Err(e) => {
            error!("failed to create database pool: {e}");
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = run_migrations(&pool) {
        error!("failed to run database migrations: {e}");
        return ExitCode::FAILURE;
    }

    if settings.admin_email.is_none() {
        info!("ADMIN_EMAIL not set; order summaries will not be sent");
    }
    let from = settings.mail_from.clone();
    let poll = settings.notification_poll;
    match settings.smtp_url.as_deref() {
        Some(url) => match SmtpMailer::from_url(url) {
            Ok(mailer) => {
                NotificationRelay::new(pool.clone(), mailer, from).spawn(poll);
            }
            Err(e) => {
                error!("invalid SMTP_URL: {e}");
                return ExitCode::FAILURE;
            }
        },
        None => {
            warn!("SMTP_URL not set; notifications will only be logged");
            NotificationRelay::new(pool.clone(), LogMailer, from).spawn(poll);
        }
    }

    let notifications =
        NotificationPolicy::new(settings.admin_email.clone(), settings.shop_name.clone());
    let auth = AdminAuth::new(settings.admin_jwt_secret.as_bytes());

    info!("Starting server at http://{}:{}", settings.host, settings.port);

    let server = match build_server(pool, auth, notifications, &settings.host, settings.port) {
        Ok(server) => server,
        Err(e) => {
            error!("failed to bind {}:{}: {e}", settings.host, settings.port);
            return ExitCode::FAILURE;
        }
    };
    match server.await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("server error: {e}");
            ExitCode::FAILURE
        }
    }
}
