//! Mint an admin bearer token signed with `ADMIN_JWT_SECRET`.
//!
//! Usage: `issue-admin-token <operator> [ttl-seconds]`. Without a ttl
//! argument `ADMIN_TOKEN_TTL_SECS` applies, then eight hours.

use std::env;
use std::process::ExitCode;
use std::time::Duration;

use storefront::auth::AdminAuth;

const DEFAULT_TTL_SECS: u64 = 8 * 60 * 60;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("warn"));

    let mut args = env::args().skip(1);
    let Some(subject) = args.next() else {
        eprintln!("usage: issue-admin-token <operator> [ttl-seconds]");
        return ExitCode::from(2);
    };
    let ttl_arg = args.next().or_else(|| env::var("ADMIN_TOKEN_TTL_SECS").ok());
    let ttl = match ttl_arg.map(|s| s.trim().parse::<u64>()) {
        None => DEFAULT_TTL_SECS,
        Some(Ok(secs)) => secs,
        Some(Err(e)) => {
            eprintln!("invalid ttl: {e}");
            return ExitCode::from(2);
        }
    };
    let secret = match env::var("ADMIN_JWT_SECRET") {
        Ok(secret) if !secret.trim().is_empty() => secret,
        _ => {
            eprintln!("ADMIN_JWT_SECRET must be set");
            return ExitCode::FAILURE;
        }
    };

    match AdminAuth::new(secret.as_bytes()).issue(&subject, Duration::from_secs(ttl)) {
        Ok(token) => {
            println!("{token}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("failed to issue token: {e}");
            ExitCode::FAILURE
        }
    }
}
