//! Signed capability tokens for the admin routes.

use std::future::{ready, Ready};
use std::time::Duration;

use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{web, FromRequest, HttpRequest};
use chrono::Utc;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use log::warn;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::AppError;

pub const ADMIN_ROLE: &str = "admin";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing bearer token")]
    MissingToken,
    #[error("invalid token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),
    #[error("token does not grant the admin role")]
    NotAdmin,
    #[error("admin authentication is not configured")]
    NotConfigured,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminClaims {
    /// Operator the token was issued to.
    pub sub: String,
    pub role: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issues and verifies HS256 admin tokens.
#[derive(Clone)]
pub struct AdminAuth {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl AdminAuth {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    pub fn issue(&self, subject: &str, ttl: Duration) -> Result<String, AuthError> {
        let iat = Utc::now().timestamp();
        let claims = AdminClaims {
            sub: subject.to_string(),
            role: ADMIN_ROLE.to_string(),
            iat,
            exp: iat.saturating_add(i64::try_from(ttl.as_secs()).unwrap_or(i64::MAX)),
        };
        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<AdminClaims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        let claims = decode::<AdminClaims>(token, &self.decoding, &validation)?.claims;
        if claims.role != ADMIN_ROLE {
            return Err(AuthError::NotAdmin);
        }
        Ok(claims)
    }
}

/// Extractor guarding admin handlers. Rejects the request with 401 unless it
/// carries `Authorization: Bearer <token>` signed by the configured secret.
#[derive(Debug, Clone)]
pub struct AdminSession {
    pub claims: AdminClaims,
}

impl AdminSession {
    fn from_request_sync(req: &HttpRequest) -> Result<Self, AuthError> {
        let auth = req
            .app_data::<web::Data<AdminAuth>>()
            .ok_or(AuthError::NotConfigured)?;
        let token = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::MissingToken)?;
        let claims = auth.verify(token)?;
        Ok(Self { claims })
    }
}

impl FromRequest for AdminSession {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(Self::from_request_sync(req).map_err(|e| {
            warn!("admin request to {} rejected: {e}", req.path());
            AppError::from(e)
        }))
    }
}
