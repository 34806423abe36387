use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::catalog::ProductId;
use super::errors::DomainError;

pub const MAX_LISTED: i64 = 200;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewReview {
    pub product_id: ProductId,
    pub name: String,
    pub text: String,
    #[serde(default)]
    pub rating: Option<i16>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewComment {
    #[serde(default)]
    pub product_id: Option<ProductId>,
    pub name: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ContactMessage {
    pub name: String,
    pub message: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    pub id: i64,
    pub product_id: ProductId,
    pub name: String,
    pub text: String,
    pub rating: Option<i16>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: i64,
    pub product_id: Option<ProductId>,
    pub name: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}

fn non_blank(field: &str, value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        Err(DomainError::Validation(format!("{field} is required")))
    } else {
        Ok(trimmed.to_string())
    }
}

impl NewReview {
    pub fn validate(self) -> Result<Self, DomainError> {
        if self.product_id.0 <= 0 {
            return Err(DomainError::validation("productId is required"));
        }
        if let Some(rating) = self.rating {
            if !(1..=5).contains(&rating) {
                return Err(DomainError::Validation(format!(
                    "rating {rating} is outside 1..=5"
                )));
            }
        }
        Ok(Self {
            product_id: self.product_id,
            name: non_blank("name", &self.name)?,
            text: non_blank("text", &self.text)?,
            rating: self.rating,
        })
    }
}

impl NewComment {
    pub fn validate(self) -> Result<Self, DomainError> {
        Ok(Self {
            product_id: self.product_id,
            name: non_blank("name", &self.name)?,
            text: non_blank("text", &self.text)?,
        })
    }
}

impl ContactMessage {
    pub fn validate(self) -> Result<Self, DomainError> {
        let trim_opt = |v: Option<String>| {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        };
        Ok(Self {
            name: non_blank("name", &self.name)?,
            message: non_blank("message", &self.message)?,
            email: trim_opt(self.email),
            phone: trim_opt(self.phone),
        })
    }
}
