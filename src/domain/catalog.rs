use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use super::pricing::Amount;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("product {0}: price must be positive")]
    NonPositivePrice(ProductId),
    #[error("product {id}: sale price {sale} exceeds base price {base}")]
    SaleAboveBase { id: ProductId, sale: Amount, base: Amount },
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, ToSchema,
)]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMedia {
    pub kind: MediaKind,
    pub url: String,
}

/// Catalog entry. Reference data: immutable for the lifetime of a session and
/// shared between cart lines by `Arc`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub price: Amount,
    pub sale_price: Option<Amount>,
    pub on_sale: bool,
    pub in_stock: bool,
    pub category: String,
    pub colors: Vec<String>,
    pub media: Vec<ProductMedia>,
}

impl Product {
    pub fn new(
        id: ProductId,
        name: impl Into<String>,
        price: Amount,
        category: impl Into<String>,
    ) -> Result<Self, CatalogError> {
        if price <= 0 {
            return Err(CatalogError::NonPositivePrice(id));
        }
        Ok(Self {
            id,
            name: name.into(),
            price,
            sale_price: None,
            on_sale: false,
            in_stock: true,
            category: category.into(),
            colors: Vec::new(),
            media: Vec::new(),
        })
    }

    pub fn with_sale_price(mut self, sale: Amount) -> Result<Self, CatalogError> {
        if sale <= 0 {
            return Err(CatalogError::NonPositivePrice(self.id));
        }
        if sale > self.price {
            return Err(CatalogError::SaleAboveBase {
                id: self.id,
                sale,
                base: self.price,
            });
        }
        self.sale_price = Some(sale);
        self.on_sale = true;
        Ok(self)
    }

    /// Price charged per unit. The sale price wins whenever it is set; the
    /// `on_sale` flag alone does not discount anything.
    pub fn unit_price(&self) -> Amount {
        self.sale_price.unwrap_or(self.price)
    }
}
