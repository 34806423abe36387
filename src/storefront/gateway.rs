//! Client side of the order API.

use chrono::NaiveDate;
use log::{debug, warn};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::api::{
    ErrorResponse, OrderResponse, OrdersResponse, PlaceOrderResponse, StatusUpdateRequest,
    StatusUpdateResponse,
};
use crate::domain::order::{OrderId, OrderRequest, OrderStatus};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    /// The server rejected the payload; show the message next to the form.
    #[error("{0}")]
    Validation(String),
    #[error("not authorized")]
    Unauthorized,
    /// The request did not complete. Safe to offer a manual retry.
    #[error("could not reach the shop: {0}")]
    Transient(String),
    /// Server-side failure; the message carries no internal detail.
    #[error("the shop could not process the request: {0}")]
    Server(String),
}

impl GatewayError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, GatewayError::Transient(_))
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            GatewayError::Server(format!("unexpected response: {e}"))
        } else {
            GatewayError::Transient(e.to_string())
        }
    }
}

pub trait OrderGateway {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderId, GatewayError>;
}

pub trait AdminGateway {
    async fn list_orders(
        &self,
        since: Option<NaiveDate>,
    ) -> Result<Vec<OrderResponse>, GatewayError>;
    async fn update_status(&self, id: OrderId, status: OrderStatus)
        -> Result<usize, GatewayError>;
}

async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, GatewayError> {
    let response = request.send().await?;
    let status = response.status();
    if status.is_success() {
        return Ok(response.json::<T>().await?);
    }

    let message = match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => status.to_string(),
    };
    debug!("request failed with {status}: {message}");
    Err(match status {
        StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
            GatewayError::Validation(message)
        }
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GatewayError::Unauthorized,
        _ => GatewayError::Server(message),
    })
}

fn trim_base(base_url: impl Into<String>) -> String {
    base_url.into().trim_end_matches('/').to_string()
}

/// Places orders over HTTP.
#[derive(Debug, Clone)]
pub struct HttpOrderGateway {
    client: Client,
    base_url: String,
}

impl HttpOrderGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: trim_base(base_url),
        }
    }
}

impl OrderGateway for HttpOrderGateway {
    async fn place_order(&self, request: &OrderRequest) -> Result<OrderId, GatewayError> {
        let url = format!("{}/orders", self.base_url);
        let response: PlaceOrderResponse = send(self.client.post(url).json(request)).await?;
        if !response.ok {
            warn!("order endpoint answered ok=false for order {}", response.order_id);
            return Err(GatewayError::Server("order was not accepted".to_string()));
        }
        Ok(response.order_id)
    }
}

/// Admin endpoints, authenticated with a bearer token from
/// `issue-admin-token`.
#[derive(Debug, Clone)]
pub struct HttpAdminGateway {
    client: Client,
    base_url: String,
    token: String,
}

impl HttpAdminGateway {
    pub fn new(base_url: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: trim_base(base_url),
            token: token.into(),
        }
    }
}

impl AdminGateway for HttpAdminGateway {
    async fn list_orders(
        &self,
        since: Option<NaiveDate>,
    ) -> Result<Vec<OrderResponse>, GatewayError> {
        let url = match since {
            Some(day) => format!(
                "{}/admin/orders?since={}",
                self.base_url,
                day.format("%Y-%m-%d")
            ),
            None => format!("{}/admin/orders", self.base_url),
        };
        let response: OrdersResponse = send(self.client.get(url).bearer_auth(&self.token)).await?;
        Ok(response.orders)
    }

    async fn update_status(
        &self,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<usize, GatewayError> {
        let url = format!("{}/admin/orders/{id}/status", self.base_url);
        let body = StatusUpdateRequest {
            status: status.as_str().to_string(),
        };
        let response: StatusUpdateResponse =
            send(self.client.put(url).bearer_auth(&self.token).json(&body)).await?;
        Ok(response.updated)
    }
}
