//! Client-side session: cart, checkout and the gateways that talk to the
//! order API.

pub mod admin;
pub mod cart;
pub mod challenge;
pub mod checkout;
pub mod gateway;

use std::sync::Arc;

use crate::domain::catalog::Product;
use crate::domain::order::OrderId;

use cart::Cart;
use checkout::{CheckoutError, CheckoutFlow};
use gateway::OrderGateway;

/// Everything one browsing session owns. Sessions share nothing mutable.
pub struct Session<G> {
    pub cart: Cart,
    pub checkout: CheckoutFlow,
    gateway: G,
}

impl<G: OrderGateway> Session<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            cart: Cart::new(),
            checkout: CheckoutFlow::default(),
            gateway,
        }
    }

    pub fn add_to_cart(&mut self, product: Arc<Product>, quantity: i64) {
        self.cart.add(product, quantity);
    }

    pub async fn place_order(&mut self) -> Result<OrderId, CheckoutError> {
        self.checkout.submit(&self.gateway, &mut self.cart).await
    }
}
