use std::sync::Arc;

use tokio::sync::watch;

use crate::domain::catalog::{Product, ProductId};
use crate::domain::order::OrderItemRequest;
use crate::domain::pricing::{self, Amount, DeliveryArea, PricedLine, Quote};
use crate::domain::quantity::Quantity;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub product: Arc<Product>,
    pub quantity: Quantity,
}

impl CartLine {
    /// Point-in-time snapshot sent with an order.
    pub fn to_item(&self) -> OrderItemRequest {
        OrderItemRequest {
            product_id: Some(self.product.id),
            name: self.product.name.clone(),
            price: self.product.unit_price(),
            quantity: self.quantity.into(),
        }
    }
}

impl PricedLine for CartLine {
    fn unit_price(&self) -> Amount {
        self.product.unit_price()
    }

    fn quantity(&self) -> Quantity {
        self.quantity
    }
}

/// Session-scoped shopping cart. At most one line per product, kept in the
/// order products were first added.
///
/// Every mutation publishes the new item count to subscribers before it
/// returns.
#[derive(Debug)]
pub struct Cart {
    lines: Vec<CartLine>,
    badge: watch::Sender<u32>,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

impl Cart {
    pub fn new() -> Self {
        let (badge, _) = watch::channel(0);
        Self {
            lines: Vec::new(),
            badge,
        }
    }

    /// Add `quantity` units of `product`. Merging into an existing line stops
    /// at `Quantity::MAX`; the excess is dropped.
    pub fn add(&mut self, product: Arc<Product>, quantity: i64) {
        let quantity = Quantity::clamped(quantity);
        match self.position(product.id) {
            Some(i) => {
                let line = &mut self.lines[i];
                line.quantity = line.quantity.saturating_add(quantity);
            }
            None => self.lines.push(CartLine { product, quantity }),
        }
        self.publish();
    }

    /// Set the quantity of an existing line, clamped to `1..=10`.
    pub fn update_quantity(&mut self, product_id: ProductId, quantity: i64) {
        if let Some(i) = self.position(product_id) {
            self.lines[i].quantity = Quantity::clamped(quantity);
            self.publish();
        }
    }

    pub fn remove(&mut self, product_id: ProductId) {
        if let Some(i) = self.position(product_id) {
            self.lines.remove(i);
            self.publish();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
        self.publish();
    }

    /// Total number of units, shown on the cart badge.
    pub fn count(&self) -> u32 {
        self.lines.iter().map(|l| u32::from(l.quantity.get())).sum()
    }

    pub fn subscribe(&self) -> watch::Receiver<u32> {
        self.badge.subscribe()
    }

    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn subtotal(&self) -> Amount {
        pricing::subtotal(&self.lines)
    }

    pub fn quote(&self, area: DeliveryArea) -> Quote {
        pricing::quote(&self.lines, area)
    }

    pub fn items(&self) -> Vec<OrderItemRequest> {
        self.lines.iter().map(CartLine::to_item).collect()
    }

    fn position(&self, product_id: ProductId) -> Option<usize> {
        self.lines.iter().position(|l| l.product.id == product_id)
    }

    fn publish(&self) {
        self.badge.send_replace(self.count());
    }
}
