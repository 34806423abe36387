//! Checkout state machine:
//! `Editing -> Validating -> Submitting -> {Placed, Failed}`.
//!
//! The flow is the only guard against duplicate orders: while a submission
//! is in flight every further submit attempt is refused without building a
//! request.

use log::{info, warn};
use thiserror::Error;

use crate::domain::order::{CustomerDetails, OrderId, OrderRequest};
use crate::domain::pricing::DeliveryArea;

use super::cart::Cart;
use super::challenge::{ArithmeticChallenge, HumanCheck};
use super::gateway::{GatewayError, OrderGateway};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Editing,
    Validating,
    Submitting,
    Placed { order_id: OrderId },
    Failed { reason: String },
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CheckoutError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("your cart is empty")]
    EmptyCart,
    #[error("please answer the verification question first")]
    ChallengeNotPassed,
    #[error("your order is already being submitted")]
    SubmissionInProgress,
    #[error("this order has already been placed")]
    AlreadyPlaced,
    #[error(transparent)]
    Rejected(#[from] GatewayError),
}

pub struct CheckoutFlow<C = ArithmeticChallenge> {
    details: CustomerDetails,
    area: DeliveryArea,
    challenge: C,
    state: CheckoutState,
}

impl Default for CheckoutFlow<ArithmeticChallenge> {
    fn default() -> Self {
        Self::new(ArithmeticChallenge::new())
    }
}

impl<C: HumanCheck> CheckoutFlow<C> {
    pub fn new(challenge: C) -> Self {
        Self {
            details: CustomerDetails::default(),
            area: DeliveryArea::Dhaka,
            challenge,
            state: CheckoutState::Editing,
        }
    }

    pub fn state(&self) -> &CheckoutState {
        &self.state
    }

    pub fn details(&self) -> &CustomerDetails {
        &self.details
    }

    pub fn area(&self) -> DeliveryArea {
        self.area
    }

    /// Edit the customer details. Allowed while editing or after a failed
    /// submission, which returns the flow to `Editing` with everything the
    /// user typed still in place.
    pub fn edit(&mut self, f: impl FnOnce(&mut CustomerDetails)) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        f(&mut self.details);
        self.state = CheckoutState::Editing;
        Ok(())
    }

    pub fn set_area(&mut self, area: DeliveryArea) -> Result<(), CheckoutError> {
        self.ensure_editable()?;
        self.area = area;
        self.state = CheckoutState::Editing;
        Ok(())
    }

    pub fn challenge_prompt(&self) -> String {
        self.challenge.prompt()
    }

    pub fn verify_human(&mut self, answer: &str) -> bool {
        self.challenge.answer(answer)
    }

    /// Validate and build the request from the cart as it is right now.
    /// On success the flow is `Submitting` until [`finish_submit`] is called.
    ///
    /// [`finish_submit`]: CheckoutFlow::finish_submit
    pub fn begin_submit(&mut self, cart: &Cart) -> Result<OrderRequest, CheckoutError> {
        match self.state {
            CheckoutState::Submitting | CheckoutState::Validating => {
                return Err(CheckoutError::SubmissionInProgress)
            }
            CheckoutState::Placed { .. } => return Err(CheckoutError::AlreadyPlaced),
            CheckoutState::Editing | CheckoutState::Failed { .. } => {}
        }

        self.state = CheckoutState::Validating;
        match self.build_request(cart) {
            Ok(request) => {
                self.state = CheckoutState::Submitting;
                Ok(request)
            }
            Err(e) => {
                self.state = CheckoutState::Editing;
                Err(e)
            }
        }
    }

    /// Record the outcome of the submission started by `begin_submit`.
    /// Success clears the cart; failure keeps both cart and details.
    pub fn finish_submit(
        &mut self,
        outcome: Result<OrderId, GatewayError>,
        cart: &mut Cart,
    ) -> &CheckoutState {
        if self.state != CheckoutState::Submitting {
            warn!("ignoring submission outcome in state {:?}", self.state);
            return &self.state;
        }
        self.state = match outcome {
            Ok(order_id) => {
                info!("order #{order_id} placed");
                cart.clear();
                CheckoutState::Placed { order_id }
            }
            Err(e) => {
                warn!("order submission failed: {e}");
                CheckoutState::Failed {
                    reason: e.to_string(),
                }
            }
        };
        &self.state
    }

    /// Run a full submission through `gateway`. Never retries on its own.
    pub async fn submit<G: OrderGateway>(
        &mut self,
        gateway: &G,
        cart: &mut Cart,
    ) -> Result<OrderId, CheckoutError> {
        let request = self.begin_submit(cart)?;
        let outcome = gateway.place_order(&request).await;
        let result = outcome.clone();
        self.finish_submit(outcome, cart);
        result.map_err(CheckoutError::from)
    }

    pub fn confirmation_notice(&self) -> Option<String> {
        match &self.state {
            CheckoutState::Placed { order_id } => Some(format!(
                "Thank you! Your order #{order_id} has been placed. An agent will call you within 24 hours to confirm."
            )),
            _ => None,
        }
    }

    /// Begin a fresh checkout after an order was placed.
    pub fn start_over(&mut self) {
        self.details = CustomerDetails::default();
        self.challenge.reset();
        self.state = CheckoutState::Editing;
    }

    fn ensure_editable(&self) -> Result<(), CheckoutError> {
        match self.state {
            CheckoutState::Editing | CheckoutState::Failed { .. } => Ok(()),
            CheckoutState::Placed { .. } => Err(CheckoutError::AlreadyPlaced),
            CheckoutState::Validating | CheckoutState::Submitting => {
                Err(CheckoutError::SubmissionInProgress)
            }
        }
    }

    fn build_request(&self, cart: &Cart) -> Result<OrderRequest, CheckoutError> {
        let required = |field: &'static str, value: &str| {
            let value = value.trim();
            if value.is_empty() {
                Err(CheckoutError::MissingField(field))
            } else {
                Ok(value.to_string())
            }
        };
        let optional = |value: &Option<String>| {
            value
                .as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };

        let customer = CustomerDetails {
            name: required("name", &self.details.name)?,
            address: required("address", &self.details.address)?,
            phone: required("phone", &self.details.phone)?,
            email: optional(&self.details.email),
            note: optional(&self.details.note),
        };
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }
        if !self.challenge.passed() {
            return Err(CheckoutError::ChallengeNotPassed);
        }

        let quote = cart.quote(self.area);
        Ok(OrderRequest {
            customer,
            delivery_area: self.area,
            subtotal: Some(quote.subtotal),
            delivery_fee: Some(quote.delivery_fee),
            total: Some(quote.total),
            items: cart.items(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::{Cell, RefCell};
    use std::sync::Arc;

    use super::*;
    use crate::domain::catalog::{Product, ProductId};

    struct FakeGateway {
        outcome: Result<OrderId, GatewayError>,
        calls: Cell<usize>,
        last: RefCell<Option<OrderRequest>>,
    }

    impl FakeGateway {
        fn answering(outcome: Result<OrderId, GatewayError>) -> Self {
            Self {
                outcome,
                calls: Cell::new(0),
                last: RefCell::new(None),
            }
        }
    }

    impl OrderGateway for FakeGateway {
        async fn place_order(&self, request: &OrderRequest) -> Result<OrderId, GatewayError> {
            self.calls.set(self.calls.get() + 1);
            *self.last.borrow_mut() = Some(request.clone());
            self.outcome.clone()
        }
    }

    fn cart() -> Cart {
        let mut cart = Cart::new();
        let wallet = Product::new(ProductId(1), "Wallet", 550, "wallets").unwrap();
        cart.add(Arc::new(wallet), 2);
        cart
    }

    fn ready_flow() -> CheckoutFlow {
        let mut flow = CheckoutFlow::new(ArithmeticChallenge::from_operands(2, 3));
        flow.edit(|d| {
            d.name = " Rahim ".to_string();
            d.address = "Road 7, Dhanmondi".to_string();
            d.phone = "01700000000".to_string();
            d.email = Some(String::new());
        })
        .unwrap();
        assert!(flow.verify_human("5"));
        flow
    }

    #[test]
    fn begin_submit_builds_request_from_current_cart() {
        let mut flow = ready_flow();
        let mut cart = cart();
        cart.update_quantity(ProductId(1), 3);

        let request = flow.begin_submit(&cart).unwrap();
        assert_eq!(flow.state(), &CheckoutState::Submitting);
        assert_eq!(request.customer.name, "Rahim");
        assert_eq!(request.customer.email, None);
        assert_eq!(request.items[0].quantity, 3);
        assert_eq!(request.subtotal, Some(1650));
        assert_eq!(request.delivery_fee, Some(29));
        assert_eq!(request.total, Some(1679));
    }

    #[test]
    fn second_submit_while_submitting_is_refused() {
        let mut flow = ready_flow();
        let cart = cart();
        flow.begin_submit(&cart).unwrap();
        assert_eq!(
            flow.begin_submit(&cart),
            Err(CheckoutError::SubmissionInProgress)
        );
        assert!(flow.edit(|d| d.name.clear()).is_err());
    }

    #[test]
    fn missing_phone_keeps_editing() {
        let mut flow = ready_flow();
        flow.edit(|d| d.phone = "   ".to_string()).unwrap();
        assert_eq!(
            flow.begin_submit(&cart()),
            Err(CheckoutError::MissingField("phone"))
        );
        assert_eq!(flow.state(), &CheckoutState::Editing);
    }

    #[test]
    fn unanswered_challenge_blocks_submission() {
        let mut flow = CheckoutFlow::new(ArithmeticChallenge::from_operands(1, 1));
        flow.edit(|d| {
            d.name = "Rahim".to_string();
            d.address = "Mirpur".to_string();
            d.phone = "017".to_string();
        })
        .unwrap();
        assert_eq!(
            flow.begin_submit(&cart()),
            Err(CheckoutError::ChallengeNotPassed)
        );
    }

    #[test]
    fn empty_cart_blocks_submission() {
        let mut flow = ready_flow();
        assert_eq!(flow.begin_submit(&Cart::new()), Err(CheckoutError::EmptyCart));
    }

    #[actix_web::test]
    async fn successful_submit_clears_cart_and_confirms() {
        let mut flow = ready_flow();
        let mut cart = cart();
        let gateway = FakeGateway::answering(Ok(OrderId(41)));

        let id = flow.submit(&gateway, &mut cart).await.unwrap();

        assert_eq!(id, OrderId(41));
        assert!(cart.is_empty());
        assert_eq!(flow.state(), &CheckoutState::Placed { order_id: OrderId(41) });
        assert!(flow.confirmation_notice().unwrap().contains("#41"));
        assert_eq!(
            flow.submit(&gateway, &mut cart).await,
            Err(CheckoutError::AlreadyPlaced)
        );
        assert_eq!(gateway.calls.get(), 1);
    }

    #[actix_web::test]
    async fn rejected_submit_keeps_cart_and_details() {
        let mut flow = ready_flow();
        let mut cart = cart();
        let gateway =
            FakeGateway::answering(Err(GatewayError::Validation("name is required".to_string())));

        let err = flow.submit(&gateway, &mut cart).await.unwrap_err();

        assert!(matches!(err, CheckoutError::Rejected(GatewayError::Validation(_))));
        assert_eq!(cart.count(), 2);
        assert_eq!(flow.details().name, " Rahim ");
        assert!(matches!(flow.state(), CheckoutState::Failed { reason } if reason == "name is required"));
        assert!(flow.confirmation_notice().is_none());

        flow.edit(|d| d.note = Some("call after 5pm".to_string())).unwrap();
        assert_eq!(flow.state(), &CheckoutState::Editing);
    }

    #[actix_web::test]
    async fn transient_failure_is_not_retried() {
        let mut flow = ready_flow();
        let mut cart = cart();
        let gateway = FakeGateway::answering(Err(GatewayError::Transient("timed out".to_string())));

        let err = flow.submit(&gateway, &mut cart).await.unwrap_err();
        assert!(matches!(err, CheckoutError::Rejected(ref e) if e.is_retryable()));
        assert_eq!(gateway.calls.get(), 1);
        assert!(gateway.last.borrow().is_some());
    }

    #[test]
    fn outcome_outside_submitting_is_ignored() {
        let mut flow = ready_flow();
        let mut cart = cart();
        flow.finish_submit(Ok(OrderId(1)), &mut cart);
        assert_eq!(flow.state(), &CheckoutState::Editing);
        assert_eq!(cart.count(), 2);
    }

    #[actix_web::test]
    async fn start_over_returns_to_editing() {
        let mut flow = ready_flow();
        let mut cart = cart();
        flow.submit(&FakeGateway::answering(Ok(OrderId(2))), &mut cart)
            .await
            .unwrap();
        flow.start_over();
        assert_eq!(flow.state(), &CheckoutState::Editing);
        assert!(flow.details().name.is_empty());
    }
}
