//! Checkout flow state machine.

use crate::cart::Cart;
use crate::checkout::{ShippingAddress, ShippingSelection};
use crate::error::CommerceError;
use crate::ids::CheckoutId;
use serde::{Deserialize, Serialize};

/// How long an abandoned checkout stays valid, in seconds.
pub const CHECKOUT_TTL_SECS: i64 = 3600;

/// Steps in the checkout flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckoutStep {
    Cart,
    Shipping,
    Payment,
    Review,
    Complete,
}

impl CheckoutStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "cart",
            CheckoutStep::Shipping => "shipping",
            CheckoutStep::Payment => "payment",
            CheckoutStep::Review => "review",
            CheckoutStep::Complete => "complete",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            CheckoutStep::Cart => "Cart",
            CheckoutStep::Shipping => "Shipping",
            CheckoutStep::Payment => "Payment",
            CheckoutStep::Review => "Review",
            CheckoutStep::Complete => "Complete",
        }
    }

    /// Step number (1-indexed).
    pub fn number(&self) -> u8 {
        match self {
            CheckoutStep::Cart => 1,
            CheckoutStep::Shipping => 2,
            CheckoutStep::Payment => 3,
            CheckoutStep::Review => 4,
            CheckoutStep::Complete => 5,
        }
    }

    fn next(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Cart => Some(CheckoutStep::Shipping),
            CheckoutStep::Shipping => Some(CheckoutStep::Payment),
            CheckoutStep::Payment => Some(CheckoutStep::Review),
            CheckoutStep::Review => Some(CheckoutStep::Complete),
            CheckoutStep::Complete => None,
        }
    }

    fn prev(&self) -> Option<CheckoutStep> {
        match self {
            CheckoutStep::Cart => None,
            CheckoutStep::Shipping => Some(CheckoutStep::Cart),
            CheckoutStep::Payment => Some(CheckoutStep::Shipping),
            CheckoutStep::Review => Some(CheckoutStep::Payment),
            CheckoutStep::Complete => Some(CheckoutStep::Review),
        }
    }
}

/// How the shopper pays. No payment is processed; this is recorded on
/// the order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PaymentMethod {
    Card { brand: String, last4: String },
    CashOnDelivery,
}

impl PaymentMethod {
    pub fn label(&self) -> String {
        match self {
            PaymentMethod::Card { brand, last4 } => format!("{} ending in {}", brand, last4),
            PaymentMethod::CashOnDelivery => "Cash on delivery".to_string(),
        }
    }
}

/// Checkout flow state.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CheckoutFlow {
    pub id: CheckoutId,
    pub step: CheckoutStep,
    pub completed_steps: Vec<CheckoutStep>,
    pub shipping_address: Option<ShippingAddress>,
    pub shipping_method: Option<ShippingSelection>,
    pub payment_method: Option<PaymentMethod>,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub expires_at: i64,
}

impl Default for CheckoutFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckoutFlow {
    pub fn new() -> Self {
        let now = current_timestamp();
        Self {
            id: CheckoutId::generate(),
            step: CheckoutStep::Cart,
            completed_steps: Vec::new(),
            shipping_address: None,
            shipping_method: None,
            payment_method: None,
            note: None,
            created_at: now,
            updated_at: now,
            expires_at: now + CHECKOUT_TTL_SECS,
        }
    }

    /// What is still missing to enter `step`.
    pub fn missing_for_step(&self, step: CheckoutStep, cart: &Cart) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if step.number() >= CheckoutStep::Shipping.number() && cart.is_empty() {
            missing.push("cart items");
        }
        if step.number() >= CheckoutStep::Payment.number() {
            if !self
                .shipping_address
                .as_ref()
                .is_some_and(ShippingAddress::is_complete)
            {
                missing.push("shipping address");
            }
            if self.shipping_method.is_none() {
                missing.push("shipping method");
            }
        }
        if step.number() >= CheckoutStep::Review.number() && self.payment_method.is_none() {
            missing.push("payment method");
        }
        missing
    }

    pub fn can_advance_to(&self, step: CheckoutStep, cart: &Cart) -> bool {
        self.missing_for_step(step, cart).is_empty()
    }

    /// Move to the next step if its requirements are met.
    pub fn advance(&mut self, cart: &Cart) -> Result<CheckoutStep, CommerceError> {
        let next = self
            .step
            .next()
            .ok_or_else(|| CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            })?;

        let missing = self.missing_for_step(next, cart);
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
        }

        if !self.completed_steps.contains(&self.step) {
            self.completed_steps.push(self.step);
        }
        self.step = next;
        self.touch();
        Ok(next)
    }

    pub fn go_back(&mut self) -> Result<CheckoutStep, CommerceError> {
        let prev = self
            .step
            .prev()
            .ok_or_else(|| CommerceError::InvalidCheckoutTransition {
                from: self.step.as_str().to_string(),
                to: "none".to_string(),
            })?;
        self.step = prev;
        self.touch();
        Ok(prev)
    }

    pub fn set_shipping_address(&mut self, address: ShippingAddress) {
        self.shipping_address = Some(address);
        self.touch();
    }

    pub fn set_shipping_method(&mut self, selection: ShippingSelection) {
        self.shipping_method = Some(selection);
        self.touch();
    }

    pub fn set_payment_method(&mut self, method: PaymentMethod) {
        self.payment_method = Some(method);
        self.touch();
    }

    pub fn is_complete(&self) -> bool {
        self.step == CheckoutStep::Complete
    }

    pub fn is_expired(&self) -> bool {
        current_timestamp() > self.expires_at
    }

    pub fn progress_percent(&self) -> u8 {
        ((self.step.number() as f64 / 5.0) * 100.0) as u8
    }

    fn touch(&mut self) {
        self.updated_at = current_timestamp();
    }
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::checkout::ShippingMethod;
    use crate::money::Money;

    fn cart() -> Cart {
        let mut cart = Cart::new();
        cart.add_item(&Product::new("1", "Tote", Money::usd(2500), "Bags"), None, 1)
            .unwrap();
        cart
    }

    fn address() -> ShippingAddress {
        ShippingAddress::new("Ada Lane", "ada@example.com", "1 Main St", "Springfield", "12345", "US")
    }

    #[test]
    fn test_empty_cart_cannot_leave_cart_step() {
        let mut flow = CheckoutFlow::new();
        let err = flow.advance(&Cart::new()).unwrap_err();
        assert_eq!(err, CommerceError::CheckoutIncomplete("cart items".into()));
        assert_eq!(flow.step, CheckoutStep::Cart);
    }

    #[test]
    fn test_full_walk() {
        let cart = cart();
        let mut flow = CheckoutFlow::new();
        assert_eq!(flow.advance(&cart).unwrap(), CheckoutStep::Shipping);

        let err = flow.advance(&cart).unwrap_err();
        assert_eq!(
            err,
            CommerceError::CheckoutIncomplete("shipping address, shipping method".into())
        );

        flow.set_shipping_address(address());
        flow.set_shipping_method(ShippingSelection::from_method(&ShippingMethod::standard_options()[0]));
        assert_eq!(flow.advance(&cart).unwrap(), CheckoutStep::Payment);

        assert!(flow.advance(&cart).is_err());
        flow.set_payment_method(PaymentMethod::CashOnDelivery);
        assert_eq!(flow.advance(&cart).unwrap(), CheckoutStep::Review);
        assert_eq!(
            flow.completed_steps,
            vec![CheckoutStep::Cart, CheckoutStep::Shipping, CheckoutStep::Payment]
        );
    }

    #[test]
    fn test_incomplete_address_blocks_payment() {
        let cart = cart();
        let mut flow = CheckoutFlow::new();
        flow.advance(&cart).unwrap();
        flow.set_shipping_address(ShippingAddress::default());
        flow.set_shipping_method(ShippingSelection::from_method(&ShippingMethod::standard_options()[1]));
        assert!(flow.advance(&cart).is_err());
    }

    #[test]
    fn test_go_back() {
        let mut flow = CheckoutFlow::new();
        assert!(flow.go_back().is_err());
        flow.advance(&cart()).unwrap();
        assert_eq!(flow.go_back().unwrap(), CheckoutStep::Cart);
    }

    #[test]
    fn test_payment_label() {
        let card = PaymentMethod::Card {
            brand: "Visa".into(),
            last4: "4242".into(),
        };
        assert_eq!(card.label(), "Visa ending in 4242");
    }
}
