//! Orders placed from a completed checkout.

use crate::cart::{Cart, PricingRules};
use crate::checkout::{CheckoutFlow, CheckoutStep, PaymentMethod, ShippingAddress};
use crate::error::CommerceError;
use crate::ids::{OrderId, OrderLineItemId, ProductId, UserId};
use crate::money::{Currency, Money};
use serde::{Deserialize, Serialize};

/// Order status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, awaiting confirmation.
    #[default]
    Pending,
    Confirmed,
    /// Being picked and packed.
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Confirmed => "Confirmed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(OrderStatus::Pending),
            "confirmed" => Some(OrderStatus::Confirmed),
            "processing" => Some(OrderStatus::Processing),
            "shipped" => Some(OrderStatus::Shipped),
            "delivered" => Some(OrderStatus::Delivered),
            "cancelled" | "canceled" => Some(OrderStatus::Cancelled),
            _ => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Orders can be cancelled until they ship.
    pub fn can_cancel(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Confirmed | OrderStatus::Processing
        )
    }

    /// The step after this one in the fulfilment sequence.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Pending => Some(OrderStatus::Confirmed),
            OrderStatus::Confirmed => Some(OrderStatus::Processing),
            OrderStatus::Processing => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered | OrderStatus::Cancelled => None,
        }
    }

    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        if to == OrderStatus::Cancelled {
            return self.can_cancel();
        }
        self.next() == Some(to)
    }
}

/// A placed order.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub id: OrderId,
    /// Human-readable order number.
    pub order_number: String,
    /// Customer (None for guest checkout).
    pub user_id: Option<UserId>,
    pub email: String,
    pub status: OrderStatus,
    pub line_items: Vec<OrderLineItem>,
    pub shipping_address: ShippingAddress,
    /// Name of the shipping method used.
    pub shipping_method: String,
    pub payment_method: PaymentMethod,
    pub subtotal: Money,
    pub shipping_total: Money,
    pub tax_total: Money,
    pub grand_total: Money,
    pub currency: Currency,
    pub note: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
    pub cancelled_at: Option<i64>,
}

impl Order {
    /// Snapshot `cart` into a new pending order and complete `flow`.
    ///
    /// The flow must be at the review step with every requirement met. The
    /// selected shipping method's rate replaces the flat fee from `rules`.
    pub fn place(
        cart: &Cart,
        flow: &mut CheckoutFlow,
        rules: &PricingRules,
        user_id: Option<UserId>,
    ) -> Result<Order, CommerceError> {
        if cart.is_empty() {
            return Err(CommerceError::EmptyCart);
        }
        if flow.step != CheckoutStep::Review {
            return Err(CommerceError::InvalidCheckoutTransition {
                from: flow.step.as_str().to_string(),
                to: CheckoutStep::Complete.as_str().to_string(),
            });
        }
        let missing = flow.missing_for_step(CheckoutStep::Complete, cart);
        if !missing.is_empty() {
            return Err(CommerceError::CheckoutIncomplete(missing.join(", ")));
        }

        let (Some(address), Some(selection), Some(payment)) = (
            flow.shipping_address.clone(),
            flow.shipping_method.clone(),
            flow.payment_method.clone(),
        ) else {
            return Err(CommerceError::CheckoutIncomplete("checkout details".into()));
        };

        let base = cart.calculate_pricing(rules)?;
        let shipping = selection.method.rate_for(&base.subtotal, rules);
        let pricing = cart.calculate_pricing_with_shipping(rules, shipping)?;

        let line_items = cart
            .items
            .iter()
            .map(|item| OrderLineItem {
                id: OrderLineItemId::generate(),
                product_id: item.product_id.clone(),
                name: item.product_name.clone(),
                size: item.size.clone(),
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
            })
            .collect();

        flow.advance(cart)?;

        let now = current_timestamp();
        Ok(Order {
            id: OrderId::generate(),
            order_number: generate_order_number(),
            user_id,
            email: address.email.clone(),
            status: OrderStatus::Pending,
            line_items,
            shipping_address: address,
            shipping_method: selection.method.name,
            payment_method: payment,
            subtotal: pricing.subtotal,
            shipping_total: pricing.shipping_total,
            tax_total: pricing.tax_total,
            grand_total: pricing.grand_total,
            currency: cart.currency,
            note: flow.note.clone(),
            created_at: now,
            updated_at: now,
            cancelled_at: None,
        })
    }

    pub fn item_count(&self) -> i64 {
        self.line_items.iter().map(|i| i.quantity).sum()
    }

    /// Move to `to` if the fulfilment sequence allows it.
    pub fn transition(&mut self, to: OrderStatus) -> Result<(), CommerceError> {
        if !self.status.can_transition_to(to) {
            return Err(CommerceError::InvalidOrderTransition {
                from: self.status.as_str().to_string(),
                to: to.as_str().to_string(),
            });
        }
        let now = current_timestamp();
        if to == OrderStatus::Cancelled {
            self.cancelled_at = Some(now);
        }
        self.status = to;
        self.updated_at = now;
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), CommerceError> {
        self.transition(OrderStatus::Cancelled)
    }
}

/// A line in a placed order, frozen at checkout time.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderLineItem {
    pub id: OrderLineItemId,
    pub product_id: ProductId,
    /// Product name at time of order.
    pub name: String,
    pub size: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub total_price: Money,
}

/// Human-readable order number, e.g. `CLO-20240514-7F3A9C`.
pub fn generate_order_number() -> String {
    let date = chrono::Utc::now().format("%Y%m%d");
    let suffix: u32 = rand::random::<u32>() & 0x00ff_ffff;
    format!("CLO-{}-{:06X}", date, suffix)
}

fn current_timestamp() -> i64 {
    chrono::Utc::now().timestamp()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Product;
    use crate::checkout::{ShippingMethod, ShippingSelection};

    fn ready_checkout(method: usize) -> (Cart, CheckoutFlow) {
        let mut cart = Cart::new();
        let tee = Product::new("1", "Classic Tee", Money::usd(2000), "T-Shirts").with_sizes(["M"]);
        cart.add_item(&tee, Some("M"), 3).unwrap();

        let mut flow = CheckoutFlow::new();
        flow.advance(&cart).unwrap();
        flow.set_shipping_address(ShippingAddress::new(
            "Ada Lane",
            "ada@example.com",
            "1 Main St",
            "Springfield",
            "12345",
            "US",
        ));
        flow.set_shipping_method(ShippingSelection::from_method(
            &ShippingMethod::standard_options()[method],
        ));
        flow.advance(&cart).unwrap();
        flow.set_payment_method(PaymentMethod::CashOnDelivery);
        flow.advance(&cart).unwrap();
        (cart, flow)
    }

    #[test]
    fn test_place_order_snapshots_cart() {
        let (cart, mut flow) = ready_checkout(1);
        let order = Order::place(&cart, &mut flow, &PricingRules::default(), Some(UserId::new("u1"))).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.item_count(), 3);
        assert_eq!(order.email, "ada@example.com");
        assert_eq!(order.subtotal, Money::usd(6000));
        // express rate replaces the flat fee
        assert_eq!(order.shipping_total, Money::usd(1499));
        assert_eq!(order.tax_total, Money::usd(480));
        assert_eq!(order.grand_total, Money::usd(6000 + 1499 + 480));
        assert!(order.order_number.starts_with("CLO-"));
        assert!(flow.is_complete());
    }

    #[test]
    fn test_place_requires_review_step() {
        let (cart, mut flow) = ready_checkout(0);
        flow.go_back().unwrap();
        assert!(matches!(
            Order::place(&cart, &mut flow, &PricingRules::default(), None),
            Err(CommerceError::InvalidCheckoutTransition { .. })
        ));
        assert_eq!(
            Order::place(&Cart::new(), &mut flow, &PricingRules::default(), None),
            Err(CommerceError::EmptyCart)
        );
    }

    #[test]
    fn test_status_sequence() {
        let (cart, mut flow) = ready_checkout(0);
        let mut order = Order::place(&cart, &mut flow, &PricingRules::default(), None).unwrap();

        assert!(order.transition(OrderStatus::Shipped).is_err());
        for status in [
            OrderStatus::Confirmed,
            OrderStatus::Processing,
            OrderStatus::Shipped,
        ] {
            order.transition(status).unwrap();
        }
        assert!(order.cancel().is_err());
        order.transition(OrderStatus::Delivered).unwrap();
        assert!(order.status.is_terminal());
    }

    #[test]
    fn test_cancel_before_shipping() {
        let (cart, mut flow) = ready_checkout(0);
        let mut order = Order::place(&cart, &mut flow, &PricingRules::default(), None).unwrap();
        order.transition(OrderStatus::Confirmed).unwrap();
        order.cancel().unwrap();
        assert!(order.cancelled_at.is_some());
        assert!(order.transition(OrderStatus::Processing).is_err());
    }
}
