use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Placed,
    Paid,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PLACED" => Ok(OrderStatus::Placed),
            "PAID" => Ok(OrderStatus::Paid),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown order status '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    Pix,
    CreditCard,
    BankSlip,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Pix => "PIX",
            PaymentMethod::CreditCard => "CREDIT_CARD",
            PaymentMethod::BankSlip => "BANK_SLIP",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PIX" => Ok(PaymentMethod::Pix),
            "CREDIT_CARD" => Ok(PaymentMethod::CreditCard),
            "BANK_SLIP" => Ok(PaymentMethod::BankSlip),
            other => Err(DomainError::InvalidInput(format!(
                "Unknown payment method '{}'",
                other
            ))),
        }
    }
}

/// Opaque payment data carried on an order. Never validated or executed here;
/// which of the optional fields are meaningful depends on `method`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentData {
    pub method: PaymentMethod,
    pub pix_key: Option<String>,
    pub card_number: Option<String>,
    pub authorization_code: Option<String>,
    pub payment_line: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewOrderLine {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

/// Creation payload. Carries no status, timestamp or total: those are always
/// assigned by `Order::place`, whatever the caller sent over the wire.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: Uuid,
    pub payment: Option<PaymentData>,
    pub payment_key: Option<String>,
    pub note: Option<String>,
    pub tracking_code: Option<String>,
    pub invoice_url: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

/// Full-replacement update payload. Every scalar, including status and total,
/// overwrites the stored value verbatim; the line list supersedes the old one
/// entirely. An empty line list is legal and leaves the order with no lines.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub customer_id: Uuid,
    pub status: OrderStatus,
    pub total: BigDecimal,
    pub payment: Option<PaymentData>,
    pub payment_key: Option<String>,
    pub note: Option<String>,
    pub tracking_code: Option<String>,
    pub invoice_url: Option<String>,
    pub lines: Vec<NewOrderLine>,
}

/// One product line of an order.
///
/// `id` stays `None` until the store persists the line. The owner reference
/// is private: it is maintained exclusively by the `Order` mutators, so a
/// line is attached to an order if and only if that order's line sequence
/// contains it.
#[derive(Debug, Clone)]
pub struct OrderLine {
    pub id: Option<Uuid>,
    order_id: Option<Uuid>,
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

impl OrderLine {
    pub fn new(product_id: Uuid, quantity: i32, unit_price: BigDecimal) -> Self {
        Self {
            id: None,
            order_id: None,
            product_id,
            quantity,
            unit_price,
        }
    }

    /// Rebuild a persisted line. It starts detached; re-attaching it to its
    /// order goes through `Order::add_line` like any other line.
    pub fn restore(id: Uuid, product_id: Uuid, quantity: i32, unit_price: BigDecimal) -> Self {
        Self {
            id: Some(id),
            order_id: None,
            product_id,
            quantity,
            unit_price,
        }
    }

    /// The owning order, or `None` for a detached line.
    pub fn order_id(&self) -> Option<Uuid> {
        self.order_id
    }

    pub fn subtotal(&self) -> BigDecimal {
        &self.unit_price * BigDecimal::from(self.quantity)
    }

    fn attach(&mut self, order_id: Uuid) {
        self.order_id = Some(order_id);
    }

    fn detach(&mut self) {
        self.order_id = None;
    }
}

impl From<NewOrderLine> for OrderLine {
    fn from(line: NewOrderLine) -> Self {
        OrderLine::new(line.product_id, line.quantity, line.unit_price)
    }
}

/// The order aggregate root. Owns its line sequence; the only sanctioned ways
/// to mutate the order↔line relationship are `add_line`, `remove_line` and
/// `clear_lines`, which keep the owner back-references consistent.
#[derive(Debug, Clone)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub status: OrderStatus,
    pub note: Option<String>,
    pub total: BigDecimal,
    pub tracking_code: Option<String>,
    pub invoice_url: Option<String>,
    pub payment: Option<PaymentData>,
    pub payment_key: Option<String>,
    lines: Vec<OrderLine>,
}

impl Order {
    /// Place a new order from a creation payload.
    ///
    /// The lifecycle always starts from a known state: status is forced to
    /// `PLACED`, the timestamp is stamped here, and the total is derived from
    /// the lines rather than trusted from the caller.
    pub fn place(draft: NewOrder) -> Self {
        let mut order = Order {
            id: Uuid::new_v4(),
            customer_id: draft.customer_id,
            created_at: Utc::now(),
            status: OrderStatus::Placed,
            note: draft.note,
            total: BigDecimal::from(0),
            tracking_code: draft.tracking_code,
            invoice_url: draft.invoice_url,
            payment: draft.payment,
            payment_key: draft.payment_key,
            lines: Vec::new(),
        };
        for line in draft.lines {
            order.add_line(OrderLine::from(line));
        }
        order.total = order.compute_total();
        order
    }

    /// Rebuild an aggregate from persisted state. Scalars not covered by the
    /// arguments are filled in by the caller; lines are re-attached through
    /// `add_line` so their owner references are established on load.
    pub fn restore(
        id: Uuid,
        customer_id: Uuid,
        created_at: DateTime<Utc>,
        status: OrderStatus,
    ) -> Self {
        Order {
            id,
            customer_id,
            created_at,
            status,
            note: None,
            total: BigDecimal::from(0),
            tracking_code: None,
            invoice_url: None,
            payment: None,
            payment_key: None,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[OrderLine] {
        &self.lines
    }

    /// Append a line and point it back at this order.
    pub fn add_line(&mut self, mut line: OrderLine) {
        line.attach(self.id);
        self.lines.push(line);
    }

    /// Remove a line by its identity. The removed line comes back detached;
    /// an unknown id leaves the sequence untouched.
    pub fn remove_line(&mut self, line_id: Uuid) -> Option<OrderLine> {
        let pos = self.lines.iter().position(|l| l.id == Some(line_id))?;
        let mut line = self.lines.remove(pos);
        line.detach();
        Some(line)
    }

    /// Detach every line and empty the sequence, returning the orphans.
    /// First step of a full-replacement update.
    pub fn clear_lines(&mut self) -> Vec<OrderLine> {
        let mut detached: Vec<OrderLine> = self.lines.drain(..).collect();
        for line in &mut detached {
            line.detach();
        }
        detached
    }

    /// Sum of line subtotals, rounded half-up to two decimal places. The
    /// absolute value is a floor against crafted negative inputs.
    pub fn compute_total(&self) -> BigDecimal {
        self.lines
            .iter()
            .map(OrderLine::subtotal)
            .fold(BigDecimal::from(0), |acc, subtotal| acc + subtotal)
            .with_scale_round(2, RoundingMode::HalfUp)
            .abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn price(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).expect("valid decimal")
    }

    fn line(product_id: Uuid, quantity: i32, unit_price: &str) -> NewOrderLine {
        NewOrderLine {
            product_id,
            quantity,
            unit_price: price(unit_price),
        }
    }

    fn draft(lines: Vec<NewOrderLine>) -> NewOrder {
        NewOrder {
            customer_id: Uuid::new_v4(),
            payment: None,
            payment_key: None,
            note: None,
            tracking_code: None,
            invoice_url: None,
            lines,
        }
    }

    #[test]
    fn add_line_establishes_back_reference_in_order() {
        let mut order = Order::restore(
            Uuid::new_v4(),
            Uuid::new_v4(),
            Utc::now(),
            OrderStatus::Placed,
        );
        let products: Vec<Uuid> = (0..3).map(|_| Uuid::new_v4()).collect();
        for product_id in &products {
            order.add_line(OrderLine::new(*product_id, 1, price("10.00")));
        }

        assert_eq!(order.lines().len(), 3);
        for (added, kept) in products.iter().zip(order.lines()) {
            assert_eq!(kept.product_id, *added, "addition order preserved");
            assert_eq!(kept.order_id(), Some(order.id));
        }
    }

    #[test]
    fn remove_line_detaches_and_drops_from_sequence() {
        let mut order = Order::place(draft(vec![
            line(Uuid::new_v4(), 1, "10.00"),
            line(Uuid::new_v4(), 2, "5.00"),
        ]));
        let line_id = Uuid::new_v4();
        order.add_line(OrderLine::restore(line_id, Uuid::new_v4(), 1, price("1.00")));

        let removed = order.remove_line(line_id).expect("line should be removed");

        assert_eq!(removed.id, Some(line_id));
        assert!(removed.order_id().is_none());
        assert_eq!(order.lines().len(), 2);
        assert!(order.lines().iter().all(|l| l.id != Some(line_id)));
    }

    #[test]
    fn remove_line_with_unknown_id_leaves_sequence_unchanged() {
        let mut order = Order::place(draft(vec![line(Uuid::new_v4(), 1, "10.00")]));

        assert!(order.remove_line(Uuid::new_v4()).is_none());
        assert_eq!(order.lines().len(), 1);
    }

    #[test]
    fn clear_lines_detaches_every_line() {
        let mut order = Order::place(draft(vec![
            line(Uuid::new_v4(), 2, "50.00"),
            line(Uuid::new_v4(), 1, "50.00"),
        ]));

        let orphans = order.clear_lines();

        assert!(order.lines().is_empty());
        assert_eq!(orphans.len(), 2);
        assert!(orphans.iter().all(|l| l.order_id().is_none()));
    }

    #[test]
    fn subtotal_is_unit_price_times_quantity() {
        let line = OrderLine::new(Uuid::new_v4(), 3, price("19.99"));
        assert_eq!(line.subtotal(), price("59.97"));
    }

    #[test]
    fn place_computes_total_and_forces_initial_state() {
        let before = Utc::now();
        let order = Order::place(draft(vec![
            line(Uuid::new_v4(), 2, "50.00"),
            line(Uuid::new_v4(), 1, "50.00"),
        ]));

        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.total, price("150.00"));
        assert!(order.created_at >= before && order.created_at <= Utc::now());
        assert_eq!(order.lines().len(), 2);
        assert!(order.lines().iter().all(|l| l.order_id() == Some(order.id)));
        assert!(order.lines().iter().all(|l| l.id.is_none()));
    }

    #[test]
    fn total_rounds_half_up_to_two_decimals() {
        let order = Order::place(draft(vec![line(Uuid::new_v4(), 1, "0.335")]));
        assert_eq!(order.total, price("0.34"));

        let order = Order::place(draft(vec![line(Uuid::new_v4(), 3, "0.111")]));
        assert_eq!(order.total, price("0.33"));
    }

    #[test]
    fn total_is_never_negative() {
        let order = Order::place(draft(vec![
            line(Uuid::new_v4(), 2, "-50.00"),
            line(Uuid::new_v4(), 1, "10.00"),
        ]));
        assert_eq!(order.total, price("90.00"));
    }

    #[test]
    fn total_of_empty_line_list_is_zero() {
        let order = Order::place(draft(vec![]));
        assert_eq!(order.total, price("0.00"));
    }

    #[test]
    fn status_round_trips_through_strings() {
        for status in [
            OrderStatus::Placed,
            OrderStatus::Paid,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(status.as_str().parse::<OrderStatus>().unwrap(), status);
        }
        assert!("INVOICED".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn payment_method_round_trips_through_strings() {
        for method in [
            PaymentMethod::Pix,
            PaymentMethod::CreditCard,
            PaymentMethod::BankSlip,
        ] {
            assert_eq!(method.as_str().parse::<PaymentMethod>().unwrap(), method);
        }
        assert!("CASH".parse::<PaymentMethod>().is_err());
    }
}
