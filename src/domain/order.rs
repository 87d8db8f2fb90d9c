/// Represents a customer order.
///
/// # Actor Framework
/// This struct implements the [`Entity`](crate::actor_framework::Entity) trait,
/// allowing it to be managed by a [`ResourceActor`](crate::actor_framework::ResourceActor).
///
/// See `order_actor::entity` for details on:
/// - Creation parameters ([`OrderCreate`])
/// - Status transitions ([`OrderAction`](crate::order_actor::OrderAction))
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::money;

/// Lifecycle of an order. `Completed` and `Cancelled` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    PendingPayment,
    Paid,
    Shipped,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::PendingPayment => "PENDING_PAYMENT",
            OrderStatus::Paid => "PAID",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Completed => "COMPLETED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A purchased product with the unit price frozen at order time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
}

impl OrderItem {
    pub fn new(product_id: impl Into<String>, quantity: u32, unit_price: Decimal) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price,
        }
    }

    /// `None` on overflow.
    pub fn line_total(&self) -> Option<Decimal> {
        money::line_total(self.unit_price, self.quantity)
    }
}

/// Carrier hand-off recorded when an order ships.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shipment {
    pub carrier: String,
    pub tracking_no: String,
}

impl Shipment {
    pub fn new(carrier: impl Into<String>, tracking_no: impl Into<String>) -> Self {
        Self {
            carrier: carrier.into(),
            tracking_no: tracking_no.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: String,
    pub user_id: String,
    pub(crate) items: Vec<OrderItem>,
    pub(crate) total: Decimal,
    pub address_id: Option<String>,
    pub status: OrderStatus,
    pub shipment: Option<Shipment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Total frozen at creation. Never recomputed from the catalog.
    pub fn total(&self) -> Decimal {
        self.total
    }
}

/// One requested line of a new order. Without an explicit price the current catalog
/// price is used.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LineItem {
    pub product_id: String,
    pub quantity: i32,
    #[serde(default)]
    pub unit_price: Option<Decimal>,
}

impl LineItem {
    pub fn new(product_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price: None,
        }
    }

    pub fn with_price(mut self, unit_price: Decimal) -> Self {
        self.unit_price = Some(unit_price);
        self
    }
}

/// Order request as received from a caller, before validation and pricing.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct NewOrder {
    pub user_id: String,
    pub items: Vec<LineItem>,
    #[serde(default)]
    pub address_id: Option<String>,
}

impl NewOrder {
    pub fn new(user_id: impl Into<String>, items: Vec<LineItem>) -> Self {
        Self {
            user_id: user_id.into(),
            items,
            address_id: None,
        }
    }

    pub fn with_address(mut self, address_id: impl Into<String>) -> Self {
        self.address_id = Some(address_id.into());
        self
    }
}

/// Validated, fully priced payload for creating a new order.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderCreate {
    pub user_id: String,
    pub items: Vec<OrderItem>,
    pub address_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_uses_wire_names() {
        assert_eq!(OrderStatus::PendingPayment.to_string(), "PENDING_PAYMENT");
        let json = serde_json::to_string(&OrderStatus::Cancelled).unwrap();
        assert_eq!(json, "\"CANCELLED\"");
        let parsed: OrderStatus = serde_json::from_str("\"SHIPPED\"").unwrap();
        assert_eq!(parsed, OrderStatus::Shipped);
    }

    #[test]
    fn new_order_deserializes_with_optional_prices() {
        let order: NewOrder = serde_json::from_str(
            r#"{"user_id":"u1","items":[{"product_id":"p1","quantity":2},{"product_id":"p2","quantity":1,"unit_price":"3.20"}]}"#,
        )
        .unwrap();
        assert_eq!(order.user_id, "u1");
        assert_eq!(order.address_id, None);
        assert_eq!(order.items[0], LineItem::new("p1", 2));
        assert_eq!(order.items[1].unit_price, Some(Decimal::new(320, 2)));
    }
}
