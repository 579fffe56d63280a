use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Order status in the lifecycle. `Paid` and `FailedPayment` are terminal.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    New,
    Paid,
    FailedPayment,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Paid | OrderStatus::FailedPayment)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::New => "NEW",
            OrderStatus::Paid => "PAID",
            OrderStatus::FailedPayment => "FAILED_PAYMENT",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An individual line within an order. The unit price is the authoritative
/// catalog price resolved at create/update time, never a client value.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub sku: String,
    pub qty: u32,
    pub unit_price: f64,
}

/// A customer order. The total is derived from the items; both creation and
/// update go through the same summation so the two paths cannot diverge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    pub customer_id: String,
    pub items: Vec<OrderItem>,
    pub total: f64,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn new(customer_id: String, items: Vec<OrderItem>) -> Self {
        let now = Utc::now();
        let total = calculate_total(&items);
        Self {
            id: Uuid::new_v4(),
            customer_id,
            items,
            total,
            status: OrderStatus::New,
            created_at: now,
            updated_at: now,
        }
    }

    /// Replace all items wholesale and recompute the total.
    pub fn replace_items(&mut self, items: Vec<OrderItem>) {
        self.total = calculate_total(&items);
        self.items = items;
        self.updated_at = Utc::now();
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }
}

/// Σ(qty × unit_price) over all items, raw double precision.
pub fn calculate_total(items: &[OrderItem]) -> f64 {
    items
        .iter()
        .map(|item| item.qty as f64 * item.unit_price)
        .sum()
}
