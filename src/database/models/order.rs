use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::customer::CustomerView;
use super::order_line::OrderItemView;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Approved,
    Rejected,
}

impl OrderStatus {
    pub const NAMES: &'static [&'static str] = &["pending", "approved", "rejected"];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Approved => "approved",
            OrderStatus::Rejected => "rejected",
        }
    }

    /// A pending order may be approved or rejected; decided orders are final
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        self == next
            || matches!(
                (self, next),
                (OrderStatus::Pending, OrderStatus::Approved) | (OrderStatus::Pending, OrderStatus::Rejected)
            )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "approved" => Ok(OrderStatus::Approved),
            "rejected" => Ok(OrderStatus::Rejected),
            other => Err(format!("unknown order status: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: i64,
    pub customer_id: Option<i64>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

/// Order with its customer, its lines and the derived total
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    #[serde(flatten)]
    pub order: Order,
    pub customer: Option<CustomerView>,
    pub order_lines: Vec<OrderItemView>,
    pub total: i64,
}

impl OrderView {
    pub fn new(order: Order, customer: Option<CustomerView>, order_lines: Vec<OrderItemView>) -> Self {
        let total = order_lines.iter().map(OrderItemView::subtotal).sum();
        Self { order, customer, order_lines, total }
    }
}
