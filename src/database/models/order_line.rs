use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

use super::order::Order;
use super::product::ProductView;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    pub id: i64,
    pub order_id: Option<i64>,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

/// Line as shown inside its order
#[derive(Debug, Clone, Serialize)]
pub struct OrderItemView {
    #[serde(flatten)]
    pub line: OrderLine,
    pub product: Option<ProductView>,
}

impl OrderItemView {
    pub fn subtotal(&self) -> i64 {
        self.product
            .as_ref()
            .map(|p| i64::from(self.line.quantity) * i64::from(p.product.price))
            .unwrap_or(0)
    }
}

/// Line on its own, with the order it belongs to
#[derive(Debug, Clone, Serialize)]
pub struct OrderLineView {
    #[serde(flatten)]
    pub line: OrderLine,
    pub order: Option<Order>,
    pub product: Option<ProductView>,
}
