use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::{query_schema, sort_field, validated};
use crate::validation::{Field, Schema};

pub static CREATE_ORDER_LINE: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        Field::integer("orderId").required(),
        Field::uuid("productId").required(),
        Field::integer("quantity").min(1).required(),
    ])
});

pub static UPDATE_ORDER_LINE: Lazy<Schema> =
    Lazy::new(|| Schema::new(vec![Field::integer("quantity").min(1)]));

pub static ORDER_LINE_QUERY: Lazy<Schema> = Lazy::new(|| {
    query_schema(vec![
        Field::integer("order_id"),
        Field::uuid("product_id"),
        sort_field("order_by_order_id"),
        sort_field("order_by_product_id"),
    ])
});

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderLine {
    pub order_id: i64,
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrderLine {
    pub quantity: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct OrderLineQuery(pub Value);

validated!(
    CreateOrderLine => CREATE_ORDER_LINE,
    UpdateOrderLine => UPDATE_ORDER_LINE,
    OrderLineQuery => ORDER_LINE_QUERY,
);
