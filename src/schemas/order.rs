use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;
use uuid::Uuid;

use super::customer::{CreateCustomer, SIGNUP_CUSTOMER};
use super::{query_schema, sort_field, validated};
use crate::database::models::OrderStatus;
use crate::validation::{Field, FieldKind, Rule, Schema};

/// One `{productId, quantity}` entry, used inline in orders and for `/orders/:id/orderlines`
pub static ORDER_ITEM: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        Field::uuid("productId").required(),
        Field::integer("quantity").min(1).required(),
    ])
});

pub static CREATE_ORDER: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        // Orders are decided through updates only
        Field::one_of("status", &["pending"]).default_value("pending"),
        Field::integer("customerId"),
        Field::object("customer", &SIGNUP_CUSTOMER),
        Field::array("items", FieldKind::Object(Box::new((*ORDER_ITEM).clone()))),
    ])
    .xor(&["customerId", "customer"])
});

pub static UPDATE_ORDER: Lazy<Schema> =
    Lazy::new(|| Schema::new(vec![Field::one_of("status", OrderStatus::NAMES)]));

pub static ORDER_QUERY: Lazy<Schema> = Lazy::new(|| {
    query_schema(vec![
        Field::one_of("status", OrderStatus::NAMES),
        Field::integer("customer_id").when_present("customer_name", Rule::new().required()),
        Field::string("customer_name").when_present("customer_id", Rule::new().required()),
        sort_field("order_by_status"),
        sort_field("order_by_customer_id"),
    ])
});

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub product_id: Uuid,
    pub quantity: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    pub customer_id: Option<i64>,
    pub customer: Option<CreateCustomer>,
    #[serde(default)]
    pub items: Vec<OrderItemInput>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateOrder {
    pub status: Option<OrderStatus>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct OrderQuery(pub Value);

validated!(
    OrderItemInput => ORDER_ITEM,
    CreateOrder => CREATE_ORDER,
    UpdateOrder => UPDATE_ORDER,
    OrderQuery => ORDER_QUERY,
);
