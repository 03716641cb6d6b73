use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;

use super::{query_schema, sort_field, validated};
use crate::validation::{Field, Rule, Schema};

pub static CREATE_PRODUCT: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        Field::string("name").min_len(3).max_len(15).required(),
        Field::integer("price").min(10).required(),
        Field::string("description").min_len(10).required(),
        Field::uri("image").required(),
        Field::integer("categoryId").required(),
    ])
});

pub static UPDATE_PRODUCT: Lazy<Schema> = Lazy::new(|| CREATE_PRODUCT.as_patch());

// Searches are always scoped to a category, by id or by name
pub static PRODUCT_QUERY: Lazy<Schema> = Lazy::new(|| {
    query_schema(vec![
        Field::string("name"),
        Field::string("description"),
        Field::integer("price").min(10),
        Field::integer("price_min").min(10).when_present("price_max", Rule::new().max_ref("price_max")),
        Field::integer("price_max").min(10).when_present("price_min", Rule::new().min_ref("price_min")),
        Field::integer("category_id").when_absent("category_name", Rule::new().required()),
        Field::string("category_name").when_absent("category_id", Rule::new().required()),
        sort_field("order_by_category"),
        sort_field("order_by_name"),
        sort_field("order_by_price"),
    ])
});

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub name: String,
    pub price: i32,
    pub description: String,
    pub image: String,
    pub category_id: i64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    pub name: Option<String>,
    pub price: Option<i32>,
    pub description: Option<String>,
    pub image: Option<String>,
    pub category_id: Option<i64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct ProductQuery(pub Value);

validated!(
    CreateProduct => CREATE_PRODUCT,
    UpdateProduct => UPDATE_PRODUCT,
    ProductQuery => PRODUCT_QUERY,
);
