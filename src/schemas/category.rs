use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;

use super::{query_schema, sort_field, validated};
use crate::validation::{Field, Schema};

pub static CREATE_CATEGORY: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        Field::string("name").min_len(3).max_len(15).required(),
        Field::uri("image").required(),
    ])
});

pub static UPDATE_CATEGORY: Lazy<Schema> = Lazy::new(|| CREATE_CATEGORY.as_patch());

pub static CATEGORY_QUERY: Lazy<Schema> =
    Lazy::new(|| query_schema(vec![Field::string("name"), sort_field("order_by_name")]));

#[derive(Debug, Clone, Deserialize)]
pub struct CreateCategory {
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateCategory {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct CategoryQuery(pub Value);

validated!(
    CreateCategory => CREATE_CATEGORY,
    UpdateCategory => UPDATE_CATEGORY,
    CategoryQuery => CATEGORY_QUERY,
);
