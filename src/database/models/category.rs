use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

use super::product::Product;

#[derive(Debug, Clone, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: i64,
    pub name: String,
    #[sqlx(rename = "image_url")]
    pub image: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    #[serde(flatten)]
    pub category: Category,
    pub products: Vec<Product>,
}
