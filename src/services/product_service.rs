use std::collections::HashMap;

use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::{Category, Product, ProductView};
use crate::database::{Database, DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::Deleted;
use crate::schemas::product::{CreateProduct, UpdateProduct};

use super::first_view;

pub struct ProductService<'a> {
    state: &'a AppState,
    products: Repository<Product>,
}

impl<'a> ProductService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            products: Repository::new("products", &state.db),
        }
    }

    pub async fn create(&self, input: CreateProduct) -> Result<ProductView, ApiError> {
        let product = sqlx::query_as::<_, Product>(
            "INSERT INTO products (id, name, price, description, image_url, category_id) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING *",
        )
        .bind(Uuid::new_v4())
        .bind(&input.name)
        .bind(input.price)
        .bind(&input.description)
        .bind(&input.image)
        .bind(input.category_id)
        .fetch_one(self.state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

        tracing::info!("Created product {} in category {}", product.id, product.category_id);
        first_view(load_views(&self.state.db, vec![product]).await?)
    }

    pub async fn find(&self, filter: Filter) -> Result<Vec<ProductView>, ApiError> {
        let products = self.products.select_any(filter).await?;
        Ok(load_views(&self.state.db, products).await?)
    }

    pub async fn find_one(&self, id: Uuid) -> Result<ProductView, ApiError> {
        let product = self.products.select_404(id).await?;
        first_view(load_views(&self.state.db, vec![product]).await?)
    }

    pub async fn update(&self, id: Uuid, changes: UpdateProduct) -> Result<ProductView, ApiError> {
        self.products.select_404(id).await?;
        sqlx::query(
            "UPDATE products SET name = COALESCE($2, name), price = COALESCE($3, price), \
             description = COALESCE($4, description), image_url = COALESCE($5, image_url), \
             category_id = COALESCE($6, category_id) WHERE id = $1",
        )
        .bind(id)
        .bind(changes.name)
        .bind(changes.price)
        .bind(changes.description)
        .bind(changes.image)
        .bind(changes.category_id)
        .execute(self.state.db.pool())
        .await
        .map_err(DatabaseError::from)?;
        self.find_one(id).await
    }

    /// Order lines for the product go with it
    pub async fn delete(&self, id: Uuid) -> Result<Deleted<Uuid>, ApiError> {
        self.products.select_404(id).await?;
        sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        Ok(Deleted { id })
    }
}

/// Attach each product's category in one batched query
pub(crate) async fn load_views(db: &Database, products: Vec<Product>) -> Result<Vec<ProductView>, DatabaseError> {
    let mut ids: Vec<i64> = products.iter().map(|p| p.category_id).collect();
    ids.sort_unstable();
    ids.dedup();
    let categories: HashMap<i64, Category> = Repository::<Category>::new("categories", db)
        .select_ids("id", &ids)
        .await?
        .into_iter()
        .map(|c| (c.id, c))
        .collect();

    Ok(products
        .into_iter()
        .map(|product| {
            let category = categories.get(&product.category_id).cloned();
            ProductView { product, category }
        })
        .collect())
}
