use std::collections::HashMap;

use crate::app::AppState;
use crate::database::models::{Category, CategoryView, Product};
use crate::database::{Database, DatabaseError, Repository};
use crate::error::ApiError;
use crate::filter::Filter;
use crate::middleware::Deleted;
use crate::schemas::category::{CreateCategory, UpdateCategory};

use super::first_view;

pub struct CategoryService<'a> {
    state: &'a AppState,
    categories: Repository<Category>,
}

impl<'a> CategoryService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            categories: Repository::new("categories", &state.db),
        }
    }

    pub async fn create(&self, input: CreateCategory) -> Result<CategoryView, ApiError> {
        let category = sqlx::query_as::<_, Category>(
            "INSERT INTO categories (name, image_url) VALUES ($1, $2) RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.image)
        .fetch_one(self.state.db.pool())
        .await
        .map_err(DatabaseError::from)?;

        tracing::info!("Created category {} ({})", category.id, category.name);
        Ok(CategoryView { category, products: vec![] })
    }

    pub async fn find(&self, filter: Filter) -> Result<Vec<CategoryView>, ApiError> {
        let categories = self.categories.select_any(filter).await?;
        Ok(load_views(&self.state.db, categories).await?)
    }

    pub async fn find_one(&self, id: i64) -> Result<CategoryView, ApiError> {
        let category = self.categories.select_404(id).await?;
        first_view(load_views(&self.state.db, vec![category]).await?)
    }

    pub async fn update(&self, id: i64, changes: UpdateCategory) -> Result<CategoryView, ApiError> {
        self.categories.select_404(id).await?;
        sqlx::query("UPDATE categories SET name = COALESCE($2, name), image_url = COALESCE($3, image_url) WHERE id = $1")
            .bind(id)
            .bind(changes.name)
            .bind(changes.image)
            .execute(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        self.find_one(id).await
    }

    /// Refused with a conflict while products still reference the category
    pub async fn delete(&self, id: i64) -> Result<Deleted<i64>, ApiError> {
        self.categories.select_404(id).await?;
        sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(self.state.db.pool())
            .await
            .map_err(DatabaseError::from)?;
        Ok(Deleted { id })
    }
}

async fn load_views(db: &Database, categories: Vec<Category>) -> Result<Vec<CategoryView>, DatabaseError> {
    let ids: Vec<i64> = categories.iter().map(|c| c.id).collect();
    let mut products: HashMap<i64, Vec<Product>> = HashMap::new();
    for product in Repository::<Product>::new("products", db)
        .select_ids("category_id", &ids)
        .await?
    {
        products.entry(product.category_id).or_default().push(product);
    }

    Ok(categories
        .into_iter()
        .map(|category| {
            let products = products.remove(&category.id).unwrap_or_default();
            CategoryView { category, products }
        })
        .collect())
}
