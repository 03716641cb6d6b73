use axum::extract::State;
use uuid::Uuid;

use crate::app::AppState;
use crate::database::models::ProductView;
use crate::filter::{Filter, ResourceKind};
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::schemas::product::{CreateProduct, ProductQuery, UpdateProduct};
use crate::schemas::UuidPath;
use crate::services::ProductService;
use crate::validation::{ValidBody, ValidPath, ValidQuery};

/// GET /api/v1/products - search products within a category
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(ProductQuery(query)): ValidQuery<ProductQuery>,
) -> ApiResult<Vec<ProductView>> {
    let filter = Filter::from_query(ResourceKind::Products, &query)?;
    Ok(ApiResponse::success(ProductService::new(&state).find(filter).await?))
}

/// GET /api/v1/products/:id
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<UuidPath>) -> ApiResult<ProductView> {
    Ok(ApiResponse::success(ProductService::new(&state).find_one(path.id).await?))
}

/// POST /api/v1/products
pub async fn create(State(state): State<AppState>, ValidBody(body): ValidBody<CreateProduct>) -> ApiResult<ProductView> {
    Ok(ApiResponse::created(ProductService::new(&state).create(body).await?))
}

/// PATCH /api/v1/products/:id
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<UuidPath>,
    ValidBody(body): ValidBody<UpdateProduct>,
) -> ApiResult<ProductView> {
    Ok(ApiResponse::success(ProductService::new(&state).update(path.id, body).await?))
}

/// DELETE /api/v1/products/:id
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<UuidPath>) -> ApiResult<Deleted<Uuid>> {
    Ok(ApiResponse::success(ProductService::new(&state).delete(path.id).await?))
}
