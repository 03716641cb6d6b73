use axum::extract::State;

use crate::app::AppState;
use crate::database::models::CategoryView;
use crate::filter::{Filter, ResourceKind};
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::schemas::category::{CategoryQuery, CreateCategory, UpdateCategory};
use crate::schemas::IdPath;
use crate::services::CategoryService;
use crate::validation::{ValidBody, ValidPath, ValidQuery};

/// GET /api/v1/categories - list categories with their products
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(CategoryQuery(query)): ValidQuery<CategoryQuery>,
) -> ApiResult<Vec<CategoryView>> {
    let filter = Filter::from_query(ResourceKind::Categories, &query)?;
    Ok(ApiResponse::success(CategoryService::new(&state).find(filter).await?))
}

/// GET /api/v1/categories/:id
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<CategoryView> {
    Ok(ApiResponse::success(CategoryService::new(&state).find_one(path.id).await?))
}

/// POST /api/v1/categories
pub async fn create(State(state): State<AppState>, ValidBody(body): ValidBody<CreateCategory>) -> ApiResult<CategoryView> {
    Ok(ApiResponse::created(CategoryService::new(&state).create(body).await?))
}

/// PATCH /api/v1/categories/:id
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<IdPath>,
    ValidBody(body): ValidBody<UpdateCategory>,
) -> ApiResult<CategoryView> {
    Ok(ApiResponse::success(CategoryService::new(&state).update(path.id, body).await?))
}

/// DELETE /api/v1/categories/:id - 409 while products still reference it
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<Deleted<i64>> {
    Ok(ApiResponse::success(CategoryService::new(&state).delete(path.id).await?))
}
