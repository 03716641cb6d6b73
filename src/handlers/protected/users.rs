use axum::extract::State;

use crate::app::AppState;
use crate::database::models::UserView;
use crate::filter::{Filter, ResourceKind};
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::schemas::user::{CreateUser, UpdateUser, UserQuery};
use crate::schemas::IdPath;
use crate::services::UserService;
use crate::validation::{ValidBody, ValidPath, ValidQuery};

/// GET /api/v1/users - list users matching the query filters
pub async fn list(State(state): State<AppState>, ValidQuery(UserQuery(query)): ValidQuery<UserQuery>) -> ApiResult<Vec<UserView>> {
    let filter = Filter::from_query(ResourceKind::Users, &query)?;
    Ok(ApiResponse::success(UserService::new(&state).find(filter).await?))
}

/// GET /api/v1/users/:id - show one user with its customer profile
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<UserView> {
    Ok(ApiResponse::success(UserService::new(&state).find_one(path.id).await?))
}

/// POST /api/v1/users - create a user with any role
pub async fn create(State(state): State<AppState>, ValidBody(body): ValidBody<CreateUser>) -> ApiResult<UserView> {
    Ok(ApiResponse::created(UserService::new(&state).create(body).await?))
}

/// PATCH /api/v1/users/:id - update email or role
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<IdPath>,
    ValidBody(body): ValidBody<UpdateUser>,
) -> ApiResult<UserView> {
    Ok(ApiResponse::success(UserService::new(&state).update(path.id, body).await?))
}

/// DELETE /api/v1/users/:id
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<Deleted<i64>> {
    Ok(ApiResponse::success(UserService::new(&state).delete(path.id).await?))
}
