use axum::extract::State;

use crate::app::AppState;
use crate::database::models::CustomerView;
use crate::filter::{Filter, ResourceKind};
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::schemas::customer::{CreateCustomer, CustomerQuery, UpdateCustomer};
use crate::schemas::IdPath;
use crate::services::CustomerService;
use crate::validation::{ValidBody, ValidPath, ValidQuery};

/// GET /api/v1/customers - list customers with their user accounts
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(CustomerQuery(query)): ValidQuery<CustomerQuery>,
) -> ApiResult<Vec<CustomerView>> {
    let filter = Filter::from_query(ResourceKind::Customers, &query)?;
    Ok(ApiResponse::success(CustomerService::new(&state).find(filter).await?))
}

/// GET /api/v1/customers/:id
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<CustomerView> {
    Ok(ApiResponse::success(CustomerService::new(&state).find_one(path.id).await?))
}

/// POST /api/v1/customers - create a customer together with its user account
pub async fn create(State(state): State<AppState>, ValidBody(body): ValidBody<CreateCustomer>) -> ApiResult<CustomerView> {
    Ok(ApiResponse::created(CustomerService::new(&state).create(body).await?))
}

/// PATCH /api/v1/customers/:id
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<IdPath>,
    ValidBody(body): ValidBody<UpdateCustomer>,
) -> ApiResult<CustomerView> {
    Ok(ApiResponse::success(CustomerService::new(&state).update(path.id, body).await?))
}

/// DELETE /api/v1/customers/:id
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<Deleted<i64>> {
    Ok(ApiResponse::success(CustomerService::new(&state).delete(path.id).await?))
}
