use axum::extract::State;

use crate::app::AppState;
use crate::database::models::{OrderLineView, OrderView};
use crate::filter::{Filter, ResourceKind};
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::schemas::order::{CreateOrder, OrderItemInput, OrderQuery, UpdateOrder};
use crate::schemas::IdPath;
use crate::services::OrderService;
use crate::validation::{ValidBody, ValidPath, ValidQuery};

/// GET /api/v1/orders - list orders with customer, lines and total
pub async fn list(State(state): State<AppState>, ValidQuery(OrderQuery(query)): ValidQuery<OrderQuery>) -> ApiResult<Vec<OrderView>> {
    let filter = Filter::from_query(ResourceKind::Orders, &query)?;
    Ok(ApiResponse::success(OrderService::new(&state).find(filter).await?))
}

/// GET /api/v1/orders/:id
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<OrderView> {
    Ok(ApiResponse::success(OrderService::new(&state).find_one(path.id).await?))
}

/// POST /api/v1/orders - place an order for an existing or a new customer
pub async fn create(State(state): State<AppState>, ValidBody(body): ValidBody<CreateOrder>) -> ApiResult<OrderView> {
    Ok(ApiResponse::created(OrderService::new(&state).create(body).await?))
}

/// PATCH /api/v1/orders/:id - approve or reject a pending order
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<IdPath>,
    ValidBody(body): ValidBody<UpdateOrder>,
) -> ApiResult<OrderView> {
    Ok(ApiResponse::success(OrderService::new(&state).update(path.id, body).await?))
}

/// DELETE /api/v1/orders/:id
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<Deleted<i64>> {
    Ok(ApiResponse::success(OrderService::new(&state).delete(path.id).await?))
}

/// POST /api/v1/orders/:id/orderlines - add a product line to an order
pub async fn add_line(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<IdPath>,
    ValidBody(body): ValidBody<OrderItemInput>,
) -> ApiResult<OrderLineView> {
    Ok(ApiResponse::created(OrderService::new(&state).add_line(path.id, body).await?))
}
