use axum::extract::State;

use crate::app::AppState;
use crate::database::models::OrderLineView;
use crate::filter::{Filter, ResourceKind};
use crate::middleware::{ApiResponse, ApiResult, Deleted};
use crate::schemas::order_line::{CreateOrderLine, OrderLineQuery, UpdateOrderLine};
use crate::schemas::IdPath;
use crate::services::OrderLineService;
use crate::validation::{ValidBody, ValidPath, ValidQuery};

/// GET /api/v1/orderlines
pub async fn list(
    State(state): State<AppState>,
    ValidQuery(OrderLineQuery(query)): ValidQuery<OrderLineQuery>,
) -> ApiResult<Vec<OrderLineView>> {
    let filter = Filter::from_query(ResourceKind::OrderLines, &query)?;
    Ok(ApiResponse::success(OrderLineService::new(&state).find(filter).await?))
}

/// GET /api/v1/orderlines/:id
pub async fn get(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<OrderLineView> {
    Ok(ApiResponse::success(OrderLineService::new(&state).find_one(path.id).await?))
}

/// POST /api/v1/orderlines
pub async fn create(State(state): State<AppState>, ValidBody(body): ValidBody<CreateOrderLine>) -> ApiResult<OrderLineView> {
    Ok(ApiResponse::created(OrderLineService::new(&state).create(body).await?))
}

/// PATCH /api/v1/orderlines/:id - change the quantity
pub async fn update(
    State(state): State<AppState>,
    ValidPath(path): ValidPath<IdPath>,
    ValidBody(body): ValidBody<UpdateOrderLine>,
) -> ApiResult<OrderLineView> {
    Ok(ApiResponse::success(OrderLineService::new(&state).update(path.id, body).await?))
}

/// DELETE /api/v1/orderlines/:id
pub async fn delete(State(state): State<AppState>, ValidPath(path): ValidPath<IdPath>) -> ApiResult<Deleted<i64>> {
    Ok(ApiResponse::success(OrderLineService::new(&state).delete(path.id).await?))
}
