use axum::extract::State;

use crate::app::AppState;
use crate::auth::Principal;
use crate::database::models::OrderView;
use crate::middleware::{ApiResponse, ApiResult};
use crate::services::OrderService;

/// GET /api/v1/profile/my-orders - orders placed through the caller's customer profile
pub async fn my_orders(State(state): State<AppState>, principal: Principal) -> ApiResult<Vec<OrderView>> {
    Ok(ApiResponse::success(OrderService::new(&state).find_by_user(principal.id).await?))
}
