use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct Banner {
    pub name: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET / - service banner
pub async fn index() -> ApiResponse<Banner> {
    ApiResponse::success(Banner {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health - 200 when the store answers, 503 otherwise
pub async fn health(State(state): State<AppState>) -> ApiResult<Health> {
    match state.db.health_check().await {
        Ok(()) => Ok(ApiResponse::success(Health { status: "ok", database: "up" })),
        Err(e) => {
            tracing::warn!("Health check failed: {}", e);
            Err(ApiError::service_unavailable("Database is unreachable"))
        }
    }
}
