use axum::extract::State;

use crate::app::AppState;
use crate::database::models::UserView;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};
use crate::schemas::auth::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::services::auth_service::{LoginResponse, MessageResponse};
use crate::services::AuthService;
use crate::validation::ValidBody;

/// POST /auth/login - exchange email and password for an access token
pub async fn login(State(state): State<AppState>, ValidBody(body): ValidBody<LoginRequest>) -> ApiResult<LoginResponse> {
    Ok(ApiResponse::success(AuthService::new(&state).login(body).await?))
}

/// POST /auth/register - create a customer account
pub async fn register(State(state): State<AppState>, ValidBody(body): ValidBody<RegisterRequest>) -> ApiResult<UserView> {
    Ok(ApiResponse::created(AuthService::new(&state).register(body).await?))
}

/// POST /auth/forgot-password - mail a password reset link
pub async fn forgot_password(
    State(state): State<AppState>,
    ValidBody(body): ValidBody<ForgotPasswordRequest>,
) -> ApiResult<MessageResponse> {
    Ok(ApiResponse::success(AuthService::new(&state).forgot_password(body).await?))
}

/// POST /auth/reset-password - set a new password with a reset token
pub async fn reset_password(
    State(state): State<AppState>,
    ValidBody(body): ValidBody<ResetPasswordRequest>,
) -> ApiResult<MessageResponse> {
    Ok(ApiResponse::success(AuthService::new(&state).reset_password(body).await?))
}

/// POST /auth/refresh-token
pub async fn refresh_token() -> ApiError {
    ApiError::not_implemented("Token refresh is not available")
}

/// POST /auth/logout
pub async fn logout() -> ApiError {
    ApiError::not_implemented("Logout is not available")
}
