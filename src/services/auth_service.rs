use serde::Serialize;

use crate::app::AppState;
use crate::auth::{verify_password, AuthError, AuthStrategy, Principal, Role};
use crate::database::models::UserView;
use crate::error::ApiError;
use crate::schemas::auth::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest};
use crate::schemas::user::CreateUser;

use super::mailer::Mail;
use super::user_service::UserService;

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserView,
    pub token: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

pub struct AuthService<'a> {
    state: &'a AppState,
}

impl<'a> AuthService<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Resolve the request's identity using the given strategy
    pub async fn authenticate(&self, strategy: AuthStrategy) -> Result<Principal, ApiError> {
        match strategy {
            AuthStrategy::Jwt { token } => {
                let claims = self.state.tokens.verify(&token)?;
                Ok(Principal::from(claims))
            }
            AuthStrategy::Local { email, password } => {
                let user = UserService::new(self.state)
                    .find_by_email(&email)
                    .await?
                    .ok_or(AuthError::InvalidCredentials)?;

                if !verify_password(password, user.password_hash.clone()).await? {
                    tracing::warn!("Failed login for user {}", user.id);
                    return Err(AuthError::InvalidCredentials.into());
                }
                Ok(Principal { id: user.id, role: user.role()? })
            }
        }
    }

    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, ApiError> {
        let principal = self
            .authenticate(AuthStrategy::Local { email: request.email, password: request.password })
            .await?;
        let token = self.state.tokens.sign(principal.id, principal.role)?;
        let user = UserService::new(self.state).find_one(principal.id).await?;

        tracing::info!("User {} logged in as {}", principal.id, principal.role);
        Ok(LoginResponse { user, token })
    }

    /// Self-service sign-up always yields a customer account
    pub async fn register(&self, request: RegisterRequest) -> Result<UserView, ApiError> {
        UserService::new(self.state)
            .create(CreateUser {
                email: request.email,
                password: request.password,
                role: Role::Customer,
            })
            .await
    }

    /// Mails a reset link; the token itself is never part of the response
    pub async fn forgot_password(&self, request: ForgotPasswordRequest) -> Result<MessageResponse, ApiError> {
        let user = UserService::new(self.state)
            .find_by_email(&request.email)
            .await?
            .ok_or_else(|| ApiError::not_found(format!("No user with email {}", request.email)))?;

        let token = self.state.tokens.sign_reset(user.id, &user.password_hash)?;
        let mail = &self.state.config.mail;
        self.state
            .mailer
            .send(Mail {
                from: mail.sender.clone(),
                to: user.email.clone(),
                subject: "Reset your password".to_string(),
                body: reset_link(&mail.auth_base_url, &token),
            })
            .await?;

        tracing::info!("Password reset issued for user {}", user.id);
        Ok(MessageResponse { message: "Password reset email sent".to_string() })
    }

    /// A reset token works once: it stops matching as soon as the password changes
    pub async fn reset_password(&self, request: ResetPasswordRequest) -> Result<MessageResponse, ApiError> {
        let claims = self.state.tokens.verify_reset(&request.token)?;
        let users = UserService::new(self.state);
        let user = users.find_record(claims.sub).await?;

        let used = || AuthError::InvalidToken("reset token has already been used".to_string());
        if !claims.issued_for(&user.password_hash) {
            return Err(used().into());
        }
        if !users.replace_password(user.id, &user.password_hash, request.password).await? {
            return Err(used().into());
        }

        tracing::info!("Password reset completed for user {}", user.id);
        Ok(MessageResponse { message: "Password updated".to_string() })
    }
}

fn reset_link(base_url: &str, token: &str) -> String {
    format!("{}/reset-password?token={}", base_url.trim_end_matches('/'), token)
}
