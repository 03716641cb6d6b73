use once_cell::sync::Lazy;
use serde::Deserialize;

use super::validated;
use crate::validation::{Field, Schema};

pub static LOGIN: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![Field::email("email").required(), Field::string("password").required()])
});

pub static REGISTER: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        Field::email("email").required(),
        Field::string("password").min_len(8).required(),
    ])
});

pub static FORGOT_PASSWORD: Lazy<Schema> = Lazy::new(|| Schema::new(vec![Field::email("email").required()]));

pub static RESET_PASSWORD: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        Field::string("token").required(),
        Field::string("password").min_len(8).required(),
    ])
});

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResetPasswordRequest {
    pub token: String,
    pub password: String,
}

validated!(
    LoginRequest => LOGIN,
    RegisterRequest => REGISTER,
    ForgotPasswordRequest => FORGOT_PASSWORD,
    ResetPasswordRequest => RESET_PASSWORD,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn register_rejects_a_role_field() {
        let err = validate(
            &REGISTER,
            &json!({ "email": "ana@example.com", "password": "longenough", "role": "admin" }),
        )
        .unwrap_err();
        assert_eq!(err.violations[0].path, "role");
    }

    #[test]
    fn reset_needs_a_strong_password() {
        assert!(validate(&RESET_PASSWORD, &json!({ "token": "t", "password": "short" })).is_err());
    }
}
