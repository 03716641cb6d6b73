use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;

use super::{query_schema, sort_field, validated};
use crate::auth::Role;
use crate::validation::{Field, Schema};

pub static CREATE_USER: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        Field::email("email").required(),
        Field::string("password").min_len(8).required(),
        Field::one_of("role", Role::NAMES).default_value("customer"),
    ])
});

pub static UPDATE_USER: Lazy<Schema> =
    Lazy::new(|| Schema::new(vec![Field::email("email"), Field::one_of("role", Role::NAMES)]));

pub static USER_QUERY: Lazy<Schema> = Lazy::new(|| {
    query_schema(vec![
        Field::string("email"),
        Field::one_of("role", Role::NAMES),
        sort_field("order_by_email"),
        sort_field("order_by_role"),
    ])
});

#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct UserQuery(pub Value);

validated!(CreateUser => CREATE_USER, UpdateUser => UPDATE_USER, UserQuery => USER_QUERY);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn role_defaults_to_customer() {
        let value = validate(&CREATE_USER, &json!({ "email": "ana@example.com", "password": "longenough" })).unwrap();
        let user: CreateUser = serde_json::from_value(value).unwrap();
        assert_eq!(user.role, Role::Customer);
    }

    #[test]
    fn unknown_roles_are_rejected_at_validation() {
        let err = validate(
            &CREATE_USER,
            &json!({ "email": "ana@example.com", "password": "longenough", "role": "root" }),
        )
        .unwrap_err();
        assert_eq!(err.violations[0].message, "\"role\" must be one of [admin, seller, customer]");
    }

    #[test]
    fn short_password_and_bad_email_are_both_reported() {
        let err = validate(&CREATE_USER, &json!({ "email": "ana", "password": "short" })).unwrap_err();
        assert!(err.has_path("email"));
        assert!(err.has_path("password"));
    }
}
