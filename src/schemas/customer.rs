use once_cell::sync::Lazy;
use serde::Deserialize;
use serde_json::Value;

use super::auth::REGISTER;
use super::user::{CreateUser, UpdateUser, CREATE_USER, UPDATE_USER};
use super::{query_schema, sort_field, validated};
use crate::validation::{Field, Schema};

fn customer_schema(user: &Schema) -> Schema {
    Schema::new(vec![
        Field::string("name").min_len(3).max_len(30).required(),
        Field::string("lastName").required(),
        Field::string("phone").required(),
        Field::object("user", user).required(),
    ])
}

pub static CREATE_CUSTOMER: Lazy<Schema> = Lazy::new(|| customer_schema(&CREATE_USER));

/// Customer created alongside an order; the account never carries a caller-chosen role
pub static SIGNUP_CUSTOMER: Lazy<Schema> = Lazy::new(|| customer_schema(&REGISTER));

pub static UPDATE_CUSTOMER: Lazy<Schema> = Lazy::new(|| {
    Schema::new(vec![
        Field::string("name").min_len(3).max_len(30),
        Field::string("lastName"),
        Field::string("phone"),
        Field::object("user", &UPDATE_USER),
    ])
});

pub static CUSTOMER_QUERY: Lazy<Schema> = Lazy::new(|| {
    query_schema(vec![
        Field::string("name"),
        Field::string("lastName"),
        Field::string("phone"),
        sort_field("order_by_name"),
        sort_field("order_by_lastName"),
        sort_field("order_by_phone"),
    ])
});

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomer {
    pub name: String,
    pub last_name: String,
    pub phone: String,
    pub user: CreateUser,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomer {
    pub name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub user: Option<UpdateUser>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(transparent)]
pub struct CustomerQuery(pub Value);

validated!(
    CreateCustomer => CREATE_CUSTOMER,
    UpdateCustomer => UPDATE_CUSTOMER,
    CustomerQuery => CUSTOMER_QUERY,
);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::validate;
    use serde_json::json;

    #[test]
    fn nested_user_is_validated_with_the_customer() {
        let err = validate(
            &CREATE_CUSTOMER,
            &json!({ "name": "Al", "lastName": "Smith", "phone": "555", "user": { "email": "x" } }),
        )
        .unwrap_err();

        assert!(err.has_path("name"));
        assert!(err.has_path("user.email"));
        assert!(err.has_path("user.password"));
    }

    #[test]
    fn valid_payload_deserializes() {
        let value = validate(
            &CREATE_CUSTOMER,
            &json!({
                "name": "Ana",
                "lastName": "Lopez",
                "phone": "555-0101",
                "user": { "email": "ana@example.com", "password": "longenough" }
            }),
        )
        .unwrap();

        let customer: CreateCustomer = serde_json::from_value(value).unwrap();
        assert_eq!(customer.last_name, "Lopez");
        assert_eq!(customer.user.email, "ana@example.com");
    }

    #[test]
    fn signup_customer_cannot_pick_a_role() {
        let payload = json!({
            "name": "Ana",
            "lastName": "Lopez",
            "phone": "555-0101",
            "user": { "email": "ana@example.com", "password": "longenough", "role": "admin" }
        });
        assert!(validate(&CREATE_CUSTOMER, &payload).is_ok());

        let err = validate(&SIGNUP_CUSTOMER, &payload).unwrap_err();
        assert!(err.has_path("user.role"));

        let mut plain = payload.clone();
        plain["user"].as_object_mut().unwrap().remove("role");
        let customer: CreateCustomer = serde_json::from_value(validate(&SIGNUP_CUSTOMER, &plain).unwrap()).unwrap();
        assert_eq!(customer.user.role, crate::auth::Role::Customer);
    }
}
