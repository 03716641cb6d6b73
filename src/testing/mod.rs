use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;

use crate::app::{app, AppState};
use crate::auth::Role;
use crate::config::AppConfig;
use crate::database::Database;
use crate::services::LogMailer;

/// Development config with a lazy pool; nothing connects until a query runs
pub fn test_state() -> AppState {
    let mut config = AppConfig::development();
    config.security.bcrypt_cost = 4;
    let db = Database::connect_lazy(&config.database, false).expect("development database url parses");
    AppState::new(Arc::new(config), db, Arc::new(LogMailer))
}

pub fn token_for(state: &AppState, role: Role) -> String {
    state.tokens.sign(1, role).expect("sign test token")
}

pub async fn send(router: Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn banner_is_public() {
        let (status, body) = send(app(test_state()), Method::GET, "/", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "storefront-api");
    }

    #[tokio::test]
    async fn missing_token_is_rejected_before_anything_else() {
        let (status, body) = send(app(test_state()), Method::POST, "/api/v1/users", None, Some(json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let (status, _) = send(app(test_state()), Method::GET, "/api/v1/orders", Some("not.a.token"), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn reset_token_is_not_an_access_token() {
        let state = test_state();
        let reset = state.tokens.sign_reset(1, "$2b$04$hash").unwrap();
        let (status, _) = send(app(state), Method::GET, "/api/v1/profile/my-orders", Some(&reset), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn role_check_runs_before_validation() {
        let state = test_state();
        let token = token_for(&state, Role::Customer);
        let (status, body) = send(app(state), Method::POST, "/api/v1/users", Some(&token), Some(json!({}))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["code"], "FORBIDDEN");
    }

    #[tokio::test]
    async fn invalid_body_is_rejected_for_permitted_roles() {
        let state = test_state();
        let token = token_for(&state, Role::Seller);
        let (status, body) = send(
            app(state),
            Method::POST,
            "/api/v1/products",
            Some(&token),
            Some(json!({ "name": "Pencil", "price": 5 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert!(body["details"].as_array().unwrap().len() >= 2);
    }

    #[tokio::test]
    async fn product_search_needs_a_category() {
        let state = test_state();
        let token = token_for(&state, Role::Customer);
        let (status, _) = send(app(state), Method::GET, "/api/v1/products?name=pen", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn path_ids_are_validated() {
        let state = test_state();
        let token = token_for(&state, Role::Admin);
        let (status, body) = send(app(state), Method::GET, "/api/v1/products/12", Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["path"], "id");
    }

    #[tokio::test]
    async fn sellers_cannot_manage_customers() {
        let state = test_state();
        let token = token_for(&state, Role::Seller);
        let (status, _) = send(app(state), Method::DELETE, "/api/v1/customers/1", Some(&token), None).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn token_refresh_and_logout_are_not_implemented() {
        let (status, _) = send(app(test_state()), Method::POST, "/auth/refresh-token", None, None).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
        let (status, _) = send(app(test_state()), Method::POST, "/auth/logout", None, None).await;
        assert_eq!(status, StatusCode::NOT_IMPLEMENTED);
    }

    #[tokio::test]
    async fn register_rejects_a_role_field() {
        let (status, body) = send(
            app(test_state()),
            Method::POST,
            "/auth/register",
            None,
            Some(json!({ "email": "ana@example.com", "password": "longenough", "role": "admin" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["path"], "role");
    }

    #[tokio::test]
    async fn customers_cannot_sign_up_an_admin_through_an_order() {
        let state = test_state();
        let token = token_for(&state, Role::Customer);
        let order = json!({
            "customer": {
                "name": "Mallory",
                "lastName": "Jones",
                "phone": "555",
                "user": { "email": "mallory@example.com", "password": "longenough", "role": "admin" }
            }
        });
        let (status, body) = send(app(state), Method::POST, "/api/v1/orders", Some(&token), Some(order)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "VALIDATION_ERROR");
        assert_eq!(body["details"][0]["path"], "customer.user.role");
    }

    #[tokio::test]
    async fn new_orders_cannot_choose_their_status() {
        let state = test_state();
        let token = token_for(&state, Role::Customer);
        let order = json!({ "customerId": 1, "status": "approved" });
        let (status, body) = send(app(state), Method::POST, "/api/v1/orders", Some(&token), Some(order)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["details"][0]["path"], "status");
    }

    #[tokio::test]
    async fn unknown_routes_are_json_404s() {
        let (status, body) = send(app(test_state()), Method::GET, "/nope", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "NOT_FOUND");
    }
}
