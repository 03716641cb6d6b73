use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use super::engine::validate;
use super::schema::Schema;
use crate::error::ApiError;

/// A request DTO bound to the schema that guards it
pub trait Validated: DeserializeOwned {
    fn schema() -> &'static Schema;
}

fn into_typed<T: Validated>(raw: Value) -> Result<T, ApiError> {
    let normalised = validate(T::schema(), &raw)?;
    serde_json::from_value(normalised).map_err(|e| ApiError::bad_request(format!("Malformed payload: {}", e)))
}

fn string_map(params: HashMap<String, String>) -> Value {
    Value::Object(params.into_iter().map(|(k, v)| (k, Value::String(v))).collect::<Map<_, _>>())
}

/// JSON body checked against `T::schema()`
pub struct ValidBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ValidBody<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(raw) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        into_typed(raw).map(ValidBody)
    }
}

/// Query string checked against `T::schema()`; every value arrives as a string
pub struct ValidQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        into_typed(string_map(params)).map(ValidQuery)
    }
}

/// Path parameters checked against `T::schema()`
pub struct ValidPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: Validated,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::bad_request(rejection.body_text()))?;
        into_typed(string_map(params)).map(ValidPath)
    }
}
