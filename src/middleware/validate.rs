//! Request validation extractors.
//!
//! - [`ValidJson`] parses a JSON body and checks its declared constraints
//! - [`ValidPath`] parses path parameters (e.g. entity ids)
//! - [`ValidQuery`] parses the query string
//!
//! All of them report failures as 400 Bad Request through [`AppError`], so clients
//! get the same JSON error shape as for every other failure.

use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use validator::Validate;

use crate::error::AppError;

/// JSON body that passed `validator` checks.
///
/// Malformed JSON yields 400 with the parser's message; constraint violations
/// yield 400 with one entry per offending field.
#[derive(Debug, Clone)]
pub struct ValidJson<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
{
    type Rejection = AppError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(request, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text(), "validate_dto"))?;

        value.validate()?;

        Ok(ValidJson(value))
    }
}

/// Path parameters that parsed into `T`.
///
/// A malformed identifier such as `/films/42` becomes 400 Bad Request.
#[derive(Debug, Clone)]
pub struct ValidPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidPath<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text(), "validate_path"))?;

        Ok(ValidPath(value))
    }
}

/// Query string that parsed into `T`.
///
/// `/films?limit=abc` becomes 400 Bad Request with the parser's message.
#[derive(Debug, Clone)]
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text(), "validate_query"))?;

        Ok(ValidQuery(value))
    }
}
