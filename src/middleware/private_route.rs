//! Private-route gate.

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::{error::AppError, middleware::authenticate::AuthUser};

/// The authenticated caller.
///
/// Taking `CurrentUser` as a handler argument turns the route private: the
/// request fails with 401 Unauthorized unless the authentication middleware
/// attached a user. List it before body extractors so unauthenticated
/// requests are rejected before their payload is looked at.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthUser>()
            .cloned()
            .map(CurrentUser)
            .ok_or_else(|| AppError::unauthorized("Unauthorized", "private_route"))
    }
}
