//! JWT authentication middleware.
//!
//! Runs on every request:
//! 1. Extract the token from the `Authorization: Bearer <token>` header
//! 2. Verify signature and expiry against the shared secret
//! 3. Attach an [`AuthUser`] to the request extensions
//!
//! Requests without a usable token pass through untouched. Rejecting them is
//! the job of the private-route gate ([`CurrentUser`](super::private_route::CurrentUser)).

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::services::token_service::JwtService;

/// Identity of the caller, decoded from a valid access token.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: Uuid,
    pub email: String,
}

/// Global middleware attaching [`AuthUser`] for a valid Bearer token.
///
/// Never rejects. An invalid or expired token is logged at debug level and
/// the request continues anonymously.
pub async fn authenticate(
    State(jwt): State<JwtService>,
    mut request: Request,
    next: Next,
) -> Response {
    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);

    if let Some(token) = token {
        match jwt.verify(token) {
            Ok(claims) => {
                request.extensions_mut().insert(AuthUser {
                    id: claims.id,
                    email: claims.email,
                });
            }
            Err(e) => tracing::debug!("Ignoring invalid access token: {}", e),
        }
    }

    next.run(request).await
}
