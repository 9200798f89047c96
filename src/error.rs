//! Error types and HTTP error response handling.
//!
//! Every failure in the service is an [`AppError`]. Handlers and middlewares
//! return `Result<_, AppError>` and the [`IntoResponse`] impl below acts as the
//! single exception filter: it logs the error together with the component
//! that raised it and renders the JSON error body.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;

/// Validation failures for a single request field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Name of the offending field
    pub property: String,

    /// Every constraint the value broke
    pub messages: Vec<String>,
}

/// Application-wide error type.
///
/// # Error Categories
///
/// - **Infrastructure**: database, file storage and token signing
///   failures. All map to 500 and hide their details from the client.
/// - **Http**: a status-tagged error raised deliberately by a handler or
///   middleware, carrying a client-facing message and the originating
///   component.
/// - **Validation**: a request body broke its declared constraints.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Database operation failed (e.g., connection error, query error).
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Reading or writing an uploaded file failed.
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Access token could not be signed.
    #[error("Token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("[{origin}] {message}")]
    Http {
        status: StatusCode,
        message: String,
        origin: &'static str,
    },

    /// Request body is well-formed but violates field constraints.
    ///
    /// Returns HTTP 400 Bad Request with one entry per field.
    #[error("Validation error")]
    Validation(Vec<FieldViolation>),
}

impl AppError {
    pub fn http(status: StatusCode, message: impl Into<String>, origin: &'static str) -> Self {
        AppError::Http {
            status,
            message: message.into(),
            origin,
        }
    }

    pub fn bad_request(message: impl Into<String>, origin: &'static str) -> Self {
        Self::http(StatusCode::BAD_REQUEST, message, origin)
    }

    pub fn unauthorized(message: impl Into<String>, origin: &'static str) -> Self {
        Self::http(StatusCode::UNAUTHORIZED, message, origin)
    }

    pub fn not_found(message: impl Into<String>, origin: &'static str) -> Self {
        Self::http(StatusCode::NOT_FOUND, message, origin)
    }

    pub fn conflict(message: impl Into<String>, origin: &'static str) -> Self {
        Self::http(StatusCode::CONFLICT, message, origin)
    }

    /// Report a unique-constraint violation as 409 Conflict with `message`.
    ///
    /// Any other error is returned unchanged. Covers the window between an
    /// existence check and the insert that follows it.
    pub fn or_conflict(self, message: impl Into<String>, origin: &'static str) -> Self {
        if let AppError::Database(sqlx::Error::Database(db_err)) = &self {
            if db_err.is_unique_violation() {
                return Self::conflict(message, origin);
            }
        }
        self
    }

    /// HTTP status this error is reported with.
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Http { status, .. } => *status,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Database(_) | AppError::Storage(_) | AppError::Token(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

/// Collect `validator` output into a stable, field-sorted list.
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut violations: Vec<FieldViolation> = errors
            .field_errors()
            .into_iter()
            .map(|(field, errors)| FieldViolation {
                property: field.to_string(),
                messages: errors
                    .iter()
                    .map(|error| {
                        error
                            .message
                            .as_ref()
                            .map(|m| m.to_string())
                            .unwrap_or_else(|| format!("{} is invalid", field))
                    })
                    .collect(),
            })
            .collect();

        violations.sort_by(|a, b| a.property.cmp(&b.property));

        AppError::Validation(violations)
    }
}

/// Convert AppError into an HTTP response.
///
/// # Response Format
///
/// ```json
/// {
///   "error": {
///     "code": "not_found",
///     "message": "Film with id 550e8400-... not found.",
///     "details": [{ "property": "title", "messages": ["..."] }]
///   }
/// }
/// ```
///
/// `details` is only present for validation errors.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let (code, message, details) = match self {
            AppError::Http {
                status,
                message,
                origin,
            } => {
                tracing::warn!(origin, status = status.as_u16(), "{}", message);
                (code_for(status), message, None)
            }
            AppError::Validation(violations) => {
                tracing::warn!(fields = violations.len(), "request validation failed");
                (
                    "validation_error",
                    "Request validation failed".to_string(),
                    Some(violations),
                )
            }
            internal => {
                tracing::error!("{}", internal);
                (
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = match details {
            Some(details) => json!({
                "error": { "code": code, "message": message, "details": details }
            }),
            None => json!({
                "error": { "code": code, "message": message }
            }),
        };

        (status, Json(body)).into_response()
    }
}

fn code_for(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "bad_request",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not_found",
        StatusCode::CONFLICT => "conflict",
        StatusCode::PAYLOAD_TOO_LARGE => "payload_too_large",
        _ => "error",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn http_error_keeps_status_and_message() {
        let response = AppError::conflict("Film with 1 not edit", "check_user").into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        let body = body_json(response).await;
        assert_eq!(body["error"]["code"], "conflict");
        assert_eq!(body["error"]["message"], "Film with 1 not edit");
        assert!(body["error"].get("details").is_none());
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let response = AppError::Database(sqlx::Error::RowNotFound).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["error"]["message"], "An internal error occurred");
    }

    #[test]
    fn or_conflict_leaves_other_errors_alone() {
        let missing = AppError::not_found("gone", "test").or_conflict("taken", "test");
        let internal = AppError::Database(sqlx::Error::RowNotFound).or_conflict("taken", "test");

        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
        assert_eq!(internal.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "name is too short"))]
        name: String,
        #[validate(range(min = 1, message = "count must be positive"))]
        count: i32,
    }

    #[tokio::test]
    async fn validation_errors_are_listed_per_field() {
        let errors = Sample {
            name: "x".into(),
            count: 0,
        }
        .validate()
        .unwrap_err();

        let error = AppError::from(errors);
        match &error {
            AppError::Validation(violations) => {
                assert_eq!(violations.len(), 2);
                assert_eq!(violations[0].property, "count");
                assert_eq!(violations[1].messages, vec!["name is too short"]);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let response = error.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"]["details"][0]["property"], "count");
    }
}
