//! User data models and API request/response types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Avatar assigned to every new user until they upload their own.
pub const DEFAULT_AVATAR_PATH: &str = "/static/default-avatar.jpg";

/// Represents a user record from the database.
///
/// The password is never stored; only its salted HMAC-SHA256 digest is.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub avatar_path: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for `POST /users/register`.
///
/// # JSON Example
///
/// ```json
/// {
///   "username": "keks",
///   "email": "keks@example.com",
///   "password": "secret42"
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUserRequest {
    #[validate(
        required(message = "username is required"),
        length(min = 1, max = 15, message = "username must be 1 to 15 characters")
    )]
    pub username: Option<String>,

    #[validate(
        required(message = "email is required"),
        email(message = "email must be a valid address")
    )]
    pub email: Option<String>,

    #[validate(
        required(message = "password is required"),
        length(min = 6, max = 12, message = "password must be 6 to 12 characters")
    )]
    pub password: Option<String>,
}

/// Validated registration data.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl From<CreateUserRequest> for NewUser {
    fn from(request: CreateUserRequest) -> Self {
        Self {
            username: request.username.unwrap_or_default(),
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
        }
    }
}

/// Request body for `POST /users/login`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginUserRequest {
    #[validate(
        required(message = "email is required"),
        email(message = "email must be a valid address")
    )]
    pub email: Option<String>,

    #[validate(required(message = "password is required"))]
    pub password: Option<String>,
}

/// Validated login credentials.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl From<LoginUserRequest> for Credentials {
    fn from(request: LoginUserRequest) -> Self {
        Self {
            email: request.email.unwrap_or_default(),
            password: request.password.unwrap_or_default(),
        }
    }
}

/// Public view of a user, embedded wherever a user is referenced.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UserResponse {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub avatar_path: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            avatar_path: user.avatar_path,
        }
    }
}

/// Response body for a successful login.
#[derive(Debug, Serialize)]
pub struct LoggedUserResponse {
    pub token: String,
    pub user: UserResponse,
}

/// Response body for avatar and image uploads.
#[derive(Debug, Serialize)]
pub struct UploadImageResponse {
    pub path: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registration_reports_every_missing_field() {
        let request = CreateUserRequest {
            username: None,
            email: None,
            password: None,
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn registration_rejects_short_password_and_bad_email() {
        let request = CreateUserRequest {
            username: Some("keks".into()),
            email: Some("not-an-email".into()),
            password: Some("123".into()),
        };

        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(!fields.contains_key("username"));
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("password"));
    }

    #[test]
    fn response_omits_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            username: "keks".into(),
            email: "keks@example.com".into(),
            password_hash: "deadbeef".into(),
            avatar_path: DEFAULT_AVATAR_PATH.into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(UserResponse::from(user)).unwrap();
        assert!(json.get("password_hash").is_none());
        assert_eq!(json["avatar_path"], DEFAULT_AVATAR_PATH);
    }
}
