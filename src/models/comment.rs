//! Comment data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::models::user::UserResponse;

/// Comments returned per film, newest first.
pub const DEFAULT_COMMENT_COUNT: i64 = 50;

/// Represents a comment record from the database.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub text: String,

    /// Score from 1 to 10 the author gave the film
    pub rating: i32,

    pub film_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Request body for `POST /comments`.
///
/// The author is always the authenticated user; any author id in the body is
/// ignored.
///
/// ```json
/// {
///   "text": "Beautifully shot, a little too long.",
///   "rating": 8,
///   "film_id": "550e8400-e29b-41d4-a716-446655440000"
/// }
/// ```
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateCommentRequest {
    #[validate(
        required(message = "text is required"),
        length(min = 5, max = 1024, message = "text must be 5 to 1024 characters")
    )]
    pub text: Option<String>,

    #[validate(
        required(message = "rating is required"),
        range(min = 1, max = 10, message = "rating must be between 1 and 10")
    )]
    pub rating: Option<i32>,

    #[validate(required(message = "film_id is required"))]
    pub film_id: Option<Uuid>,
}

/// Validated comment data ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewComment {
    pub text: String,
    pub rating: i32,
    pub film_id: Uuid,
    pub user_id: Uuid,
}

impl CreateCommentRequest {
    /// Attach the author. Only call on a request that passed validation.
    pub fn into_new_comment(self, user_id: Uuid) -> NewComment {
        NewComment {
            text: self.text.unwrap_or_default(),
            rating: self.rating.unwrap_or_default(),
            film_id: self.film_id.unwrap_or_default(),
            user_id,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CommentResponse {
    pub id: Uuid,
    pub text: String,
    pub rating: i32,
    pub film_id: Uuid,
    pub user: Option<UserResponse>,
    pub created_at: DateTime<Utc>,
}

impl CommentResponse {
    pub fn new(comment: Comment, user: Option<UserResponse>) -> Self {
        Self {
            id: comment.id,
            text: comment.text,
            rating: comment.rating,
            film_id: comment.film_id,
            user,
            created_at: comment.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rating_must_be_in_range() {
        let request = CreateCommentRequest {
            text: Some("Not my cup of tea.".into()),
            rating: Some(11),
            film_id: Some(Uuid::new_v4()),
        };

        let errors = request.validate().unwrap_err();
        assert_eq!(errors.field_errors().len(), 1);
        assert!(errors.field_errors().contains_key("rating"));
    }

    #[test]
    fn author_comes_from_caller() {
        let author = Uuid::new_v4();
        let film = Uuid::new_v4();
        let request = CreateCommentRequest {
            text: Some("Great soundtrack".into()),
            rating: Some(9),
            film_id: Some(film),
        };

        let comment = request.into_new_comment(author);

        assert_eq!(comment.user_id, author);
        assert_eq!(comment.film_id, film);
    }
}
