//! Comment HTTP handlers.
//!
//! - POST /comments - Comment on a film (private)
//!
//! Listing lives under `GET /films/{film_id}/comments`.

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::post,
};

use crate::{
    app::AppState,
    error::AppError,
    middleware::{private_route::CurrentUser, validate::ValidJson},
    models::comment::{CommentResponse, CreateCommentRequest},
};

const ORIGIN: &str = "CommentController";

pub fn routes() -> Router<AppState> {
    Router::new().route("/", post(create_comment))
}

/// Create a comment authored by the caller.
///
/// # Response
///
/// - **201 Created**: the comment with its author populated
/// - **400**: validation failed
/// - **401**: no valid token
/// - **404**: the film does not exist
pub async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(request): ValidJson<CreateCommentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let comment = request.into_new_comment(user.id);

    if !state.films.exists(comment.film_id).await? {
        return Err(AppError::not_found(
            format!("Film with id {} not found.", comment.film_id),
            ORIGIN,
        ));
    }

    let comment = state.comments.create(comment).await?;
    let author = state.users.find_response(comment.user_id).await?;

    Ok((StatusCode::CREATED, Json(CommentResponse::new(comment, author))))
}
