//! Watchlist HTTP handlers. Every route is private and acts on the caller's
//! own watchlist.
//!
//! - GET /watchlist - Films on the watchlist
//! - POST /watchlist - Add a film
//! - DELETE /watchlist/{film_id} - Remove a film

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::AppError,
    handlers::films::populate_list,
    middleware::{
        private_route::CurrentUser,
        validate::{ValidJson, ValidPath},
    },
    models::{film::FilmListItemResponse, watchlist::FilmReferenceRequest},
};

const ORIGIN: &str = "WatchlistController";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_watchlist).post(add_to_watchlist))
        .route("/{film_id}", delete(remove_from_watchlist))
}

/// Films on the caller's watchlist.
///
/// # Endpoint
///
/// `GET /watchlist`
pub async fn list_watchlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<Vec<FilmListItemResponse>>, AppError> {
    let films = state.watchlist.find_by_user_id(user.id).await?;

    Ok(Json(populate_list(&state, films).await?))
}

/// Add a film to the caller's watchlist.
///
/// # Endpoint
///
/// `POST /watchlist` with `{ "film_id": "..." }`
///
/// # Response
///
/// - **201 Created**: the watchlist entry
/// - **404**: the film does not exist
/// - **409**: the film is already on the watchlist
pub async fn add_to_watchlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(request): ValidJson<FilmReferenceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let film_id = request.film_id();

    if !state.films.exists(film_id).await? {
        return Err(AppError::not_found(
            format!("Film with id {} not found.", film_id),
            ORIGIN,
        ));
    }

    let duplicate = format!("Film with id {} is already in the watchlist.", film_id);

    if state
        .watchlist
        .find_by_user_id_and_film_id(user.id, film_id)
        .await?
        .is_some()
    {
        return Err(AppError::conflict(duplicate, ORIGIN));
    }

    let entry = state
        .watchlist
        .create(user.id, film_id)
        .await
        .map_err(|e| e.or_conflict(duplicate, ORIGIN))?;

    Ok((StatusCode::CREATED, Json(entry)))
}

/// Remove a film from the caller's watchlist.
///
/// `DELETE /watchlist/{film_id}`: 204, or 404 if it was not listed.
pub async fn remove_from_watchlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(film_id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    if !state.watchlist.delete_for_user(user.id, film_id).await? {
        return Err(AppError::not_found(
            format!("Film with id {} is not in the watchlist.", film_id),
            ORIGIN,
        ));
    }

    Ok(StatusCode::NO_CONTENT)
}
