//! Film HTTP handlers.
//!
//! - GET /films - List films (`?limit=&genre=`)
//! - POST /films - Create a film (private)
//! - GET /films/{film_id} - Film details
//! - PATCH /films/{film_id} - Update a film (owner only)
//! - DELETE /films/{film_id} - Delete a film with its comments (owner only)
//! - GET /films/{film_id}/comments - Latest comments of a film
//! - POST /films/{film_id}/poster - Upload poster image (owner only)
//! - POST /films/{film_id}/background - Upload background image (owner only)

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::AppError,
    middleware::{
        check_user::{CheckUser, check_user},
        private_route::CurrentUser,
        upload::{BackgroundField, PosterField, Upload, upload_body_limit},
        validate::{ValidJson, ValidPath, ValidQuery},
    },
    models::{
        comment::CommentResponse,
        film::{
            CreateFilmRequest, DEFAULT_FILM_COUNT, Film, FilmListItemResponse, FilmQuery,
            FilmResponse, UpdateFilmRequest,
        },
        user::UploadImageResponse,
    },
    services::film_service::FilmService,
};

const ORIGIN: &str = "FilmController";

pub fn routes(state: &AppState) -> Router<AppState> {
    let owner_only = || {
        from_fn_with_state(
            CheckUser::new(state.films.clone(), "Film", "film_id"),
            check_user::<FilmService>,
        )
    };

    Router::new()
        .route("/", get(list_films).post(create_film))
        .route(
            "/{film_id}",
            get(get_film).merge(
                patch(update_film)
                    .delete(delete_film)
                    .route_layer(owner_only()),
            ),
        )
        .route("/{film_id}/comments", get(list_comments))
        .route(
            "/{film_id}/poster",
            post(upload_poster)
                .route_layer(owner_only())
                .layer(upload_body_limit()),
        )
        .route(
            "/{film_id}/background",
            post(upload_background)
                .route_layer(owner_only())
                .layer(upload_body_limit()),
        )
}

fn film_not_found(film_id: Uuid) -> AppError {
    AppError::not_found(format!("Film with id {} not found.", film_id), ORIGIN)
}

/// Attach the owning users to a batch of films.
pub(crate) async fn populate_list(
    state: &AppState,
    films: Vec<Film>,
) -> Result<Vec<FilmListItemResponse>, AppError> {
    let user_ids: Vec<Uuid> = films.iter().map(|f| f.user_id).collect();
    let users = state.users.find_by_ids(&user_ids).await?;

    Ok(films
        .into_iter()
        .map(|film| {
            let user = users.get(&film.user_id).cloned();
            FilmListItemResponse::new(film, user)
        })
        .collect())
}

/// Attach the owning user to a single film.
pub(crate) async fn populate(state: &AppState, film: Film) -> Result<FilmResponse, AppError> {
    let user = state.users.find_response(film.user_id).await?;
    Ok(FilmResponse::new(film, user))
}

/// List films, newest first.
///
/// # Endpoint
///
/// `GET /films?limit=20&genre=drama`
///
/// # Query Parameters
///
/// - `limit` - number of films (default 60)
/// - `genre` - only films of this genre
///
/// # Response
///
/// - **200 OK**: list items with their owners populated
/// - **400**: the query string does not parse
pub async fn list_films(
    State(state): State<AppState>,
    ValidQuery(query): ValidQuery<FilmQuery>,
) -> Result<Json<Vec<FilmListItemResponse>>, AppError> {
    let limit = query.limit.unwrap_or(DEFAULT_FILM_COUNT).max(0);
    let films = state.films.find(limit, query.genre.as_deref()).await?;

    Ok(Json(populate_list(&state, films).await?))
}

/// Create a film owned by the caller.
///
/// # Endpoint
///
/// `POST /films`
///
/// Body: [`CreateFilmRequest`].
///
/// # Response
///
/// - **201 Created**: the film with its owner populated
/// - **400**: validation failed
/// - **401**: no valid token
pub async fn create_film(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(request): ValidJson<CreateFilmRequest>,
) -> Result<impl IntoResponse, AppError> {
    let film = state.films.create(request.into_new_film(user.id)).await?;

    Ok((StatusCode::CREATED, Json(populate(&state, film).await?)))
}

/// Film details.
///
/// # Endpoint
///
/// `GET /films/{film_id}`
///
/// # Response
///
/// - **200 OK**: the film with its owner populated
/// - **400**: `film_id` is not a UUID
/// - **404**: no such film
pub async fn get_film(
    State(state): State<AppState>,
    ValidPath(film_id): ValidPath<Uuid>,
) -> Result<Json<FilmResponse>, AppError> {
    let film = state
        .films
        .find_by_id(film_id)
        .await?
        .ok_or_else(|| film_not_found(film_id))?;

    Ok(Json(populate(&state, film).await?))
}

/// Partially update a film. Ownership is checked by the route layer.
///
/// # Endpoint
///
/// `PATCH /films/{film_id}`
///
/// # Response
///
/// - **200 OK**: the updated film
/// - **400**: validation failed
/// - **401**: no valid token
/// - **409**: the caller does not own the film, or it does not exist
pub async fn update_film(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    ValidPath(film_id): ValidPath<Uuid>,
    ValidJson(request): ValidJson<UpdateFilmRequest>,
) -> Result<Json<FilmResponse>, AppError> {
    let film = state
        .films
        .update(film_id, request)
        .await?
        .ok_or_else(|| film_not_found(film_id))?;

    Ok(Json(populate(&state, film).await?))
}

/// Delete a film together with everything referencing it.
///
/// # Endpoint
///
/// `DELETE /films/{film_id}` (owner only, 204 No Content)
///
/// # Process
///
/// 1. Drop the film from every watchlist
/// 2. Delete its comments
/// 3. Clear the promo slot if it points at the film
/// 4. Delete the film
pub async fn delete_film(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidPath(film_id): ValidPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.watchlist.delete(film_id).await?;
    let comments = state.comments.delete_by_film_id(film_id).await?;
    state.promo.delete_by_film_id(film_id).await?;

    if !state.films.delete(film_id).await? {
        return Err(film_not_found(film_id));
    }

    tracing::info!(
        "Film {} deleted by {} ({} comments removed)",
        film_id,
        user.email,
        comments
    );

    Ok(StatusCode::NO_CONTENT)
}

/// Latest comments of a film, newest first (at most 50).
///
/// # Endpoint
///
/// `GET /films/{film_id}/comments`
///
/// # Response
///
/// - **200 OK**: comments with their authors populated
/// - **404**: no such film
pub async fn list_comments(
    State(state): State<AppState>,
    ValidPath(film_id): ValidPath<Uuid>,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    if !state.films.exists(film_id).await? {
        return Err(film_not_found(film_id));
    }

    let comments = state.comments.find_by_film_id(film_id).await?;
    let user_ids: Vec<Uuid> = comments.iter().map(|c| c.user_id).collect();
    let users = state.users.find_by_ids(&user_ids).await?;

    Ok(Json(
        comments
            .into_iter()
            .map(|comment| {
                let user = users.get(&comment.user_id).cloned();
                CommentResponse::new(comment, user)
            })
            .collect(),
    ))
}

/// Upload the poster image of a film.
///
/// # Endpoint
///
/// `POST /films/{film_id}/poster` (multipart, file in field `poster`)
///
/// # Response
///
/// - **201 Created**: `{ "path": "/upload/<name>" }`
/// - **400**: no `poster` field
/// - **409**: the caller does not own the film
/// - **413**: body larger than the upload limit
pub async fn upload_poster(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    ValidPath(film_id): ValidPath<Uuid>,
    upload: Upload<PosterField>,
) -> Result<impl IntoResponse, AppError> {
    let path = upload.file.url_path();
    let updated = state
        .films
        .set_poster(film_id, &path)
        .await
        .and_then(|film| film.ok_or_else(|| film_not_found(film_id)));
    upload.file.discard_on_error(updated).await?;

    Ok((StatusCode::CREATED, Json(UploadImageResponse { path })))
}

/// Upload the background image of a film. Same contract as
/// [`upload_poster`], with the file in field `background`.
pub async fn upload_background(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    ValidPath(film_id): ValidPath<Uuid>,
    upload: Upload<BackgroundField>,
) -> Result<impl IntoResponse, AppError> {
    let path = upload.file.url_path();
    let updated = state
        .films
        .set_background(film_id, &path)
        .await
        .and_then(|film| film.ok_or_else(|| film_not_found(film_id)));
    upload.file.discard_on_error(updated).await?;

    Ok((StatusCode::CREATED, Json(UploadImageResponse { path })))
}
