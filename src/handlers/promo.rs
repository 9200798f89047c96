//! Promo film HTTP handlers.
//!
//! - GET /promo - The featured film
//! - POST /promo - Feature a film (private)

use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};

use crate::{
    app::AppState,
    error::AppError,
    handlers::films::populate,
    middleware::{private_route::CurrentUser, validate::ValidJson},
    models::{film::FilmResponse, watchlist::FilmReferenceRequest},
};

const ORIGIN: &str = "PromoFilmController";

pub fn routes() -> Router<AppState> {
    Router::new().route("/", get(get_promo).post(set_promo))
}

/// The featured film.
///
/// `GET /promo`: 200 with the film, 404 while no film is featured.
pub async fn get_promo(State(state): State<AppState>) -> Result<Json<FilmResponse>, AppError> {
    let film = state
        .promo
        .find()
        .await?
        .ok_or_else(|| AppError::not_found("No promo film is set.", ORIGIN))?;

    Ok(Json(populate(&state, film).await?))
}

/// Feature a film, replacing the current one.
///
/// # Endpoint
///
/// `POST /promo` with `{ "film_id": "..." }`
///
/// # Response
///
/// - **201 Created**: the featured film
/// - **401**: no valid token
/// - **404**: no such film
pub async fn set_promo(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidJson(request): ValidJson<FilmReferenceRequest>,
) -> Result<impl IntoResponse, AppError> {
    let film_id = request.film_id();
    let film = state.films.find_by_id(film_id).await?.ok_or_else(|| {
        AppError::not_found(format!("Film with id {} not found.", film_id), ORIGIN)
    })?;

    state.promo.set(film.id).await?;
    tracing::info!("{} promoted film {}", user.email, film.id);

    Ok((StatusCode::CREATED, Json(populate(&state, film).await?)))
}
