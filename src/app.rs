//! Application wiring.
//!
//! [`AppState`] is the dependency container: it is built once at startup from
//! the configuration and the connection pool, and every handler receives a
//! clone of it. [`build_router`] mounts the resource routers and the global
//! middleware stack.

use std::sync::Arc;

use axum::{Router, middleware::from_fn_with_state, routing::get};
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

use crate::{
    config::Config,
    db::DbPool,
    handlers,
    middleware::authenticate::authenticate,
    services::{
        comment_service::CommentService, film_service::FilmService,
        promo_service::PromoFilmService, token_service::JwtService, user_service::UserService,
        watchlist_service::WatchlistService,
    },
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub pool: DbPool,
    pub jwt: JwtService,
    pub users: UserService,
    pub films: FilmService,
    pub comments: CommentService,
    pub watchlist: WatchlistService,
    pub promo: PromoFilmService,
}

impl AppState {
    pub fn new(config: Config, pool: DbPool) -> Self {
        let jwt = JwtService::new(&config.jwt_secret, config.jwt_expiration_hours);

        Self {
            jwt,
            users: UserService::new(pool.clone()),
            films: FilmService::new(pool.clone()),
            comments: CommentService::new(pool.clone()),
            watchlist: WatchlistService::new(pool.clone()),
            promo: PromoFilmService::new(pool.clone()),
            config: Arc::new(config),
            pool,
        }
    }
}

/// Build the full HTTP router.
///
/// # Layers (outermost first)
///
/// 1. Request tracing
/// 2. CORS
/// 3. JWT authentication (attaches the caller, never rejects)
///
/// Static files are served from `/upload` (user uploads) and `/static`
/// (bundled assets such as the default avatar).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(|| async { "Film catalog API" }))
        .route("/health", get(handlers::health::health_check))
        .nest("/films", handlers::films::routes(&state))
        .nest("/users", handlers::users::routes(&state))
        .nest("/comments", handlers::comments::routes())
        .nest("/watchlist", handlers::watchlist::routes())
        .nest("/promo", handlers::promo::routes())
        .nest_service("/upload", ServeDir::new(&state.config.upload_directory))
        .nest_service("/static", ServeDir::new(&state.config.static_directory_path))
        .layer(from_fn_with_state(state.jwt.clone(), authenticate))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
