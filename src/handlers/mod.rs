//! HTTP request handlers, one module per resource.
//!
//! Each resource module exposes `routes()`, the router mounted under its
//! prefix by [`app::build_router`](crate::app::build_router). Route-specific
//! middlewares are attached there.

/// `/comments`
pub mod comments;
/// `/films`
pub mod films;
/// `/health`
pub mod health;
/// `/promo`
pub mod promo;
/// `/users`
pub mod users;
/// `/watchlist`
pub mod watchlist;
