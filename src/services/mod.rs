//! Business logic services.
//!
//! Each service owns a handle to the shared connection pool and wraps the
//! queries for one resource. Handlers never touch SQL directly.

pub mod comment_service;
pub mod film_service;
pub mod promo_service;
pub mod token_service;
pub mod user_service;
pub mod watchlist_service;
