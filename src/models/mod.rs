//! Data models representing database entities and their request/response
//! shapes.

/// Comments on films
pub mod comment;
/// Film catalogue entries
pub mod film;
/// Registered users
pub mod user;
/// Watchlist entries and the promoted film
pub mod watchlist;
