//! Film catalogue and watchlist REST API.
//!
//! Users register and log in with JWTs, publish films, comment on them, keep
//! a personal watchlist and pick a promoted film. Uploaded images are stored
//! on local disk and served statically.
//!
//! # Architecture
//!
//! - **Web Framework**: Axum (async HTTP server)
//! - **Database**: PostgreSQL with sqlx, one table per entity
//! - **Authentication**: HS256 JWT bearer tokens
//! - **Validation**: `validator` derive on request bodies
//! - **Format**: JSON requests/responses, multipart for uploads

pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
