//! HTTP middleware components.
//!
//! Some run as layers (authentication, ownership checks), others as
//! extractors that run in handler-argument order (private-route gate,
//! validation, uploads).

/// JWT decoding for every request
pub mod authenticate;
/// Ownership check for modifying routes
pub mod check_user;
/// Private-route gate
pub mod private_route;
/// Multipart file uploads
pub mod upload;
/// Body and path validation
pub mod validate;
