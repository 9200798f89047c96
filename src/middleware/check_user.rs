//! Ownership check middleware.
//!
//! Attached with `route_layer` to routes that modify a resource. It loads the
//! target entity by the id found in a named path parameter and lets the
//! request through only if the authenticated user owns it.
//!
//! # Outcomes
//!
//! - No authenticated user: 401 Unauthorized
//! - Malformed id: 400 Bad Request
//! - Entity missing or owned by someone else: 409 Conflict

use std::{collections::HashMap, future::Future};

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use crate::{
    error::AppError,
    middleware::{private_route::CurrentUser, validate::ValidPath},
};

/// Services whose entities belong to a user.
pub trait OwnerLookup: Clone + Send + Sync + 'static {
    /// Id of the user owning entity `id`, or `None` if it does not exist.
    fn find_owner(&self, id: Uuid) -> impl Future<Output = Result<Option<Uuid>, AppError>> + Send;
}

/// Configuration of one ownership check.
#[derive(Debug, Clone)]
pub struct CheckUser<S> {
    service: S,
    entity_name: &'static str,
    param_name: &'static str,
}

impl<S: OwnerLookup> CheckUser<S> {
    pub fn new(service: S, entity_name: &'static str, param_name: &'static str) -> Self {
        Self {
            service,
            entity_name,
            param_name,
        }
    }

    /// Decide whether `user_id` may modify the entity with id `raw_id`.
    ///
    /// An entity that does not exist has no owner, so it is refused the same
    /// way as one owned by another user.
    pub async fn ensure_owner(&self, raw_id: &str, user_id: Uuid) -> Result<(), AppError> {
        let id = Uuid::parse_str(raw_id).map_err(|_| {
            AppError::bad_request(
                format!("{} is not a valid {} id", raw_id, self.param_name),
                "check_user",
            )
        })?;

        match self.service.find_owner(id).await? {
            Some(owner) if owner == user_id => Ok(()),
            _ => Err(AppError::conflict(
                format!("{} with {} not edit", self.entity_name, id),
                "check_user",
            )),
        }
    }
}

/// Route layer running [`CheckUser::ensure_owner`] for the id in
/// `check.param_name`.
///
/// # Usage
///
/// ```ignore
/// post(upload_avatar).route_layer(from_fn_with_state(
///     CheckUser::new(state.users.clone(), "User", "user_id"),
///     check_user::<UserService>,
/// ))
/// ```
pub async fn check_user<S: OwnerLookup>(
    State(check): State<CheckUser<S>>,
    CurrentUser(user): CurrentUser,
    ValidPath(params): ValidPath<HashMap<String, String>>,
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let raw_id = params.get(check.param_name).ok_or_else(|| {
        AppError::bad_request(format!("Missing path parameter {}", check.param_name), "check_user")
    })?;

    check.ensure_owner(raw_id, user.id).await?;

    Ok(next.run(request).await)
}
