//! User HTTP handlers.
//!
//! - POST /users/register - Create an account
//! - POST /users/login - Exchange credentials for an access token
//! - GET /users/login - Current user for a valid token
//! - POST /users/{user_id}/avatar - Upload avatar (own account only)

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    app::AppState,
    error::AppError,
    middleware::{
        check_user::{CheckUser, check_user},
        private_route::CurrentUser,
        upload::{AvatarField, Upload, upload_body_limit},
        validate::{ValidJson, ValidPath},
    },
    models::user::{
        CreateUserRequest, Credentials, LoggedUserResponse, LoginUserRequest, NewUser,
        UploadImageResponse, UserResponse,
    },
    services::user_service::UserService,
};

const ORIGIN: &str = "UserController";

pub fn routes(state: &AppState) -> Router<AppState> {
    let own_account = from_fn_with_state(
        CheckUser::new(state.users.clone(), "User", "user_id"),
        check_user::<UserService>,
    );

    Router::new()
        .route("/register", post(register))
        .route("/login", post(login).get(check_auth))
        .route(
            "/{user_id}/avatar",
            post(upload_avatar)
                .route_layer(own_account)
                .layer(upload_body_limit()),
        )
}

/// Register a new user.
///
/// # Endpoint
///
/// `POST /users/register`
///
/// # Request Body
///
/// ```json
/// { "username": "keks", "email": "keks@example.com", "password": "secret42" }
/// ```
///
/// # Response
///
/// - **201 Created**: the new user (without password)
/// - **400**: validation failed
/// - **409**: the email is already registered
pub async fn register(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<CreateUserRequest>,
) -> Result<impl IntoResponse, AppError> {
    let new_user = NewUser::from(request);

    let taken = format!("User with email {} exists.", new_user.email);

    if state.users.find_by_email(&new_user.email).await?.is_some() {
        return Err(AppError::conflict(taken, ORIGIN));
    }

    let user = state
        .users
        .create(new_user, &state.config.salt)
        .await
        .map_err(|e| e.or_conflict(taken, ORIGIN))?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(user))))
}

/// Log in with email and password.
///
/// # Endpoint
///
/// `POST /users/login`
///
/// # Response (200 OK)
///
/// ```json
/// {
///   "token": "eyJhbGciOiJIUzI1NiIs...",
///   "user": { "id": "...", "username": "keks", "email": "keks@example.com", "avatar_path": "..." }
/// }
/// ```
///
/// Unknown email and wrong password both yield 401.
pub async fn login(
    State(state): State<AppState>,
    ValidJson(request): ValidJson<LoginUserRequest>,
) -> Result<Json<LoggedUserResponse>, AppError> {
    let credentials = Credentials::from(request);

    let user = state
        .users
        .verify_user(&credentials, &state.config.salt)
        .await?
        .ok_or_else(|| AppError::unauthorized("Invalid email or password", ORIGIN))?;

    let token = state.jwt.issue(&user)?;

    Ok(Json(LoggedUserResponse {
        token,
        user: user.into(),
    }))
}

/// Return the user the presented token belongs to.
///
/// `GET /users/login`. 401 when the token is missing or its user was removed.
pub async fn check_auth(
    State(state): State<AppState>,
    CurrentUser(auth): CurrentUser,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .find_response(auth.id)
        .await?
        .ok_or_else(|| AppError::unauthorized("Unauthorized", ORIGIN))?;

    Ok(Json(user))
}

/// Replace the caller's avatar.
///
/// # Endpoint
///
/// `POST /users/{user_id}/avatar` (multipart, file in field `avatar`)
///
/// # Response
///
/// - **201 Created**: `{ "path": "/upload/<name>" }`
/// - **400**: no `avatar` field
/// - **409**: `user_id` is not the caller
pub async fn upload_avatar(
    State(state): State<AppState>,
    CurrentUser(_auth): CurrentUser,
    ValidPath(user_id): ValidPath<Uuid>,
    upload: Upload<AvatarField>,
) -> Result<impl IntoResponse, AppError> {
    let path = upload.file.url_path();
    let updated = state.users.update_avatar(user_id, &path).await;
    upload.file.discard_on_error(updated).await?;

    Ok((StatusCode::CREATED, Json(UploadImageResponse { path })))
}
