//! Router-level tests for authentication, private routes and validation.
//!
//! The pool connects lazily and none of these requests reach a handler body,
//! so no database is needed.

use std::time::Duration;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use chrono::Utc;
use film_catalog_server::{
    app::{AppState, build_router},
    config::Config,
    models::user::{DEFAULT_AVATAR_PATH, User},
    services::token_service::JwtService,
};
use serde_json::{Value, json};
use tower::ServiceExt;
use uuid::Uuid;

fn test_config() -> Config {
    Config {
        port: 4000,
        host: "localhost".into(),
        db_user: "test".into(),
        db_password: "test".into(),
        db_host: "127.0.0.1".into(),
        db_port: 1,
        db_name: "unused".into(),
        jwt_secret: "test-secret".into(),
        jwt_expiration_hours: 1,
        salt: "test-salt".into(),
        upload_directory: std::env::temp_dir()
            .join("film-catalog-routes")
            .display()
            .to_string(),
        static_directory_path: "static".into(),
    }
}

fn test_state() -> AppState {
    let config = test_config();
    let pool = sqlx::postgres::PgPoolOptions::new()
        .acquire_timeout(Duration::from_millis(200))
        .connect_lazy(&config.database_url().unwrap())
        .unwrap();

    AppState::new(config, pool)
}

fn app() -> (Router, AppState) {
    let state = test_state();
    (build_router(state.clone()), state)
}

fn token_for(state: &AppState) -> String {
    let user = User {
        id: Uuid::new_v4(),
        username: "keks".into(),
        email: "keks@example.com".into(),
        password_hash: String::new(),
        avatar_path: DEFAULT_AVATAR_PATH.into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    state.jwt.issue(&user).unwrap()
}

fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn detail_fields(body: &Value) -> Vec<String> {
    body["error"]["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["property"].as_str().unwrap().to_string())
        .collect()
}

fn valid_comment() -> Value {
    json!({
        "text": "Worth watching twice.",
        "rating": 9,
        "film_id": Uuid::new_v4(),
    })
}

#[tokio::test]
async fn root_answers_without_database() {
    let (app, _) = app();

    let response = app
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn private_route_without_token_is_unauthorized() {
    let (app, _) = app();

    let (status, body) = send(
        app,
        json_request(Method::POST, "/comments", None, valid_comment()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn invalid_token_is_treated_as_anonymous() {
    let (app, _) = app();

    let (status, _) = send(
        app,
        json_request(Method::POST, "/comments", Some("not.a.token"), valid_comment()),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn token_signed_with_other_secret_is_rejected() {
    let (app, _) = app();
    let other = JwtService::new("someone-else", 1);
    let user = User {
        id: Uuid::new_v4(),
        username: "mallory".into(),
        email: "mallory@example.com".into(),
        password_hash: String::new(),
        avatar_path: DEFAULT_AVATAR_PATH.into(),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    };
    let token = other.issue(&user).unwrap();

    let (status, _) = send(
        app,
        json_request(Method::GET, "/watchlist", Some(&token), Value::Null),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn every_private_route_requires_a_token() {
    let film = Uuid::new_v4();
    let user = Uuid::new_v4();
    let routes = [
        (Method::POST, "/films".to_string()),
        (Method::PATCH, format!("/films/{film}")),
        (Method::DELETE, format!("/films/{film}")),
        (Method::POST, format!("/films/{film}/poster")),
        (Method::POST, format!("/films/{film}/background")),
        (Method::GET, "/users/login".to_string()),
        (Method::POST, format!("/users/{user}/avatar")),
        (Method::POST, "/comments".to_string()),
        (Method::GET, "/watchlist".to_string()),
        (Method::POST, "/watchlist".to_string()),
        (Method::DELETE, format!("/watchlist/{film}")),
        (Method::POST, "/promo".to_string()),
    ];

    for (method, uri) in routes {
        let (app, _) = app();
        let (status, _) = send(app, json_request(method.clone(), &uri, None, json!({}))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{method} {uri}");
    }
}

#[tokio::test]
async fn missing_fields_are_listed_individually() {
    let (app, state) = app();
    let token = token_for(&state);

    let (status, body) = send(
        app,
        json_request(Method::POST, "/comments", Some(&token), json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "validation_error");
    assert_eq!(detail_fields(&body), vec!["film_id", "rating", "text"]);
}

#[tokio::test]
async fn film_constraints_are_checked_before_the_handler() {
    let (app, state) = app();
    let token = token_for(&state);

    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/films",
            Some(&token),
            json!({ "title": "X", "genre": "western", "run_time": 0 }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let fields = detail_fields(&body);
    for field in ["title", "genre", "run_time", "description", "director"] {
        assert!(fields.contains(&field.to_string()), "missing {field}");
    }
}

#[tokio::test]
async fn registration_is_validated() {
    let (app, _) = app();

    let (status, body) = send(
        app,
        json_request(
            Method::POST,
            "/users/register",
            None,
            json!({ "email": "nope", "password": "1" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(detail_fields(&body), vec!["email", "password", "username"]);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let (app, state) = app();
    let token = token_for(&state);
    let request = Request::builder()
        .method(Method::POST)
        .uri("/watchlist")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .body(Body::from("{ not json"))
        .unwrap();

    let (status, body) = send(app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "bad_request");
}

#[tokio::test]
async fn malformed_film_id_is_bad_request() {
    let (app, state) = app();
    let token = token_for(&state);

    let (status, _) = send(
        app.clone(),
        Request::get("/films/42").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app,
        json_request(Method::PATCH, "/films/42", Some(&token), json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn malformed_query_string_uses_the_error_body() {
    let (app, _) = app();

    let response = app
        .oneshot(Request::get("/films?limit=abc").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/json"
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["error"]["code"], "bad_request");
}
