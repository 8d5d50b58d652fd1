//! Shared harness for HTTP-level integration tests.
//!
//! Builds the real router (same middleware stack as `main.rs`) over the
//! per-test database, with the clock pinned to [`test_now`].

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use sqlx::PgPool;
use tower::ServiceExt;

use stringdesk_api::auth::jwt::{generate_access_token, JwtConfig};
use stringdesk_api::auth::password::hash_password;
use stringdesk_api::config::ServerConfig;
use stringdesk_api::router::build_app_router;
use stringdesk_api::state::AppState;
use stringdesk_core::clock::{Clock, FixedClock};
use stringdesk_core::roles::{ROLE_ADMIN, ROLE_STRINGER, ROLE_USER};
use stringdesk_db::models::user::{CreateUser, User};
use stringdesk_db::repositories::UserRepo;

/// The instant every test app considers "now": 2024-06-10 12:00 UTC.
pub fn test_now() -> DateTime<Utc> {
    "2024-06-10T12:00:00Z".parse().unwrap()
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        jwt: JwtConfig {
            secret: "integration-test-secret-long-enough-for-hmac".to_string(),
            access_token_expiry_mins: 60,
        },
    }
}

/// Build the full application router using the given pool and the fixed test clock.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_clock(pool, Arc::new(FixedClock::new(test_now())))
}

pub fn build_test_app_with_clock(pool: PgPool, clock: Arc<dyn Clock>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        clock,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Tokens
// ---------------------------------------------------------------------------

/// Mint a token for an arbitrary user id and role. The user need not exist.
pub fn token_for(user_id: i64, role: &str) -> String {
    generate_access_token(user_id, role, &test_config().jwt)
        .expect("token generation should succeed")
        .token
}

pub fn admin_token() -> String {
    token_for(1, ROLE_ADMIN)
}

pub fn stringer_token() -> String {
    token_for(2, ROLE_STRINGER)
}

pub fn user_token() -> String {
    token_for(3, ROLE_USER)
}

/// Insert a user directly and return it with the plaintext password.
pub async fn create_user(pool: &PgPool, username: &str, role: &str) -> (User, String) {
    let password = "test_password_123!";
    let user = UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            email: format!("{username}@test.com"),
            password_hash: hash_password(password).expect("hashing should succeed"),
            role: role.to_string(),
            created_at: test_now(),
        },
    )
    .await
    .expect("user creation should succeed");
    (user, password.to_string())
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

/// PATCH with no body, for the start and paid transitions.
pub async fn patch_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::PATCH, uri, Some(token), None).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Read and parse the response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures (created through the API with an admin token)
// ---------------------------------------------------------------------------

async fn create_id(app: &Router, uri: &str, body: Value) -> i64 {
    let response = post_json_auth(app.clone(), uri, body, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::CREATED, "fixture POST {uri}");
    body_json(response).await["id"].as_i64().unwrap()
}

pub async fn create_player(app: &Router, name: &str, last_name: &str) -> i64 {
    create_id(
        app,
        "/api/players",
        json!({ "name": name, "lastName": last_name, "countryCode": "ESP" }),
    )
    .await
}

pub async fn create_racquet(app: &Router, player_id: i64) -> i64 {
    create_id(
        app,
        "/api/racquets",
        json!({ "playerId": player_id, "brand": "Babolat", "model": "Pure Aero" }),
    )
    .await
}

pub async fn create_string_type(app: &Router, brand: &str, model: &str) -> i64 {
    create_id(
        app,
        "/api/string-types",
        json!({ "brand": brand, "model": model, "gauge": "1.30" }),
    )
    .await
}

pub async fn create_stringer(app: &Router, name: &str) -> i64 {
    create_id(
        app,
        "/api/stringers",
        json!({ "name": name, "lastName": "Smith" }),
    )
    .await
}

pub async fn create_tournament(app: &Router, name: &str, start: &str, end: &str) -> i64 {
    create_id(
        app,
        "/api/tournaments",
        json!({ "name": name, "startDate": start, "endDate": end }),
    )
    .await
}

/// Create a job from a raw body and return the created JSON.
pub async fn create_job(app: &Router, body: Value) -> Value {
    let response = post_json_auth(app.clone(), "/api/string-jobs", body, &admin_token()).await;
    assert_eq!(response.status(), StatusCode::CREATED, "fixture job");
    body_json(response).await
}

/// A player with one racquet and a pending 24 kg job. Returns `(player, racquet, job)` ids.
pub async fn seed_pending_job(app: &Router) -> (i64, i64, i64) {
    let player_id = create_player(app, "Rafael", "Nadal").await;
    let racquet_id = create_racquet(app, player_id).await;
    let job = create_job(
        app,
        json!({
            "playerId": player_id,
            "racquetId": racquet_id,
            "mainTension": 24.0,
            "isTensionInKg": true
        }),
    )
    .await;
    (player_id, racquet_id, job["id"].as_i64().unwrap())
}
