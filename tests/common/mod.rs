#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode},
};
use chirpy::{ServerConfig, cli::Platform, create_app, db::Database, metrics::HitCounter};
use std::path::PathBuf;
use tower::ServiceExt;

pub const JWT_SECRET: &[u8] = b"test-jwt-secret-that-is-long-enough";
pub const POLKA_KEY: &str = "f271c81ff7084ee5b99a5091b42d486e";

pub struct TestApp {
    pub app: Router,
    pub db: Database,
    pub hits: HitCounter,
}

pub async fn create_test_app() -> TestApp {
    create_test_app_on(Platform::Dev, std::env::temp_dir()).await
}

pub async fn create_test_app_on(platform: Platform, assets_dir: PathBuf) -> TestApp {
    let db = Database::open(":memory:")
        .await
        .expect("Failed to open test database");
    let hits = HitCounter::new();
    let config = ServerConfig {
        db: db.clone(),
        jwt_secret: JWT_SECRET.to_vec(),
        polka_key: POLKA_KEY.to_string(),
        platform,
        assets_dir,
        hits: hits.clone(),
    };
    TestApp {
        app: create_app(&config),
        db,
        hits,
    }
}

/// Send a request with an optional `Authorization` header and JSON body.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    authorization: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(value) = authorization {
        builder = builder.header("authorization", value);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub fn bearer(token: &str) -> String {
    format!("Bearer {}", token)
}

/// Register an account and return its JSON representation.
pub async fn create_user(app: &Router, email: &str, password: &str) -> serde_json::Value {
    let response = send(
        app,
        "POST",
        "/api/users",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await
}

/// Log in and return the full login response body.
pub async fn login(app: &Router, email: &str, password: &str) -> serde_json::Value {
    let response = send(
        app,
        "POST",
        "/api/login",
        None,
        Some(serde_json::json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

/// Register and log in. Returns `(access_token, refresh_token, user_id)`.
pub async fn create_user_and_login(
    app: &Router,
    email: &str,
    password: &str,
) -> (String, String, String) {
    create_user(app, email, password).await;
    let json = login(app, email, password).await;
    (
        json["token"].as_str().unwrap().to_string(),
        json["refresh_token"].as_str().unwrap().to_string(),
        json["id"].as_str().unwrap().to_string(),
    )
}

/// Post a chirp and return its ID.
pub async fn create_chirp(app: &Router, access_token: &str, body: &str) -> String {
    let response = send(
        app,
        "POST",
        "/api/chirps",
        Some(&bearer(access_token)),
        Some(serde_json::json!({ "body": body })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    body_json(response).await["id"]
        .as_str()
        .unwrap()
        .to_string()
}
