//! API integration tests.
//!
//! These tests drive the router end to end against a mock database.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
    middleware::from_fn_with_state,
    response::Response,
};
use chrono::Utc;
use circles_api::{AppState, auth_middleware, router as api_router};
use circles_common::config::{AuthConfig, Config, DatabaseConfig, ServerConfig};
use circles_common::{NoOpStorage, StorageConfig};
use circles_db::entities::circle_member::{self, CircleRole};
use circles_db::entities::file::{self, FileType};
use circles_db::entities::{circle, user};
use sea_orm::{DatabaseBackend, MockDatabase, Value};
use serde_json::Value as Json;
use tower::ServiceExt;

const TOKEN: &str = "test-token";

/// Create a test configuration.
fn create_test_config() -> Config {
    Config {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 3000,
            url: "http://localhost:3000".to_string(),
            body_limit_bytes: 1024 * 1024,
            request_timeout_secs: 10,
        },
        database: DatabaseConfig {
            url: "postgres://localhost/test".to_string(),
            max_connections: 10,
            min_connections: 1,
        },
        storage: StorageConfig::default(),
        auth: AuthConfig::default(),
    }
}

/// Create the test router over a prepared mock database.
fn create_test_router(db: MockDatabase) -> Router {
    let state = AppState::new(
        Arc::new(db.into_connection()),
        Arc::new(NoOpStorage::new("/files".to_string())),
        &create_test_config(),
    );

    api_router()
        .layer(from_fn_with_state(state.clone(), auth_middleware))
        .with_state(state)
}

fn mock_db() -> MockDatabase {
    MockDatabase::new(DatabaseBackend::Postgres)
}

fn create_test_user(is_disabled: bool) -> user::Model {
    user::Model {
        id: "alice".to_string(),
        open_id: "oid-alice".to_string(),
        name: Some("Alice".to_string()),
        email: None,
        login_method: Some("github".to_string()),
        role: user::UserRole::User,
        token: Some(TOKEN.to_string()),
        is_disabled,
        created_at: Utc::now().into(),
        updated_at: None,
        last_signed_in_at: None,
    }
}

fn create_test_circle() -> circle::Model {
    circle::Model {
        id: "c1".to_string(),
        name: "Test Circle".to_string(),
        description: None,
        creator_id: "alice".to_string(),
        is_public: true,
        invitation_code: None,
        created_at: Utc::now().into(),
        updated_at: None,
    }
}

fn create_test_file() -> file::Model {
    file::Model {
        id: "f1".to_string(),
        circle_id: "c1".to_string(),
        folder_id: None,
        uploader_id: "alice".to_string(),
        filename: "test image.png".to_string(),
        file_key: "circles/c1/alice-abc.png".to_string(),
        file_url: "/files/circles/c1/alice-abc.png".to_string(),
        mime_type: "image/png".to_string(),
        file_size: 4,
        file_type: FileType::Image,
        is_paid: false,
        price: None,
        uploaded_at: Utc::now().into(),
    }
}

fn post(uri: &str, body: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

async fn json_body(response: Response) -> Json {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_me_without_token_returns_null() {
    let app = create_test_router(mock_db());

    let response = app.oneshot(post("/auth/me", "{}", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, serde_json::json!({ "data": null }));
}

#[tokio::test]
async fn test_me_with_token_returns_user() {
    let app = create_test_router(mock_db().append_query_results([[create_test_user(false)]]));

    let response = app
        .oneshot(post("/auth/me", "{}", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"]["id"], "alice");
    assert!(body["data"].get("token").is_none());
}

#[tokio::test]
async fn test_protected_procedure_requires_token() {
    let app = create_test_router(mock_db());

    let response = app.oneshot(post("/circles/list", "{}", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(json_body(response).await["error"]["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_disabled_user_is_unauthenticated() {
    let app = create_test_router(mock_db().append_query_results([[create_test_user(true)]]));

    let response = app
        .oneshot(post("/circles/list", "{}", Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_public_circles() {
    let app = create_test_router(
        mock_db()
            .append_query_results([[create_test_circle()]])
            .append_query_results([[BTreeMap::from([
                ("circle_id", Value::from("c1")),
                ("member_count", Value::BigInt(Some(2))),
            ])]]),
    );

    let response = app
        .oneshot(post("/circles/listPublic", "{}", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["data"][0]["id"], "c1");
    assert_eq!(body["data"][0]["memberCount"], 2);
    assert_eq!(body["data"][0]["isPublic"], true);
}

#[tokio::test]
async fn test_join_missing_circle_returns_not_found() {
    let app = create_test_router(
        mock_db()
            .append_query_results([[create_test_user(false)]])
            .append_query_results([Vec::<circle::Model>::new()]),
    );

    let response = app
        .oneshot(post("/circles/join", r#"{"circleId":"nope"}"#, Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = json_body(response).await;
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert_eq!(body["error"]["message"], "Circle not found");
}

#[tokio::test]
async fn test_upload_unsupported_type_rejected() {
    let member = circle_member::Model {
        id: "m1".to_string(),
        circle_id: "c1".to_string(),
        user_id: "alice".to_string(),
        role: CircleRole::Owner,
        joined_at: Utc::now().into(),
    };
    let app = create_test_router(
        mock_db()
            .append_query_results([[create_test_user(false)]])
            .append_query_results([[member]]),
    );

    let body = r#"{"circleId":"c1","filename":"notes.pdf","fileData":"AAAA","mimeType":"application/pdf","fileSize":3}"#;
    let response = app
        .oneshot(post("/files/upload", body, Some(TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["error"]["message"],
        "Unsupported file type"
    );
}

#[tokio::test]
async fn test_blank_search_is_rejected() {
    let app = create_test_router(mock_db());

    let response = app
        .oneshot(post("/search/circles", r#"{"query":""}"#, None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_download_redirects_with_attachment_header() {
    let app = create_test_router(mock_db().append_query_results([[create_test_file()]]));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/download/f1")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FOUND);
    let headers = response.headers();
    assert_eq!(headers[header::LOCATION], "/files/circles/c1/alice-abc.png");
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"test%20image.png\"; filename*=UTF-8''test%20image.png"
    );
}

#[tokio::test]
async fn test_download_missing_file() {
    let app = create_test_router(mock_db().append_query_results([Vec::<file::Model>::new()]));

    let response = app
        .oneshot(
            Request::builder()
                .uri("/download/missing")
                .method("GET")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_unknown_endpoint_returns_404() {
    let app = create_test_router(mock_db());

    let response = app
        .oneshot(post("/nonexistent/endpoint", "{}", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
