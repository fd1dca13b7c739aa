//! End-to-end flow through the assembled router: register, login, verify,
//! and the gate in front of admin and upload routes.

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use folio_backend::{
    auth::{Identity, JwtHandler},
    build_router,
    config::{default_protected_prefixes, AppConfig, DEFAULT_MAX_UPLOAD_BYTES},
    db::Database,
};
use serde_json::{json, Value};
use tower::ServiceExt;

const SECRET: &str = "integration-test-secret";

fn app(upload_dir: &std::path::Path) -> Router {
    app_with_prefixes(upload_dir, default_protected_prefixes())
}

fn app_with_prefixes(upload_dir: &std::path::Path, protected_prefixes: Vec<String>) -> Router {
    let config = AppConfig {
        bind_addr: "127.0.0.1:0".to_string(),
        database_path: ":memory:".to_string(),
        upload_dir: upload_dir.to_path_buf(),
        jwt_secret: SECRET.to_string(),
        bcrypt_cost: 4,
        max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
        protected_prefixes,
    };
    build_router(Database::in_memory().unwrap(), &config).unwrap()
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register_ana(app: &Router) -> (String, String) {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Ana", "email": "ana@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["email"], "ana@x.com");
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());
    (
        body["user"]["id"].as_str().unwrap().to_string(),
        body["token"].as_str().unwrap().to_string(),
    )
}

#[tokio::test]
async fn test_register_login_verify() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let (user_id, _) = register_ana(&app).await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@x.com", "password": "secret1" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().unwrap().to_string();
    assert_eq!(body["user"]["id"], user_id);

    let (status, body) = send(&app, "GET", "/api/auth/verify", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "Ana");
    assert!(body["user"]["createdAt"].is_string());
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    register_ana(&app).await;

    let wrong_password = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "ana@x.com", "password": "wrong-one" })),
    )
    .await;
    let unknown_email = send(
        &app,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({ "email": "bob@x.com", "password": "secret1" })),
    )
    .await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
}

#[tokio::test]
async fn test_register_rejections() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    register_ana(&app).await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Ana Again", "email": "ana@x.com", "password": "secret2" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = send(
        &app,
        "POST",
        "/api/auth/register",
        None,
        Some(json!({ "name": "Bob", "email": "bob@x.com", "password": "123" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "password");
}

#[tokio::test]
async fn test_missing_and_expired_tokens_are_indistinguishable() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let (user_id, _) = register_ana(&app).await;

    let expired = JwtHandler::new(SECRET)
        .unwrap()
        .issue_at(
            &Identity {
                user_id,
                email: "ana@x.com".to_string(),
            },
            Utc::now() - Duration::days(8),
        )
        .unwrap();

    let missing = send(&app, "GET", "/api/auth/verify", None, None).await;
    let stale = send(&app, "GET", "/api/auth/verify", Some(&expired), None).await;
    let garbage = send(&app, "GET", "/api/auth/verify", Some("not.a.token"), None).await;

    assert_eq!(missing.0, StatusCode::UNAUTHORIZED);
    assert_eq!(missing, stale);
    assert_eq!(missing, garbage);

    let gated_missing = send(&app, "GET", "/api/admin/stats", None, None).await;
    let gated_stale = send(&app, "GET", "/api/admin/stats", Some(&expired), None).await;
    assert_eq!(gated_missing, missing);
    assert_eq!(gated_stale, missing);
}

#[tokio::test]
async fn test_gate_protects_admin_and_upload_only() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let (_, token) = register_ana(&app).await;

    let (status, _) = send(&app, "GET", "/api/upload", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let (status, body) = send(&app, "GET", "/api/upload", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (status, _) = send(&app, "GET", "/api/administrator", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = send(&app, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_admin_content_reaches_public_portfolio() {
    let dir = tempfile::tempdir().unwrap();
    let app = app(dir.path());
    let (_, token) = register_ana(&app).await;

    let project = json!({
        "title": "Budget tracker",
        "description": "Tracks spend",
        "technologies": "[\"Rust\",\"SQLite\"]",
        "featured": true,
        "startDate": "2024-01-01",
        "endDate": ""
    });

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/projects",
        None,
        Some(project.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, created) = send(
        &app,
        "POST",
        "/api/admin/projects",
        Some(&token),
        Some(project.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["endDate"], Value::Null);

    let (status, _) = send(
        &app,
        "POST",
        "/api/admin/projects",
        Some(&token),
        Some(project),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, portfolio) = send(&app, "GET", "/api/portfolio", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(portfolio["projects"][0]["title"], "Budget tracker");
    assert_eq!(portfolio["personalInfo"], Value::Null);

    let (status, stats) = send(&app, "GET", "/api/admin/stats", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["overview"]["totalProjects"], 1);
    assert_eq!(stats["overview"]["projectsCompletionRate"], 100);

    let id = created["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        "DELETE",
        &format!("/api/admin/projects/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(
        &app,
        "GET",
        &format!("/api/admin/projects/{}", id),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_routes_stay_closed_when_gate_misses_them() {
    let dir = tempfile::tempdir().unwrap();
    let app = app_with_prefixes(dir.path(), vec!["/api/private".to_string()]);

    let project = json!({
        "title": "Leaked",
        "description": "Should never be stored",
        "technologies": "[]",
        "startDate": "2024-01-01"
    });

    for (method, uri, body) in [
        ("GET", "/api/admin/projects", None),
        ("POST", "/api/admin/projects", Some(project)),
        ("GET", "/api/admin/personal", None),
        ("GET", "/api/admin/skills", None),
        ("GET", "/api/admin/experiences", None),
        ("GET", "/api/admin/stats", None),
        ("GET", "/api/upload", None),
    ] {
        let (status, body) = send(&app, method, uri, None, body).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
        assert_eq!(body, json!({ "error": "Unauthorized" }));
    }

    let (status, portfolio) = send(&app, "GET", "/api/portfolio", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(portfolio["projects"], json!([]));
}
