//! HTTP Router Assembly
//! Mission: Wire auth, content and upload routers behind one gate

use crate::auth::{
    api as auth_api, auth_middleware, AuthService, AuthState, Gatekeeper, JwtHandler,
    PasswordHasher, UserStore,
};
use crate::config::AppConfig;
use crate::content::{self, ContentStore};
use crate::db::Database;
use crate::middleware::request_logging;
use crate::upload::{self, UploadState};
use anyhow::Result;
use axum::{
    middleware,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Build the full application over an already-open database.
pub fn build_router(db: Database, config: &AppConfig) -> Result<Router> {
    let jwt = Arc::new(JwtHandler::new(&config.jwt_secret)?);
    let gate = Gatekeeper::new(jwt.clone(), config.protected_prefixes.clone());

    let auth_state = AuthState {
        service: AuthService::new(
            UserStore::new(db.clone()),
            jwt,
            PasswordHasher::new(config.bcrypt_cost),
        ),
        gate: gate.clone(),
    };

    let auth_router = Router::new()
        .route("/api/auth/login", post(auth_api::login))
        .route("/api/auth/register", post(auth_api::register))
        .route("/api/auth/verify", get(auth_api::verify))
        .with_state(auth_state);

    let upload_state = UploadState::new(config.upload_dir.clone(), config.max_upload_bytes);

    let app = Router::new()
        .route("/health", get(health_check))
        .merge(auth_router)
        .merge(content::router(ContentStore::new(db)))
        .merge(upload::router(upload_state))
        .nest_service("/uploads", ServeDir::new(&config.upload_dir))
        .layer(middleware::from_fn_with_state(gate, auth_middleware))
        .layer(middleware::from_fn(request_logging))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    Ok(app)
}

/// Open the configured database and build the application on it.
pub fn build_app(config: &AppConfig) -> Result<Router> {
    let db = Database::open(&config.database_path)?;
    build_router(db, config)
}
