//! Authentication API Endpoints
//! Mission: Login, registration and token verification over HTTP

use crate::auth::{
    error::AuthError,
    middleware::Gatekeeper,
    models::{AuthResponse, LoginRequest, RegisterRequest, VerifiedUser, VerifyResponse},
    service::AuthService,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use tracing::info;

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub service: AuthService,
    pub gate: Gatekeeper,
}

/// Login endpoint - POST /api/auth/login
pub async fn login(
    State(state): State<AuthState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    info!("Login attempt: {}", payload.email);
    let response = state.service.login(payload).await?;
    Ok(Json(response))
}

/// Registration endpoint - POST /api/auth/register
pub async fn register(
    State(state): State<AuthState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>), AuthError> {
    let response = state.service.register(payload).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Token verification - GET /api/auth/verify
///
/// Public route that checks the bearer token itself, so the same uniform 401
/// comes back whether the header is missing, the token is bad or the user is gone.
pub async fn verify(
    State(state): State<AuthState>,
    headers: HeaderMap,
) -> Result<Json<VerifyResponse>, AuthError> {
    let identity = state.gate.authorize(&headers)?;
    let user = state.service.current_user(&identity)?;

    Ok(Json(VerifyResponse {
        user: VerifiedUser::from_user(&user),
    }))
}
