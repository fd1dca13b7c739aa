//! Authentication Middleware
//! Mission: Gate protected path prefixes behind a valid bearer token

use crate::auth::{error::AuthError, jwt::JwtHandler, models::Identity};
use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Outcome of running a request through the gate.
#[derive(Debug)]
pub enum GateDecision {
    /// Path is public; the gate does not apply.
    PassThrough,
    Authorized(Identity),
    Rejected(AuthError),
}

#[derive(Clone)]
pub struct Gatekeeper {
    jwt: Arc<JwtHandler>,
    protected_prefixes: Arc<Vec<String>>,
}

impl Gatekeeper {
    pub fn new(jwt: Arc<JwtHandler>, protected_prefixes: Vec<String>) -> Self {
        let protected_prefixes = protected_prefixes
            .into_iter()
            .map(|p| p.trim_end_matches('/').to_string())
            .filter(|p| !p.is_empty())
            .collect();
        Self {
            jwt,
            protected_prefixes: Arc::new(protected_prefixes),
        }
    }

    /// Segment-aware prefix match: `/api/admin` covers `/api/admin/x`, not `/api/administrator`.
    pub fn is_protected(&self, path: &str) -> bool {
        self.protected_prefixes.iter().any(|prefix| {
            path.strip_prefix(prefix.as_str())
                .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
        })
    }

    /// Extract and verify the bearer token carried in `headers`.
    pub fn authorize(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = bearer_token(headers)?;
        self.jwt
            .verify(token)
            .map(|claims| claims.identity())
            .ok_or(AuthError::TokenInvalid)
    }

    pub fn decide(&self, path: &str, headers: &HeaderMap) -> GateDecision {
        if !self.is_protected(path) {
            return GateDecision::PassThrough;
        }
        match self.authorize(headers) {
            Ok(identity) => GateDecision::Authorized(identity),
            Err(e) => GateDecision::Rejected(e),
        }
    }
}

/// Token from an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredential)?
        .to_str()
        .map_err(|_| AuthError::MissingCredential)?;

    value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::MissingCredential)
}

/// Gate every request under a protected prefix; attach the caller's `Identity`.
pub async fn auth_middleware(
    State(gate): State<Gatekeeper>,
    mut req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_string();

    match gate.decide(&path, req.headers()) {
        GateDecision::PassThrough => next.run(req).await,
        GateDecision::Authorized(identity) => {
            debug!(path = %path, user = %identity.email, "Authorized request");
            req.extensions_mut().insert(identity);
            next.run(req).await
        }
        GateDecision::Rejected(reason) => {
            warn!(path = %path, reason = %reason, "Rejected unauthenticated request");
            reason.into_response()
        }
    }
}

/// Handlers behind the gate take `Identity` as an argument.
#[async_trait]
impl<S> FromRequestParts<S> for Identity
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .ok_or(AuthError::MissingCredential)
    }
}
