//! Authentication Service
//! Mission: Login, registration and token verification over injected components

use crate::auth::{
    error::AuthError,
    jwt::JwtHandler,
    models::{AuthResponse, Identity, LoginRequest, RegisterRequest, User, UserResponse},
    password::PasswordHasher,
    user_store::{CreateUserError, UserStore},
};
use std::sync::Arc;
use tracing::{info, warn};
use validator::Validate;

#[derive(Clone)]
pub struct AuthService {
    users: UserStore,
    jwt: Arc<JwtHandler>,
    hasher: PasswordHasher,
}

impl AuthService {
    pub fn new(users: UserStore, jwt: Arc<JwtHandler>, hasher: PasswordHasher) -> Self {
        Self { users, jwt, hasher }
    }

    pub fn jwt(&self) -> &Arc<JwtHandler> {
        &self.jwt
    }

    /// Unknown email and wrong password produce the same error.
    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AuthError> {
        req.validate()?;

        let Some(user) = self.users.find_by_email(&req.email)? else {
            warn!("Failed login attempt (unknown email): {}", req.email);
            return Err(AuthError::InvalidCredentials);
        };

        let valid = self
            .hasher
            .verify_blocking(req.password, user.password_hash.clone())
            .await?;
        if !valid {
            warn!("Failed login attempt (bad password): {}", req.email);
            return Err(AuthError::InvalidCredentials);
        }

        info!("Login successful: {}", user.email);
        self.respond_with_token(&user)
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AuthError> {
        req.validate()?;

        // cheap pre-check; the UNIQUE constraint is still the authority
        if self.users.find_by_email(&req.email)?.is_some() {
            return Err(AuthError::DuplicateAccount);
        }

        let password_hash = self.hasher.hash_blocking(req.password).await?;

        let user = self
            .users
            .create_user(&req.name, &req.email, password_hash)
            .map_err(|e| match e {
                CreateUserError::DuplicateEmail => AuthError::DuplicateAccount,
                CreateUserError::Storage(e) => AuthError::Internal(e),
            })?;

        info!("Registered user: {}", user.email);
        self.respond_with_token(&user)
    }

    /// Resolve a verified identity to its stored user. A deleted user is `TokenInvalid`.
    pub fn current_user(&self, identity: &Identity) -> Result<User, AuthError> {
        self.users
            .find_by_id(&identity.user_id)?
            .ok_or(AuthError::TokenInvalid)
    }

    fn respond_with_token(&self, user: &User) -> Result<AuthResponse, AuthError> {
        let token = self.jwt.issue(&Identity::for_user(user))?;
        Ok(AuthResponse {
            user: UserResponse::from_user(user),
            token,
        })
    }
}
