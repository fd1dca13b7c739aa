//! Authentication Errors
//! Mission: Map auth failures onto uniform, non-leaking HTTP responses

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use tracing::error;
use validator::ValidationErrors;

use crate::error::{field_errors, invalid_input_response, FieldError};

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("email already registered")]
    DuplicateAccount,
    #[error("token invalid or expired")]
    TokenInvalid,
    #[error("missing or malformed authorization header")]
    MissingCredential,
    #[error("invalid input")]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for AuthError {
    fn from(errors: ValidationErrors) -> Self {
        AuthError::Validation(field_errors(&errors))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthError::DuplicateAccount => (StatusCode::CONFLICT, "Email already registered"),
            // identical body: callers cannot tell which check failed
            AuthError::TokenInvalid | AuthError::MissingCredential => {
                (StatusCode::UNAUTHORIZED, "Unauthorized")
            }
            AuthError::Validation(details) => return invalid_input_response(details),
            AuthError::Internal(e) => {
                error!("Auth internal error: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
