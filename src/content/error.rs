//! Content API errors

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
pub enum ContentError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error("{0}")]
    Conflict(String),
    #[error("invalid input")]
    Validation(Vec<FieldError>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<ValidationErrors> for ContentError {
    fn from(errors: ValidationErrors) -> Self {
        ContentError::Validation(field_errors(&errors))
    }
}

impl From<FieldError> for ContentError {
    fn from(error: FieldError) -> Self {
        ContentError::Validation(vec![error])
    }
}

impl From<rusqlite::Error> for ContentError {
    fn from(err: rusqlite::Error) -> Self {
        ContentError::Internal(err.into())
    }
}

impl IntoResponse for ContentError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ContentError::NotFound(what) => (StatusCode::NOT_FOUND, format!("{} not found", what)),
            ContentError::Conflict(message) => (StatusCode::CONFLICT, message),
            ContentError::Validation(details) => return invalid_input_response(details),
            ContentError::Internal(e) => {
                error!("Content internal error: {:#}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
