//! Typed errors and HTTP mapping.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    Missing(&'static str),
    #[error("invalid value for {key}: '{value}'")]
    Invalid { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("mongodb: {0}")]
    Mongo(#[from] mongodb::error::Error),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl StoreError {
    /// True when no server in the deployment could be selected within the timeout.
    pub fn is_server_selection(&self) -> bool {
        match self {
            StoreError::Mongo(e) => matches!(
                e.kind.as_ref(),
                mongodb::error::ErrorKind::ServerSelection { .. }
            ),
            StoreError::Unavailable(_) => false,
        }
    }
}

/// One rejected field of a request payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("validation failed: {} violation(s)", .0.len())]
    Validation(Vec<FieldViolation>),
    #[error("Invalid ID format")]
    InvalidId,
    #[error("Contact not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
}

#[derive(Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
}

#[derive(Serialize)]
pub struct ValidationBody {
    pub errors: Vec<FieldViolation>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                (StatusCode::BAD_REQUEST, Json(ValidationBody { errors })).into_response()
            }
            AppError::InvalidId => (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "Invalid ID format",
                }),
            )
                .into_response(),
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody {
                    error: "Contact not found",
                }),
            )
                .into_response(),
            AppError::Store(e) => {
                tracing::error!(error = %e, "store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody {
                        error: "Server error",
                    }),
                )
                    .into_response()
            }
        }
    }
}
