//! Application error taxonomy.
//!
//! One error enum shared by every layer, mapped onto HTTP statuses and
//! the response envelope at the axum boundary.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Everything that can fail, roughly ordered by layer
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication and authorization
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid authentication token")]
    TokenInvalid,

    #[error("Authentication token has expired")]
    TokenExpired,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Account is blocked after too many failed login attempts")]
    AccountBlocked,

    #[error("Account is inactive")]
    AccountInactive,

    #[error("Access denied")]
    Forbidden,

    // Resources
    #[error("Resource not found")]
    NotFound,

    #[error("An account with this email already exists")]
    DuplicateEmail,

    #[error("A record already exists for this period")]
    DuplicatePeriod,

    // Validation
    #[error("{}", .0.join(", "))]
    Validation(Vec<String>),

    // Persistence
    #[error("Database error")]
    Database(#[from] sea_orm::DbErr),

    // Internal
    #[error("Internal server error")]
    Internal(String),
}

/// Error response body matching the API envelope
#[derive(Debug, Serialize)]
struct ErrorEnvelope {
    success: bool,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<Vec<String>>,
}

impl AppError {
    /// HTTP status this error maps to
    fn status(&self) -> StatusCode {
        match self {
            AppError::Unauthorized
            | AppError::TokenInvalid
            | AppError::TokenExpired
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::AccountBlocked => StatusCode::LOCKED,
            AppError::AccountInactive | AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::DuplicateEmail | AppError::DuplicatePeriod | AppError::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message safe to show the caller
    fn user_message(&self) -> String {
        match self {
            AppError::Validation(_) => "Validation failed".to_string(),

            // Internal failures are logged in full but reported generically
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "A database error occurred".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "An internal error occurred".to_string()
            }

            _ => self.to_string(),
        }
    }

    /// Field-level details for the `errors` envelope entry
    fn error_details(&self) -> Option<Vec<String>> {
        match self {
            AppError::Validation(messages) => Some(messages.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorEnvelope {
            success: false,
            message: self.user_message(),
            errors: self.error_details(),
        };

        (status, Json(body)).into_response()
    }
}

/// Shorthand used throughout the crate
pub type AppResult<T> = Result<T, AppError>;

/// Treat a missing row as NotFound
pub trait OptionExt<T> {
    fn ok_or_not_found(self) -> AppResult<T>;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_not_found(self) -> AppResult<T> {
        self.ok_or(AppError::NotFound)
    }
}

/// Shorthand constructors
impl AppError {
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(vec![msg.into()])
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }
}
