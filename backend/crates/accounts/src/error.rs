//! Accounts Error Types
//!
//! Crate-specific error variants that integrate with the unified
//! `kernel::error::AppError` system.
//!
//! Only infrastructure-level failures live here. Anything the user can
//! recover from (bad input, wrong password, duplicate username, invalid
//! code) is a [`crate::domain::outcome::Outcome`], not an error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Accounts-specific result type alias
pub type AccountsResult<T> = Result<T, AccountsError>;

/// Accounts-specific error variants
#[derive(Debug, Error)]
pub enum AccountsError {
    /// Session cookie missing, unsigned, or tampered with
    #[error("Session not found or invalid")]
    SessionInvalid,

    /// A record the workflow relies on vanished mid-flow
    #[error("Account record missing: {0}")]
    AccountMissing(String),

    /// Argon2 hashing failure
    #[error("Secret hashing failed: {0}")]
    Hashing(String),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AccountsError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AccountsError::SessionInvalid => StatusCode::UNAUTHORIZED,
            AccountsError::AccountMissing(_)
            | AccountsError::Hashing(_)
            | AccountsError::Database(_)
            | AccountsError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AccountsError::SessionInvalid => ErrorKind::Unauthorized,
            AccountsError::AccountMissing(_)
            | AccountsError::Hashing(_)
            | AccountsError::Database(_)
            | AccountsError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Internal detail (database messages, missing-record specifics)
    /// never reaches the client; the response carries a generic message.
    pub fn to_app_error(&self) -> AppError {
        match self {
            AccountsError::SessionInvalid => AppError::unauthorized(self.to_string()),
            _ => AppError::new(self.kind(), "Something went wrong. Please try again later."),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AccountsError::Database(e) => {
                tracing::error!(error = %e, "Accounts database error");
            }
            AccountsError::AccountMissing(detail) => {
                tracing::error!(detail = %detail, "Account record missing mid-flow");
            }
            AccountsError::Hashing(msg) => {
                tracing::error!(message = %msg, "Secret hashing error");
            }
            AccountsError::Internal(msg) => {
                tracing::error!(message = %msg, "Accounts internal error");
            }
            AccountsError::SessionInvalid => {
                tracing::debug!("Rejected request with invalid session");
            }
        }
    }
}

impl IntoResponse for AccountsError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<AppError> for AccountsError {
    fn from(err: AppError) -> Self {
        AccountsError::Internal(err.to_string())
    }
}

impl From<platform::secret::SecretHashError> for AccountsError {
    fn from(err: platform::secret::SecretHashError) -> Self {
        AccountsError::Hashing(err.to_string())
    }
}
