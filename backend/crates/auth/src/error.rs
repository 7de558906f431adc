//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, code::ErrorCode, kind::ErrorKind};
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Why a bearer token was rejected
///
/// Only ever logged. Clients see a single "Invalid or expired token".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TokenRejection {
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    NotYetValid,
    #[error("signature mismatch")]
    BadSignature,
    #[error("unexpected signing algorithm")]
    AlgorithmMismatch,
    #[error("unexpected issuer")]
    WrongIssuer,
    #[error("malformed token")]
    Malformed,
    #[error("subject does not resolve to a user")]
    UnknownSubject,
}

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Another live account already uses this email
    #[error("User with this email already exists")]
    EmailTaken,

    /// Another live account already uses this username
    #[error("User with this username already exists")]
    UsernameTaken,

    /// Unknown email or wrong password. Never distinguished.
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Account exists but is not active
    #[error("User account is deactivated")]
    AccountDeactivated,

    #[error("Missing authorization header")]
    MissingAuthorizationHeader,

    #[error("Invalid authorization header format")]
    InvalidAuthorizationHeader,

    #[error("Invalid or expired token")]
    InvalidToken(TokenRejection),

    #[error("User not found")]
    UserNotFound,

    /// Field-level validation failure, already shaped as an envelope
    #[error("{0}")]
    Validation(AppError),

    /// Request deadline elapsed while waiting on the store
    #[error("Request deadline exceeded")]
    Timeout,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error("Token signing failed: {0}")]
    TokenSigning(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::EmailTaken | AuthError::UsernameTaken => ErrorKind::Conflict,
            AuthError::InvalidCredentials
            | AuthError::MissingAuthorizationHeader
            | AuthError::InvalidAuthorizationHeader
            | AuthError::InvalidToken(_) => ErrorKind::Unauthorized,
            AuthError::AccountDeactivated => ErrorKind::Forbidden,
            AuthError::UserNotFound => ErrorKind::NotFound,
            AuthError::Validation(err) => err.kind(),
            AuthError::Timeout => ErrorKind::RequestTimeout,
            AuthError::Database(_)
            | AuthError::Hashing(_)
            | AuthError::TokenSigning(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Get the ErrorCode for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AuthError::EmailTaken | AuthError::UsernameTaken => ErrorCode::UserAlreadyExists,
            AuthError::InvalidCredentials => ErrorCode::InvalidCredentials,
            AuthError::AccountDeactivated => ErrorCode::AccountDeactivated,
            AuthError::MissingAuthorizationHeader => ErrorCode::MissingAuthorizationHeader,
            AuthError::InvalidAuthorizationHeader => ErrorCode::InvalidAuthorizationFormat,
            AuthError::InvalidToken(_) => ErrorCode::TokenInvalid,
            AuthError::UserNotFound => ErrorCode::UserNotFound,
            AuthError::Validation(err) => err.code(),
            AuthError::Timeout => ErrorCode::RequestTimeout,
            AuthError::Database(_) => ErrorCode::DatabaseError,
            AuthError::Hashing(_) => ErrorCode::HashingFailed,
            AuthError::TokenSigning(_) => ErrorCode::TokenGenerationFailed,
            AuthError::Internal(_) => ErrorCode::InternalError,
        }
    }

    /// Message shown to clients. Internal details stay in the logs.
    fn public_message(&self) -> String {
        match self {
            AuthError::Database(_) => "Database error".to_string(),
            AuthError::Hashing(_) => "Failed to process password".to_string(),
            AuthError::TokenSigning(_) => "Failed to generate token".to_string(),
            AuthError::Internal(_) => "Internal server error".to_string(),
            other => other.to_string(),
        }
    }

    /// Log, then convert to the envelope value
    pub fn into_app_error(self) -> AppError {
        self.log();
        match self {
            AuthError::Validation(err) => err,
            AuthError::Database(err) => {
                let kind = match &err {
                    sqlx::Error::PoolTimedOut => ErrorKind::ServiceUnavailable,
                    _ => ErrorKind::InternalServerError,
                };
                AppError::new(kind, ErrorCode::DatabaseError, "Database error").with_source(err)
            }
            other => AppError::new(other.kind(), other.code(), other.public_message()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Hashing(msg) | AuthError::TokenSigning(msg) | AuthError::Internal(msg) => {
                tracing::error!(detail = %msg, code = %self.code(), "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::InvalidToken(reason) => {
                tracing::warn!(reason = %reason, "Bearer token rejected");
            }
            AuthError::Timeout => {
                tracing::warn!("Auth request deadline exceeded");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        err.into_app_error()
    }
}
