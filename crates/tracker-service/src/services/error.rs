//! Service layer error types
//!
//! Provides a unified error type for all service operations.

use tracing::error;
use tracker_common::AppError;
use tracker_core::{DomainError, ErrorKind};

/// Generic text shown when a store or internal failure is hidden from the user
pub const OPERATION_FAILED_MSG: &str = "Operation failed.";

/// Generic text shown for every authorization denial
pub const NOT_AUTHORIZED_MSG: &str = "You do not have permission to perform that action.";

/// Service layer error type
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Domain rule violation (validation, duplicate, not found, denial, store failure)
    #[error(transparent)]
    Domain(DomainError),

    /// Application error (hashing, credentials, configuration)
    #[error(transparent)]
    App(AppError),

    /// Service wiring or input problem not tied to a single field
    #[error("Validation error: {0}")]
    Validation(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Create an internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        let msg = msg.into();
        error!(error = %msg, "Internal service error");
        Self::Internal(msg)
    }

    /// The uniform authorization denial
    pub fn not_authorized() -> Self {
        Self::Domain(DomainError::NotAuthorized)
    }

    /// Error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Domain(e) => e.kind(),
            Self::App(AppError::Domain(e)) => e.kind(),
            Self::App(e) => match e.status_code() {
                400 => ErrorKind::Validation,
                403 => ErrorKind::NotAuthorized,
                404 => ErrorKind::NotFound,
                409 => ErrorKind::Duplicate,
                _ => ErrorKind::Internal,
            },
            Self::Validation(_) => ErrorKind::Validation,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    /// The wrapped domain error, if any
    pub fn domain(&self) -> Option<&DomainError> {
        match self {
            Self::Domain(e) | Self::App(AppError::Domain(e)) => Some(e),
            _ => None,
        }
    }

    /// Check if this is an authorization denial (including self-deletion)
    pub fn is_authorization(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotAuthorized | ErrorKind::SelfAction)
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::Validation => 400,
            ErrorKind::NotAuthorized | ErrorKind::SelfAction | ErrorKind::Unavailable => 403,
            ErrorKind::NotFound => 404,
            ErrorKind::Duplicate => 409,
            ErrorKind::Internal => 500,
        }
    }

    /// Get the error code for API responses
    pub fn error_code(&self) -> &str {
        match self {
            Self::Domain(e) => e.code(),
            Self::App(e) => e.error_code(),
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Input field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        self.domain().and_then(DomainError::field)
    }

    /// Message safe to show the user
    ///
    /// Field-level text for validation and duplicates, one generic line for
    /// every denial, and "Operation failed." for store or internal failures.
    pub fn user_message(&self) -> String {
        if let Self::App(e @ AppError::InvalidCredentials) = self {
            return e.to_string();
        }
        match self.kind() {
            ErrorKind::NotAuthorized => NOT_AUTHORIZED_MSG.to_string(),
            ErrorKind::SelfAction => DomainError::SelfAction.to_string(),
            ErrorKind::Internal => OPERATION_FAILED_MSG.to_string(),
            _ => match self {
                Self::Domain(e) | Self::App(AppError::Domain(e)) => e.to_string(),
                other => other.to_string(),
            },
        }
    }
}

impl From<DomainError> for ServiceError {
    fn from(err: DomainError) -> Self {
        if err.kind() == ErrorKind::Internal {
            error!(error = %err, code = err.code(), "Store operation failed");
        }
        Self::Domain(err)
    }
}

impl From<AppError> for ServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::Domain(e) => Self::from(e),
            other => {
                if other.is_server_error() {
                    error!(error = ?other, "Application error");
                }
                Self::App(other)
            }
        }
    }
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Domain(e) => AppError::Domain(e),
            ServiceError::App(e) => e,
            ServiceError::Validation(msg) => AppError::Validation(msg),
            ServiceError::Internal(msg) => AppError::Internal(anyhow::anyhow!(msg)),
        }
    }
}

/// Result type for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;
