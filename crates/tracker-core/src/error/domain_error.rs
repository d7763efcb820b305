//! Domain errors - error types for the domain layer

use thiserror::Error;

use crate::value_objects::{CourseId, MemberId, RoleId};

/// Coarse error category, used by callers to pick a response strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed field
    Validation,
    /// Uniqueness violation
    Duplicate,
    /// Id does not resolve
    NotFound,
    /// Privilege or ownership check failed
    NotAuthorized,
    /// Requester tried to delete themselves
    SelfAction,
    /// Operation disabled by configuration
    Unavailable,
    /// Store or infrastructure failure
    Internal,
}

/// Domain layer errors
#[derive(Debug, Error)]
pub enum DomainError {
    // =========================================================================
    // Not Found Errors
    // =========================================================================
    #[error("Member not found: {0}")]
    MemberNotFound(MemberId),

    #[error("Course not found: {0}")]
    CourseNotFound(CourseId),

    #[error("Role not found: {0}")]
    RoleNotFound(RoleId),

    // =========================================================================
    // Validation Errors
    // =========================================================================
    #[error("Validation error: {0}")]
    Validation(String),

    #[error(
        "Names must be at least 3 characters long, start with a letter, \
         and contain only letters, numbers, periods, underscores, and dashes."
    )]
    InvalidName,

    #[error("Invalid email address.")]
    InvalidEmail,

    #[error(
        "Password must be between 8-15 characters long, contain at least one \
         uppercase letter, one lowercase letter, and one number."
    )]
    InvalidPassword,

    #[error("Passwords must match.")]
    PasswordMismatch,

    #[error("Invalid {field}: {message}")]
    InvalidField { field: &'static str, message: String },

    #[error("Role privilege must be between 1 and 99, got {0}.")]
    InvalidPrivilege(i32),

    #[error("Role ID 1 is reserved for unassigned members and cannot be used.")]
    ReservedRoleId,

    // =========================================================================
    // Conflict Errors
    // =========================================================================
    #[error("Name already exists.")]
    DuplicateName,

    #[error("Email address already exists.")]
    DuplicateEmail,

    #[error("A course named '{name}' ({code}) already exists.")]
    DuplicateCourse { name: String, code: String },

    #[error("Role name already exists.")]
    DuplicateRoleName,

    #[error("Privilege level already assigned.")]
    DuplicatePrivilege,

    #[error("Member already holds a role in this course.")]
    DuplicateAssociation,

    // =========================================================================
    // Authorization Errors
    // =========================================================================
    #[error("You do not have permission to perform that action.")]
    NotAuthorized,

    #[error("You cannot delete yourself.")]
    SelfAction,

    // =========================================================================
    // Configuration-gated operations
    // =========================================================================
    #[error("Adding, editing, or deleting roles is disabled at this time.")]
    RolesLocked,

    // =========================================================================
    // Infrastructure Errors (wrapped)
    // =========================================================================
    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl DomainError {
    /// Get an error code string for API responses
    pub fn code(&self) -> &'static str {
        match self {
            // Not Found
            Self::MemberNotFound(_) => "UNKNOWN_MEMBER",
            Self::CourseNotFound(_) => "UNKNOWN_COURSE",
            Self::RoleNotFound(_) => "UNKNOWN_ROLE",

            // Validation
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::InvalidName => "INVALID_NAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::InvalidPassword => "INVALID_PASSWORD",
            Self::PasswordMismatch => "PASSWORD_MISMATCH",
            Self::InvalidField { .. } => "INVALID_FIELD",
            Self::InvalidPrivilege(_) => "INVALID_PRIVILEGE",
            Self::ReservedRoleId => "RESERVED_ROLE_ID",

            // Conflict
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::DuplicateEmail => "DUPLICATE_EMAIL",
            Self::DuplicateCourse { .. } => "DUPLICATE_COURSE",
            Self::DuplicateRoleName => "DUPLICATE_ROLE_NAME",
            Self::DuplicatePrivilege => "DUPLICATE_PRIVILEGE",
            Self::DuplicateAssociation => "DUPLICATE_ASSOCIATION",

            // Authorization
            Self::NotAuthorized => "NOT_AUTHORIZED",
            Self::SelfAction => "SELF_ACTION",

            Self::RolesLocked => "ROLES_LOCKED",

            // Infrastructure
            Self::DatabaseError(_) => "DATABASE_ERROR",
            Self::InternalError(_) => "INTERNAL_ERROR",
        }
    }

    /// Get the error category
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MemberNotFound(_) | Self::CourseNotFound(_) | Self::RoleNotFound(_) => {
                ErrorKind::NotFound
            }
            Self::Validation(_)
            | Self::InvalidName
            | Self::InvalidEmail
            | Self::InvalidPassword
            | Self::PasswordMismatch
            | Self::InvalidField { .. }
            | Self::InvalidPrivilege(_)
            | Self::ReservedRoleId => ErrorKind::Validation,
            Self::DuplicateName
            | Self::DuplicateEmail
            | Self::DuplicateCourse { .. }
            | Self::DuplicateRoleName
            | Self::DuplicatePrivilege
            | Self::DuplicateAssociation => ErrorKind::Duplicate,
            Self::NotAuthorized => ErrorKind::NotAuthorized,
            Self::SelfAction => ErrorKind::SelfAction,
            Self::RolesLocked => ErrorKind::Unavailable,
            Self::DatabaseError(_) | Self::InternalError(_) => ErrorKind::Internal,
        }
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        self.kind() == ErrorKind::NotFound
    }

    /// Check if this is a validation error
    pub fn is_validation(&self) -> bool {
        self.kind() == ErrorKind::Validation
    }

    /// Check if this is an authorization error (including self-deletion)
    pub fn is_authorization(&self) -> bool {
        matches!(self.kind(), ErrorKind::NotAuthorized | ErrorKind::SelfAction)
    }

    /// Check if this is a conflict error
    pub fn is_conflict(&self) -> bool {
        self.kind() == ErrorKind::Duplicate
    }

    /// Name of the input field the error refers to, if any
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::InvalidName | Self::DuplicateName => Some("name"),
            Self::InvalidEmail | Self::DuplicateEmail => Some("email"),
            Self::InvalidPassword | Self::PasswordMismatch => Some("password"),
            Self::InvalidField { field, .. } => Some(field),
            Self::InvalidPrivilege(_) | Self::DuplicatePrivilege => Some("privilege"),
            Self::DuplicateRoleName => Some("name"),
            Self::DuplicateCourse { .. } => Some("code"),
            Self::ReservedRoleId => Some("id"),
            _ => None,
        }
    }
}
