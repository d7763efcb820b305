//! Error handling utilities for repositories

use sqlx::Error as SqlxError;
use tracker_core::error::DomainError;

// Constraint and index names from the schema migration
pub(crate) const MEMBERS_NAME_INDEX: &str = "idx_members_name_lower";
pub(crate) const MEMBERS_EMAIL_INDEX: &str = "idx_members_email_lower";
pub(crate) const COURSES_NAME_CODE_INDEX: &str = "idx_courses_name_code_lower";
pub(crate) const ROLES_NAME_INDEX: &str = "idx_roles_name_lower";
pub(crate) const ROLES_PRIVILEGE_UNIQUE: &str = "roles_privilege_unique";
pub(crate) const ROLES_RESERVED_ID: &str = "roles_reserved_id";
pub(crate) const ROLES_PRIVILEGE_RANGE: &str = "roles_privilege_range";
pub(crate) const ROLES_PKEY: &str = "roles_pkey";
pub(crate) const ASSOCIATIONS_COURSE_MEMBER_UNIQUE: &str = "associations_course_member_unique";
pub(crate) const ASSOCIATIONS_PKEY: &str = "associations_pkey";
pub(crate) const ASSOCIATIONS_NOT_UNASSIGNED: &str = "associations_not_unassigned";

/// Convert SQLx error to DomainError
pub fn map_db_error(e: SqlxError) -> DomainError {
    DomainError::DatabaseError(e.to_string())
}

/// Map unique/check violations by constraint name, falling back to a database error
pub fn map_constraint_violation<F>(e: SqlxError, by_constraint: F) -> DomainError
where
    F: FnOnce(&str) -> Option<DomainError>,
{
    if let Some(db_err) = e.as_database_error() {
        if db_err.is_unique_violation() || db_err.is_check_violation() {
            if let Some(mapped) = db_err.constraint().and_then(by_constraint) {
                return mapped;
            }
        }
    }
    DomainError::DatabaseError(e.to_string())
}

/// Member writes: duplicate name or email
pub fn map_member_write_error(e: SqlxError) -> DomainError {
    map_constraint_violation(e, |constraint| match constraint {
        MEMBERS_NAME_INDEX => Some(DomainError::DuplicateName),
        MEMBERS_EMAIL_INDEX => Some(DomainError::DuplicateEmail),
        _ => None,
    })
}

/// Role writes: duplicate name/privilege or a broken role invariant
pub fn map_role_write_error(e: SqlxError, privilege: i32) -> DomainError {
    map_constraint_violation(e, |constraint| match constraint {
        ROLES_NAME_INDEX | ROLES_PKEY => Some(DomainError::DuplicateRoleName),
        ROLES_PRIVILEGE_UNIQUE => Some(DomainError::DuplicatePrivilege),
        ROLES_RESERVED_ID => Some(DomainError::ReservedRoleId),
        ROLES_PRIVILEGE_RANGE => Some(DomainError::InvalidPrivilege(privilege)),
        _ => None,
    })
}

/// Association writes: second role in the same course, or the Unassigned role
pub fn map_association_write_error(e: SqlxError) -> DomainError {
    map_constraint_violation(e, |constraint| match constraint {
        ASSOCIATIONS_COURSE_MEMBER_UNIQUE | ASSOCIATIONS_PKEY => {
            Some(DomainError::DuplicateAssociation)
        }
        ASSOCIATIONS_NOT_UNASSIGNED => Some(DomainError::ReservedRoleId),
        _ => None,
    })
}

/// Course writes: the (name, code) pair is taken
pub fn map_course_write_error(e: SqlxError, name: &str, code: &str) -> DomainError {
    map_constraint_violation(e, |constraint| {
        (constraint == COURSES_NAME_CODE_INDEX).then(|| DomainError::DuplicateCourse {
            name: name.to_string(),
            code: code.to_string(),
        })
    })
}
