//! Field-level format rules
//!
//! These checks are pure; uniqueness against stored rows is checked by the
//! service layer before any write.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::DomainError;

/// Maximum length of member names, course names/codes/groups and role names
pub const MAX_NAME_LEN: usize = 64;
/// Maximum length of an email address (RFC 3696)
pub const MAX_EMAIL_LEN: usize = 320;
/// Maximum length of a course description
pub const MAX_DESCRIPTION_LEN: usize = 256;
/// Password length bounds
pub const MIN_PASSWORD_LEN: usize = 8;
pub const MAX_PASSWORD_LEN: usize = 15;

/// Letter first, then letters, digits, `.`, `_`, `-`; at least 3 characters
pub static NAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9._-]{2,}$").expect("valid name regex"));

pub static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,7}$").expect("valid email regex")
});

/// Letter or digit first, then letters, digits, spaces, `.`, `_`, `-`; at least 3 characters
pub static TEXT_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9 ._-]{2,}$").expect("valid text regex"));

const INVALID_TEXT_MSG: &str = "Text fields must be at least 3 characters long, start with a \
     letter or number, and contain only letters, numbers, periods, underscores, dashes, and spaces.";

/// Validate a member name
pub fn validate_member_name(name: &str) -> Result<(), DomainError> {
    if name.chars().count() > MAX_NAME_LEN || !NAME_REGEX.is_match(name) {
        return Err(DomainError::InvalidName);
    }
    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), DomainError> {
    if email.chars().count() > MAX_EMAIL_LEN || !EMAIL_REGEX.is_match(email) {
        return Err(DomainError::InvalidEmail);
    }
    Ok(())
}

/// Validate password strength
///
/// - 8 to 15 characters
/// - at least one uppercase letter, one lowercase letter and one digit
pub fn validate_password(password: &str) -> Result<(), DomainError> {
    let len = password.chars().count();
    if !(MIN_PASSWORD_LEN..=MAX_PASSWORD_LEN).contains(&len)
        || !password.chars().any(|c| c.is_ascii_uppercase())
        || !password.chars().any(|c| c.is_ascii_lowercase())
        || !password.chars().any(|c| c.is_ascii_digit())
    {
        return Err(DomainError::InvalidPassword);
    }
    Ok(())
}

/// Validate a free-form label (course name, code, group, role name)
pub fn validate_text(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::InvalidField {
            field,
            message: format!("must be at most {MAX_NAME_LEN} characters"),
        });
    }
    if !TEXT_REGEX.is_match(value) {
        return Err(DomainError::InvalidField {
            field,
            message: INVALID_TEXT_MSG.to_string(),
        });
    }
    Ok(())
}

/// Validate an optional description
pub fn validate_description(value: &str) -> Result<(), DomainError> {
    if value.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(DomainError::InvalidField {
            field: "description",
            message: format!("must be at most {MAX_DESCRIPTION_LEN} characters"),
        });
    }
    Ok(())
}

/// Trim an optional field, mapping blank input to `None`
pub fn normalize_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
