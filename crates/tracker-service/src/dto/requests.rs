//! Request DTOs for use-case inputs
//!
//! All request DTOs implement `Deserialize` and `Validate`. The derive covers
//! length and shape; pattern rules and uniqueness are checked by
//! [`Validator`](crate::services::Validator).

use serde::Deserialize;
use tracker_core::{MemberId, RoleId};
use validator::Validate;

// ============================================================================
// Member Requests
// ============================================================================

/// Add or edit a member (admin only)
///
/// `password` is required when adding. When editing, a blank or missing
/// password keeps the stored hash.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct MemberInput {
    #[validate(length(min = 3, max = 64, message = "Name must be 3-64 characters"))]
    pub name: String,

    #[validate(
        email(message = "Invalid email format"),
        length(max = 320, message = "Email must be at most 320 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 15, message = "Password must be 8-15 characters"))]
    pub password: Option<String>,

    /// Repeated password; checked against `password` when present
    pub confirm_password: Option<String>,

    #[serde(default)]
    pub is_admin: bool,
}

impl MemberInput {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            ..Self::default()
        }
    }

    /// Set the password and its confirmation to the same value
    pub fn with_password(mut self, password: impl Into<String>) -> Self {
        let password = password.into();
        self.confirm_password = Some(password.clone());
        self.password = Some(password);
        self
    }

    pub fn admin(mut self, is_admin: bool) -> Self {
        self.is_admin = is_admin;
        self
    }
}

/// Update the requester's own profile
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileInput {
    #[validate(
        email(message = "Invalid email format"),
        length(max = 320, message = "Email must be at most 320 characters")
    )]
    pub email: String,

    #[validate(length(min = 8, max = 15, message = "Password must be 8-15 characters"))]
    pub password: Option<String>,

    pub confirm_password: Option<String>,
}

// ============================================================================
// Course Requests
// ============================================================================

/// Add or edit a course
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CourseInput {
    #[validate(length(min = 3, max = 64, message = "Course name must be 3-64 characters"))]
    pub name: String,

    #[validate(length(min = 3, max = 64, message = "Course code must be 3-64 characters"))]
    pub code: String,

    #[validate(length(max = 64, message = "Group must be at most 64 characters"))]
    pub group: Option<String>,

    #[validate(length(max = 256, message = "Description must be at most 256 characters"))]
    pub description: Option<String>,
}

impl CourseInput {
    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            ..Self::default()
        }
    }

    pub fn group(mut self, group: impl Into<String>) -> Self {
        self.group = Some(group.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ============================================================================
// Role Requests
// ============================================================================

/// Add or edit a role
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RoleInput {
    #[validate(length(min = 3, max = 64, message = "Role name must be 3-64 characters"))]
    pub name: String,

    #[validate(range(min = 1, max = 99, message = "Privilege must be between 1 and 99"))]
    pub privilege: i32,
}

impl RoleInput {
    pub fn new(name: impl Into<String>, privilege: i32) -> Self {
        Self {
            name: name.into(),
            privilege,
        }
    }
}

// ============================================================================
// Assignment Requests
// ============================================================================

/// Desired role for one member of a course; `RoleId::UNASSIGNED` removes the member
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct RoleAssignment {
    pub member_id: MemberId,
    pub role_id: RoleId,
}

impl RoleAssignment {
    pub fn new(member_id: MemberId, role_id: RoleId) -> Self {
        Self { member_id, role_id }
    }

    pub fn unassign(member_id: MemberId) -> Self {
        Self::new(member_id, RoleId::UNASSIGNED)
    }
}
