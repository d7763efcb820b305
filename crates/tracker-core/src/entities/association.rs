//! Association entity - "member X holds role Y in course Z"
//!
//! Privilege is a property of this edge, not of the member or the course.
//! A member holds at most one role per course, and the Unassigned role is
//! never stored: no row means unassigned.

use serde::Serialize;

use crate::error::DomainError;
use crate::value_objects::{CourseId, MemberId, Privilege, RoleId};

/// Ternary join row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Association {
    pub course_id: CourseId,
    pub role_id: RoleId,
    pub member_id: MemberId,
}

impl Association {
    /// Create an association; the Unassigned role cannot be persisted
    pub fn new(course_id: CourseId, role_id: RoleId, member_id: MemberId) -> Result<Self, DomainError> {
        if role_id.is_unassigned() {
            return Err(DomainError::ReservedRoleId);
        }
        Ok(Self {
            course_id,
            role_id,
            member_id,
        })
    }

    /// Check if this row links the given course and member
    #[inline]
    pub fn links(&self, course_id: CourseId, member_id: MemberId) -> bool {
        self.course_id == course_id && self.member_id == member_id
    }
}

/// One step of a batched assignment, applied inside a single transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssociationChange {
    /// Insert a new row for a member that had none
    Grant { member_id: MemberId, role_id: RoleId },
    /// Replace the role on an existing row
    Change { member_id: MemberId, role_id: RoleId },
    /// Delete the row, returning the member to Unassigned
    Revoke { member_id: MemberId },
}

impl AssociationChange {
    pub fn member_id(&self) -> MemberId {
        match self {
            Self::Grant { member_id, .. }
            | Self::Change { member_id, .. }
            | Self::Revoke { member_id } => *member_id,
        }
    }
}

/// A member's standing in one course, as listed on the course roster
///
/// Members without a row appear with the Unassigned role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterEntry {
    pub member_id: MemberId,
    pub member_name: String,
    pub is_admin: bool,
    pub role_id: RoleId,
    pub role_name: String,
    pub privilege: Privilege,
}

impl RosterEntry {
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.role_id.is_unassigned()
    }
}
