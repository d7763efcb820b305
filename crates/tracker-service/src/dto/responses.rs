//! Response DTOs for use-case outputs
//!
//! All response DTOs implement `Serialize` so an outer layer can render them
//! as JSON or templates. Password hashes never appear here.

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracker_core::{CourseId, MemberId, Privilege, RoleId, RosterEntry};

// ============================================================================
// Member Responses
// ============================================================================

/// Member as shown to admins and to the member themselves
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MemberResponse {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============================================================================
// Course Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseResponse {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Course with the names of members whose role passes the delete cutoff
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CourseDetailsResponse {
    #[serde(flatten)]
    pub course: CourseResponse,
    pub owners: Vec<String>,
    /// Requester's own privilege in the course (99 for admins)
    pub privilege: Privilege,
}

// ============================================================================
// Role Responses
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleResponse {
    pub id: RoleId,
    pub name: String,
    pub privilege: Privilege,
}

// ============================================================================
// Assignment Responses
// ============================================================================

/// What a requester may change on a course roster
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RosterResponse {
    pub course: CourseResponse,
    /// Highest privilege the requester may touch or grant
    pub ceiling: Privilege,
    /// Members at or below the ceiling, followed by unassigned members
    pub members: Vec<RosterEntry>,
    /// Grantable roles, highest privilege first, Unassigned last
    pub roles: Vec<RoleResponse>,
}

/// Counts of changes applied by one assignment batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AssignmentSummary {
    pub added: usize,
    pub updated: usize,
    pub removed: usize,
    pub skipped: usize,
}

impl AssignmentSummary {
    /// Number of rows written
    pub fn changed(&self) -> usize {
        self.added + self.updated + self.removed
    }
}

// ============================================================================
// Seeding
// ============================================================================

/// What `seed_defaults` created on this run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SeedReport {
    pub roles_created: Vec<String>,
    pub admin_created: Option<String>,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        self.roles_created.is_empty() && self.admin_created.is_none()
    }
}
