//! Association database models

use sqlx::FromRow;

/// Database model for associations table
#[derive(Debug, Clone, Copy, FromRow)]
pub struct AssociationModel {
    pub course_id: i64,
    pub role_id: i64,
    pub member_id: i64,
}

/// One member joined against their (optional) role in a course
#[derive(Debug, Clone, FromRow)]
pub struct RosterRowModel {
    pub member_id: i64,
    pub member_name: String,
    pub is_admin: bool,
    pub role_id: Option<i64>,
    pub role_name: Option<String>,
    pub privilege: Option<i32>,
}

impl RosterRowModel {
    /// Check if the member has no association row in the course
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.role_id.is_none()
    }
}
