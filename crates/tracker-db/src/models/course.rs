//! Course database model

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database model for courses table
#[derive(Debug, Clone, FromRow)]
pub struct CourseModel {
    pub id: i64,
    pub name: String,
    pub code: String,
    /// `group` is reserved in SQL
    pub course_group: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
