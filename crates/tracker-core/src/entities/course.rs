//! Course entity

use chrono::{DateTime, Utc};

use crate::error::DomainError;
use crate::validation::{normalize_optional, validate_description, validate_text};
use crate::value_objects::CourseId;

/// Course entity
///
/// A course may share its name or its code with another course, never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: CourseId,
    pub name: String,
    pub code: String,
    pub group: Option<String>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// Check if this course has the given (name, code) pair, ignoring case
    pub fn has_name_and_code(&self, name: &str, code: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) && self.code.eq_ignore_ascii_case(code)
    }

    /// Replace the editable fields
    pub fn apply(&mut self, fields: NewCourse) {
        self.name = fields.name;
        self.code = fields.code;
        self.group = fields.group;
        self.description = fields.description;
        self.updated_at = Utc::now();
    }
}

/// Validated course fields without an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub name: String,
    pub code: String,
    pub group: Option<String>,
    pub description: Option<String>,
}

impl NewCourse {
    /// Create course fields, validating format and normalizing blank optionals
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        group: Option<String>,
        description: Option<String>,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        let code = code.into().trim().to_string();
        let group = normalize_optional(group);
        let description = normalize_optional(description);

        validate_text("name", &name)?;
        validate_text("code", &code)?;
        if let Some(group) = &group {
            validate_text("group", group)?;
        }
        if let Some(description) = &description {
            validate_description(description)?;
        }

        Ok(Self {
            name,
            code,
            group,
            description,
        })
    }

    /// Materialize the stored course once the store has assigned an id
    pub fn into_course(self, id: CourseId, now: DateTime<Utc>) -> Course {
        Course {
            id,
            name: self.name,
            code: self.code,
            group: self.group,
            description: self.description,
            created_at: now,
            updated_at: now,
        }
    }
}
