//! Member entity - represents a tracker account

use chrono::{DateTime, Utc};
use std::fmt;

use crate::error::DomainError;
use crate::validation::{validate_email, validate_member_name};
use crate::value_objects::MemberId;

/// Member entity
///
/// Only the password hash is ever held; plaintext passwords never reach this type.
#[derive(Clone, PartialEq, Eq)]
pub struct Member {
    pub id: MemberId,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Member {
    /// Check if this member is the given id
    #[inline]
    pub fn is(&self, id: MemberId) -> bool {
        self.id == id
    }

    /// Update the member name
    pub fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    /// Update the email address
    pub fn set_email(&mut self, email: String) {
        self.email = email;
        self.updated_at = Utc::now();
    }

    /// Replace the password hash
    pub fn set_password_hash(&mut self, password_hash: String) {
        self.password_hash = password_hash;
        self.updated_at = Utc::now();
    }

    /// Grant or revoke administrator status
    pub fn set_admin(&mut self, is_admin: bool) {
        self.is_admin = is_admin;
        self.updated_at = Utc::now();
    }
}

impl fmt::Debug for Member {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Member")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password_hash", &"<redacted>")
            .field("is_admin", &self.is_admin)
            .finish()
    }
}

/// A member that has passed format validation but has no id yet
#[derive(Clone, PartialEq, Eq)]
pub struct NewMember {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

impl NewMember {
    /// Create a new member record, validating name and email format
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
        is_admin: bool,
    ) -> Result<Self, DomainError> {
        let name = name.into().trim().to_string();
        let email = email.into().trim().to_string();
        let password_hash = password_hash.into();

        validate_member_name(&name)?;
        validate_email(&email)?;
        if password_hash.is_empty() {
            return Err(DomainError::InvalidPassword);
        }

        Ok(Self {
            name,
            email,
            password_hash,
            is_admin,
        })
    }

    /// Materialize the stored member once the store has assigned an id
    pub fn into_member(self, id: MemberId, now: DateTime<Utc>) -> Member {
        Member {
            id,
            name: self.name,
            email: self.email,
            password_hash: self.password_hash,
            is_admin: self.is_admin,
            created_at: now,
            updated_at: now,
        }
    }
}

impl fmt::Debug for NewMember {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewMember")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("is_admin", &self.is_admin)
            .finish_non_exhaustive()
    }
}
