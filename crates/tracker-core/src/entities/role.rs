//! Role entity - a named privilege level that members hold per course

use crate::error::DomainError;
use crate::validation::validate_text;
use crate::value_objects::{Privilege, RoleId};

/// Name of the reserved role with id 1
pub const UNASSIGNED_ROLE_NAME: &str = "Unassigned";

/// Role entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
    pub id: RoleId,
    pub name: String,
    pub privilege: Privilege,
}

impl Role {
    /// Create a role, enforcing the reserved-id and privilege-range rules
    pub fn new(id: RoleId, name: impl Into<String>, privilege: Privilege) -> Result<Self, DomainError> {
        let name = name.into();
        validate_role_identity(Some(id), &name, privilege)?;
        Ok(Self {
            id,
            name,
            privilege,
        })
    }

    /// The reserved "Unassigned" role
    pub fn unassigned() -> Self {
        Self {
            id: RoleId::UNASSIGNED,
            name: UNASSIGNED_ROLE_NAME.to_string(),
            privilege: Privilege::UNASSIGNED,
        }
    }

    /// Check if this is the Unassigned sentinel role
    #[inline]
    pub fn is_unassigned(&self) -> bool {
        self.id.is_unassigned() || is_unassigned_name(&self.name)
    }

    /// Update name and privilege, re-checking the invariants
    pub fn rename(&mut self, name: String, privilege: Privilege) -> Result<(), DomainError> {
        validate_role_identity(Some(self.id), &name, privilege)?;
        self.name = name;
        self.privilege = privilege;
        Ok(())
    }
}

/// Validated role fields without an id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRole {
    /// Explicit id, only used when seeding the Unassigned role
    pub id: Option<RoleId>,
    pub name: String,
    pub privilege: Privilege,
}

impl NewRole {
    pub fn new(name: impl Into<String>, privilege: Privilege) -> Result<Self, DomainError> {
        Self::build(None, name.into(), privilege)
    }

    pub fn with_id(id: RoleId, name: impl Into<String>, privilege: Privilege) -> Result<Self, DomainError> {
        Self::build(Some(id), name.into(), privilege)
    }

    fn build(id: Option<RoleId>, name: String, privilege: Privilege) -> Result<Self, DomainError> {
        let name = name.trim().to_string();
        validate_text("name", &name)?;
        validate_role_identity(id, &name, privilege)?;
        Ok(Self {
            id,
            name,
            privilege,
        })
    }

    pub fn into_role(self, id: RoleId) -> Role {
        Role {
            id,
            name: self.name,
            privilege: self.privilege,
        }
    }
}

/// Case-insensitive check for the reserved role name
pub fn is_unassigned_name(name: &str) -> bool {
    name.trim().eq_ignore_ascii_case(UNASSIGNED_ROLE_NAME)
}

/// Role id 1 belongs to "Unassigned"; every other role needs privilege 1..=99
fn validate_role_identity(
    id: Option<RoleId>,
    name: &str,
    privilege: Privilege,
) -> Result<(), DomainError> {
    let unassigned = is_unassigned_name(name);
    if id.is_some_and(RoleId::is_unassigned) && !unassigned {
        return Err(DomainError::ReservedRoleId);
    }
    if !unassigned && !privilege.is_grantable() {
        return Err(DomainError::InvalidPrivilege(privilege.level()));
    }
    Ok(())
}
