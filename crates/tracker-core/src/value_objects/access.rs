//! Privilege levels and per-action cutoffs
//!
//! A role's privilege is an integer; higher values permit more destructive
//! actions. Privilege belongs to the (course, member) edge, so the same member
//! can hold different levels in different courses.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;

/// Privilege level attached to a role
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Privilege(i32);

impl Privilege {
    /// Level of the reserved "Unassigned" role
    pub const UNASSIGNED: Privilege = Privilege(0);
    /// Lowest level a granted role may carry
    pub const MIN_GRANTED: Privilege = Privilege(1);
    /// Highest level a granted role may carry
    pub const MAX_GRANTED: Privilege = Privilege(99);
    /// Effective level of an administrator
    pub const ADMIN: Privilege = Privilege(99);

    #[inline]
    pub const fn new(level: i32) -> Self {
        Self(level)
    }

    #[inline]
    pub const fn level(self) -> i32 {
        self.0
    }

    /// Check if the level is valid for a granted (non-Unassigned) role
    #[inline]
    pub fn is_grantable(self) -> bool {
        (Self::MIN_GRANTED..=Self::MAX_GRANTED).contains(&self)
    }

    /// The highest level a holder of this privilege may hand out to others
    #[inline]
    pub fn ceiling(self) -> Privilege {
        Privilege(self.0.saturating_sub(1))
    }
}

impl fmt::Display for Privilege {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i32> for Privilege {
    fn from(level: i32) -> Self {
        Self(level)
    }
}

/// Action a requester wants to perform on a target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    View,
    Assign,
    Edit,
    Delete,
}

impl AccessAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Assign => "assign",
            Self::Edit => "edit",
            Self::Delete => "delete",
        }
    }
}

impl fmt::Display for AccessAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Minimum privilege required for each course action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessCutoffs {
    pub view: Privilege,
    pub assign: Privilege,
    pub edit: Privilege,
    pub delete: Privilege,
}

impl Default for AccessCutoffs {
    fn default() -> Self {
        Self {
            view: Privilege::new(10),
            assign: Privilege::new(10),
            edit: Privilege::new(20),
            delete: Privilege::new(30),
        }
    }
}

impl AccessCutoffs {
    /// Build cutoffs, rejecting values that are not monotonic
    ///
    /// Delete must require strictly more than edit, and edit strictly more
    /// than view and assign.
    pub fn new(
        view: Privilege,
        assign: Privilege,
        edit: Privilege,
        delete: Privilege,
    ) -> Result<Self, DomainError> {
        let cutoffs = Self {
            view,
            assign,
            edit,
            delete,
        };
        cutoffs.validate()?;
        Ok(cutoffs)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        for cutoff in [self.view, self.assign] {
            if !cutoff.is_grantable() {
                return Err(DomainError::InvalidPrivilege(cutoff.level()));
            }
        }
        if self.view >= self.edit || self.assign >= self.edit || self.edit >= self.delete {
            return Err(DomainError::Validation(format!(
                "privilege cutoffs must be monotonic (view {}, assign {}, edit {}, delete {})",
                self.view, self.assign, self.edit, self.delete
            )));
        }
        if self.delete > Privilege::MAX_GRANTED {
            return Err(DomainError::InvalidPrivilege(self.delete.level()));
        }
        Ok(())
    }

    /// Minimum privilege required for an action
    #[inline]
    pub fn required(&self, action: AccessAction) -> Privilege {
        match action {
            AccessAction::View => self.view,
            AccessAction::Assign => self.assign,
            AccessAction::Edit => self.edit,
            AccessAction::Delete => self.delete,
        }
    }

    /// Check if a privilege passes the cutoff for an action
    #[inline]
    pub fn allows(&self, privilege: Privilege, action: AccessAction) -> bool {
        privilege >= self.required(action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cutoffs() {
        let cutoffs = AccessCutoffs::default();
        assert!(cutoffs.validate().is_ok());
        assert_eq!(cutoffs.required(AccessAction::View).level(), 10);
        assert_eq!(cutoffs.required(AccessAction::Edit).level(), 20);
        assert_eq!(cutoffs.required(AccessAction::Delete).level(), 30);
    }

    #[test]
    fn test_monotonic_allows() {
        let cutoffs = AccessCutoffs::default();
        for level in 0..=99 {
            let p = Privilege::new(level);
            if cutoffs.allows(p, AccessAction::Delete) {
                assert!(cutoffs.allows(p, AccessAction::Edit));
            }
            if cutoffs.allows(p, AccessAction::Edit) {
                assert!(cutoffs.allows(p, AccessAction::View));
                assert!(cutoffs.allows(p, AccessAction::Assign));
            }
        }
    }

    #[test]
    fn test_rejects_non_monotonic() {
        let result = AccessCutoffs::new(
            Privilege::new(10),
            Privilege::new(10),
            Privilege::new(30),
            Privilege::new(30),
        );
        assert!(result.is_err());

        let result = AccessCutoffs::new(
            Privilege::new(25),
            Privilege::new(10),
            Privilege::new(20),
            Privilege::new(30),
        );
        assert!(result.is_err());

        let result = AccessCutoffs::new(
            Privilege::new(20),
            Privilege::new(10),
            Privilege::new(20),
            Privilege::new(30),
        );
        assert!(result.is_err());

        let result = AccessCutoffs::new(
            Privilege::new(10),
            Privilege::new(20),
            Privilege::new(20),
            Privilege::new(30),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_negative_assign() {
        let result = AccessCutoffs::new(
            Privilege::new(10),
            Privilege::new(-5),
            Privilege::new(20),
            Privilege::new(30),
        );
        assert!(matches!(result, Err(DomainError::InvalidPrivilege(-5))));
    }

    #[test]
    fn test_rejects_zero_view() {
        let result = AccessCutoffs::new(
            Privilege::UNASSIGNED,
            Privilege::new(10),
            Privilege::new(20),
            Privilege::new(30),
        );
        assert!(matches!(result, Err(DomainError::InvalidPrivilege(0))));
    }

    #[test]
    fn test_ceiling() {
        assert_eq!(Privilege::new(30).ceiling(), Privilege::new(29));
        assert_eq!(Privilege::UNASSIGNED.ceiling(), Privilege::new(-1));
    }

    #[test]
    fn test_grantable_range() {
        assert!(!Privilege::UNASSIGNED.is_grantable());
        assert!(Privilege::new(1).is_grantable());
        assert!(Privilege::new(99).is_grantable());
        assert!(!Privilege::new(100).is_grantable());
    }
}
