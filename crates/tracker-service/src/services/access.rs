//! Access-control evaluator
//!
//! Decides per call whether a requester may act on a target. Nothing is
//! cached: the requester's admin flag and their association row are read
//! from the store every time.
//!
//! Order of checks:
//! 1. Unknown requester: deny.
//! 2. Deleting oneself: `SelfAction`, admins included.
//! 3. Admin: allow.
//! 4. Course: the requester's role privilege in that course must reach the
//!    action's cutoff. No association row means deny.
//! 5. Member: view and edit of one's own record only.
//! 6. Roles and member lists: admin only.
//!
//! Denials never depend on whether the target exists.

use std::fmt;

use tracing::{debug, instrument, warn};

use tracker_core::entities::Member;
use tracker_core::{AccessAction, CourseId, DomainError, MemberId, Privilege, RoleId};

use super::context::ServiceContext;
use super::error::ServiceResult;

/// What an action is aimed at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    Course(CourseId),
    Member(MemberId),
    /// The member list as a whole (list, add)
    Members,
    Role(RoleId),
    /// The role list as a whole (list, add)
    Roles,
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Course(id) => write!(f, "course {id}"),
            Self::Member(id) => write!(f, "member {id}"),
            Self::Members => f.write_str("members"),
            Self::Role(id) => write!(f, "role {id}"),
            Self::Roles => f.write_str("roles"),
        }
    }
}

/// Outcome of one access check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
    /// Requester tried to delete their own member record
    SelfAction,
}

impl Decision {
    #[inline]
    pub fn is_allowed(self) -> bool {
        self == Self::Allow
    }

    /// Turn a denial into the matching error
    pub fn into_result(self) -> Result<(), DomainError> {
        match self {
            Self::Allow => Ok(()),
            Self::Deny => Err(DomainError::NotAuthorized),
            Self::SelfAction => Err(DomainError::SelfAction),
        }
    }
}

/// Access-control service
pub struct AccessService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AccessService<'a> {
    /// Create a new AccessService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Check if the requester may view the target
    pub async fn can_view(&self, requester: MemberId, target: Target) -> ServiceResult<bool> {
        Ok(self.decide(requester, AccessAction::View, target).await?.is_allowed())
    }

    /// Check if the requester may change role assignments on the target
    pub async fn can_assign(&self, requester: MemberId, target: Target) -> ServiceResult<bool> {
        Ok(self.decide(requester, AccessAction::Assign, target).await?.is_allowed())
    }

    /// Check if the requester may edit the target
    pub async fn can_edit(&self, requester: MemberId, target: Target) -> ServiceResult<bool> {
        Ok(self.decide(requester, AccessAction::Edit, target).await?.is_allowed())
    }

    /// Check if the requester may delete the target
    pub async fn can_delete(&self, requester: MemberId, target: Target) -> ServiceResult<bool> {
        Ok(self.decide(requester, AccessAction::Delete, target).await?.is_allowed())
    }

    /// Require permission, returning `NotAuthorized` or `SelfAction` on denial
    pub async fn authorize(
        &self,
        requester: MemberId,
        action: AccessAction,
        target: Target,
    ) -> ServiceResult<()> {
        self.decide(requester, action, target)
            .await?
            .into_result()
            .map_err(Into::into)
    }

    /// Evaluate one request
    #[instrument(skip(self))]
    pub async fn decide(
        &self,
        requester: MemberId,
        action: AccessAction,
        target: Target,
    ) -> ServiceResult<Decision> {
        let Some(member) = self.ctx.member_repo().find_by_id(requester).await? else {
            warn!(%requester, %action, %target, "Access denied: unknown requester");
            return Ok(Decision::Deny);
        };

        let decision = self.evaluate(&member, action, target).await?;
        match decision {
            Decision::Allow => {
                debug!(%requester, %action, %target, "Access granted");
            }
            Decision::Deny => {
                warn!(%requester, %action, %target, "Access denied");
            }
            Decision::SelfAction => {
                warn!(%requester, "Access denied: self-deletion");
            }
        }
        Ok(decision)
    }

    /// Evaluate a request for an already loaded requester
    pub async fn evaluate(
        &self,
        requester: &Member,
        action: AccessAction,
        target: Target,
    ) -> ServiceResult<Decision> {
        if action == AccessAction::Delete && target == Target::Member(requester.id) {
            return Ok(Decision::SelfAction);
        }
        if requester.is_admin {
            return Ok(Decision::Allow);
        }

        let allowed = match target {
            Target::Course(course_id) => {
                match self.privilege_in(course_id, requester.id).await? {
                    Some(privilege) => self.ctx.cutoffs().allows(privilege, action),
                    None => false,
                }
            }
            Target::Member(member_id) => {
                member_id == requester.id
                    && matches!(action, AccessAction::View | AccessAction::Edit)
            }
            Target::Members | Target::Role(_) | Target::Roles => false,
        };

        Ok(if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        })
    }

    /// Privilege of the role the member holds in the course, if any
    #[instrument(skip(self))]
    pub async fn privilege_in(
        &self,
        course_id: CourseId,
        member_id: MemberId,
    ) -> ServiceResult<Option<Privilege>> {
        Ok(self
            .ctx
            .association_repo()
            .privilege_of(course_id, member_id)
            .await?)
    }

    /// Effective privilege in a course: `ADMIN` for admins, `UNASSIGNED` without a row
    pub async fn effective_privilege(
        &self,
        course_id: CourseId,
        requester: &Member,
    ) -> ServiceResult<Privilege> {
        if requester.is_admin {
            return Ok(Privilege::ADMIN);
        }
        Ok(self
            .privilege_in(course_id, requester.id)
            .await?
            .unwrap_or(Privilege::UNASSIGNED))
    }

    /// Load the requester, treating an unknown id as a denial
    pub async fn requester(&self, requester: MemberId) -> ServiceResult<Member> {
        match self.ctx.member_repo().find_by_id(requester).await? {
            Some(member) => Ok(member),
            None => {
                warn!(%requester, "Unknown requester");
                Err(DomainError::NotAuthorized.into())
            }
        }
    }
}
