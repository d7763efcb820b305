//! Assignment service
//!
//! Grants, changes and revokes course roles. A requester only touches
//! members whose current privilege is at or below their ceiling, and only
//! hands out roles at or below it. Admins have a ceiling of 99; everyone
//! else gets their own privilege in the course minus one.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info, instrument, warn};

use tracker_core::entities::{AssociationChange, Member, RosterEntry};
use tracker_core::{AccessAction, CourseId, DomainError, MemberId, Privilege, RoleId};

use crate::dto::{AssignmentSummary, CourseResponse, RoleAssignment, RoleResponse, RosterResponse};

use super::access::{AccessService, Target};
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::role::RoleService;

/// Assignment service
pub struct AssignmentService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> AssignmentService<'a> {
    /// Create a new AssignmentService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Members the requester may reassign in the course and roles they may grant
    #[instrument(skip(self))]
    pub async fn roster(&self, requester: MemberId, course_id: CourseId) -> ServiceResult<RosterResponse> {
        let member = self.authorize(requester, course_id).await?;

        let course = self
            .ctx
            .course_repo()
            .find_by_id(course_id)
            .await?
            .ok_or(DomainError::CourseNotFound(course_id))?;

        let ceiling = self.ceiling(course_id, &member).await?;
        let members = self.touchable(course_id, ceiling).await?;
        let roles = RoleService::new(self.ctx)
            .grantable_roles(ceiling)
            .await?
            .into_iter()
            .map(RoleResponse::from)
            .collect();

        Ok(RosterResponse {
            course: CourseResponse::from(course),
            ceiling,
            members,
            roles,
        })
    }

    /// Apply a batch of role assignments to one course
    ///
    /// Every entry is checked before anything is written; one entry outside
    /// the requester's ceiling rejects the whole batch.
    #[instrument(skip(self, assignments), fields(count = assignments.len()))]
    pub async fn assign(
        &self,
        requester: MemberId,
        course_id: CourseId,
        assignments: &[RoleAssignment],
    ) -> ServiceResult<AssignmentSummary> {
        let member = self.authorize(requester, course_id).await?;

        if self.ctx.course_repo().find_by_id(course_id).await?.is_none() {
            return Err(DomainError::CourseNotFound(course_id).into());
        }

        let ceiling = self.ceiling(course_id, &member).await?;
        let current: HashMap<MemberId, RoleId> = self
            .touchable(course_id, ceiling)
            .await?
            .into_iter()
            .map(|entry| (entry.member_id, entry.role_id))
            .collect();
        let grantable: HashSet<RoleId> = RoleService::new(self.ctx)
            .grantable_roles(ceiling)
            .await?
            .into_iter()
            .map(|role| role.id)
            .collect();

        let mut seen = HashSet::new();
        let mut changes = Vec::with_capacity(assignments.len());
        let mut summary = AssignmentSummary::default();

        for assignment in assignments {
            let RoleAssignment { member_id, role_id } = *assignment;
            if !seen.insert(member_id) {
                return Err(ServiceError::validation(format!(
                    "member {member_id} is assigned more than once"
                )));
            }

            let Some(&held) = current.get(&member_id) else {
                warn!(%requester, %member_id, %ceiling, "Member outside assignment ceiling");
                return Err(DomainError::NotAuthorized.into());
            };
            if !grantable.contains(&role_id) {
                warn!(%requester, %role_id, %ceiling, "Role outside assignment ceiling");
                return Err(DomainError::NotAuthorized.into());
            }

            match plan_change(held, member_id, role_id) {
                Some(change) => {
                    match change {
                        AssociationChange::Grant { .. } => summary.added += 1,
                        AssociationChange::Change { .. } => summary.updated += 1,
                        AssociationChange::Revoke { .. } => summary.removed += 1,
                    }
                    changes.push(change);
                }
                None => summary.skipped += 1,
            }
        }

        if !changes.is_empty() {
            self.ctx.association_repo().apply(course_id, &changes).await?;
        }

        info!(
            %course_id,
            %requester,
            added = summary.added,
            updated = summary.updated,
            removed = summary.removed,
            skipped = summary.skipped,
            "Course roles assigned"
        );

        Ok(summary)
    }

    /// Highest privilege the requester may touch or grant in the course
    pub async fn ceiling(&self, course_id: CourseId, requester: &Member) -> ServiceResult<Privilege> {
        if requester.is_admin {
            return Ok(Privilege::ADMIN);
        }
        let own = AccessService::new(self.ctx)
            .privilege_in(course_id, requester.id)
            .await?
            .unwrap_or(Privilege::UNASSIGNED);
        Ok(own.ceiling())
    }

    async fn authorize(&self, requester: MemberId, course_id: CourseId) -> ServiceResult<Member> {
        let access = AccessService::new(self.ctx);
        access
            .authorize(requester, AccessAction::Assign, Target::Course(course_id))
            .await?;
        access.requester(requester).await
    }

    /// Roster entries at or below the ceiling, then unassigned members
    async fn touchable(&self, course_id: CourseId, ceiling: Privilege) -> ServiceResult<Vec<RosterEntry>> {
        let (unassigned, assigned): (Vec<RosterEntry>, Vec<RosterEntry>) = self
            .ctx
            .association_repo()
            .roster(course_id)
            .await?
            .into_iter()
            .partition(RosterEntry::is_unassigned);

        let mut members: Vec<RosterEntry> = assigned
            .into_iter()
            .filter(|entry| entry.privilege <= ceiling)
            .collect();
        debug!(touchable = members.len(), unassigned = unassigned.len(), "Roster split");
        members.extend(unassigned);
        Ok(members)
    }
}

/// Decide what one assignment does to the member's current row
///
/// No row plus a real role grants it; a row plus Unassigned revokes it; a
/// row plus a different role changes it. Anything else is a no-op.
fn plan_change(held: RoleId, member_id: MemberId, role_id: RoleId) -> Option<AssociationChange> {
    match (held.is_unassigned(), role_id.is_unassigned()) {
        (true, false) => Some(AssociationChange::Grant { member_id, role_id }),
        (false, true) => Some(AssociationChange::Revoke { member_id }),
        (false, false) if held != role_id => Some(AssociationChange::Change { member_id, role_id }),
        _ => None,
    }
}
