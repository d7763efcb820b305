//! Role service
//!
//! Handles role creation and management. Roles are global; a role only
//! carries meaning once an association grants it in a course.

use tracing::{info, instrument, warn};

use tracker_core::entities::Role;
use tracker_core::{AccessAction, DomainError, MemberId, Privilege, RoleId};

use crate::dto::{RoleInput, RoleResponse};

use super::access::{AccessService, Target};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::validation::Validator;

/// Role service
pub struct RoleService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> RoleService<'a> {
    /// Create a new RoleService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a new role
    #[instrument(skip(self, input))]
    pub async fn add_role(&self, requester: MemberId, input: RoleInput) -> ServiceResult<RoleResponse> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::Edit, Target::Roles)
            .await?;
        self.ensure_unlocked()?;

        let fields = Validator::new(self.ctx).validate_role(input, None).await?;
        let role = self.ctx.role_repo().create(&fields).await?;

        info!(role_id = %role.id, name = %role.name, privilege = %role.privilege, "Role created");

        Ok(RoleResponse::from(role))
    }

    /// Get role by ID
    #[instrument(skip(self))]
    pub async fn get_role(&self, requester: MemberId, role_id: RoleId) -> ServiceResult<RoleResponse> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::View, Target::Role(role_id))
            .await?;

        let role = self.find(role_id).await?;

        Ok(RoleResponse::from(role))
    }

    /// List every role, Unassigned included, by ascending privilege
    #[instrument(skip(self))]
    pub async fn list_roles(&self, requester: MemberId) -> ServiceResult<Vec<RoleResponse>> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::View, Target::Roles)
            .await?;

        let roles = self.ctx.role_repo().list_all().await?;

        Ok(roles.into_iter().map(RoleResponse::from).collect())
    }

    /// Rename a role or change its privilege
    #[instrument(skip(self, input))]
    pub async fn update_role(
        &self,
        requester: MemberId,
        role_id: RoleId,
        input: RoleInput,
    ) -> ServiceResult<RoleResponse> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::Edit, Target::Role(role_id))
            .await?;
        self.ensure_unlocked()?;

        let mut role = self.find(role_id).await?;
        let fields = Validator::new(self.ctx)
            .validate_role(input, Some(&role))
            .await?;

        let old_privilege = role.privilege;
        role.rename(fields.name, fields.privilege)?;
        self.ctx.role_repo().update(&role).await?;

        info!(
            role_id = %role.id,
            name = %role.name,
            old_privilege = %old_privilege,
            privilege = %role.privilege,
            "Role updated"
        );

        Ok(RoleResponse::from(role))
    }

    /// Delete a role and every association granting it
    #[instrument(skip(self))]
    pub async fn delete_role(&self, requester: MemberId, role_id: RoleId) -> ServiceResult<()> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::Delete, Target::Role(role_id))
            .await?;
        self.ensure_unlocked()?;

        let role = self.find(role_id).await?;
        if role.is_unassigned() {
            return Err(DomainError::ReservedRoleId.into());
        }

        self.ctx.role_repo().delete(role_id).await?;

        info!(%role_id, name = %role.name, "Role deleted");

        Ok(())
    }

    /// Roles a holder of `ceiling` may hand out, highest first, Unassigned last
    pub async fn grantable_roles(&self, ceiling: Privilege) -> ServiceResult<Vec<Role>> {
        let mut roles: Vec<Role> = self
            .ctx
            .role_repo()
            .list_all()
            .await?
            .into_iter()
            .filter(|r| !r.is_unassigned() && r.privilege <= ceiling)
            .collect();
        roles.sort_by(|a, b| b.privilege.cmp(&a.privilege));
        roles.push(Role::unassigned());
        Ok(roles)
    }

    async fn find(&self, role_id: RoleId) -> ServiceResult<Role> {
        Ok(self
            .ctx
            .role_repo()
            .find_by_id(role_id)
            .await?
            .ok_or(DomainError::RoleNotFound(role_id))?)
    }

    fn ensure_unlocked(&self) -> ServiceResult<()> {
        if self.ctx.roles_locked() {
            warn!("Role change rejected, roles are locked");
            return Err(DomainError::RolesLocked.into());
        }
        Ok(())
    }
}
