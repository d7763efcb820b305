//! Member service
//!
//! Handles member accounts: admin-managed add/edit/delete, self-service
//! profile updates and password verification.

use tracing::{info, instrument, warn};

use tracker_common::AppError;
use tracker_core::entities::NewMember;
use tracker_core::{AccessAction, DomainError, MemberId};

use crate::dto::{MemberInput, MemberResponse, ProfileInput};

use super::access::{AccessService, Target};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::validation::Validator;

/// Member service
pub struct MemberService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MemberService<'a> {
    /// Create a new MemberService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Add a member (admin only)
    #[instrument(skip(self, input))]
    pub async fn add_member(
        &self,
        requester: MemberId,
        input: MemberInput,
    ) -> ServiceResult<MemberResponse> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::Edit, Target::Members)
            .await?;

        let valid = Validator::new(self.ctx).validate_member(input, None).await?;
        let password = valid.password.as_deref().ok_or(DomainError::InvalidPassword)?;
        let password_hash = self.ctx.password_service().hash(password)?;

        let new_member = NewMember::new(valid.name, valid.email, password_hash, valid.is_admin)?;
        let member = self.ctx.member_repo().create(&new_member).await?;

        info!(member_id = %member.id, name = %member.name, is_admin = member.is_admin, "Member added");

        Ok(MemberResponse::from(member))
    }

    /// Get a member (admin or the member themselves)
    #[instrument(skip(self))]
    pub async fn get_member(
        &self,
        requester: MemberId,
        member_id: MemberId,
    ) -> ServiceResult<MemberResponse> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::View, Target::Member(member_id))
            .await?;

        let member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(member_id))?;

        Ok(MemberResponse::from(member))
    }

    /// List all members (admin only)
    #[instrument(skip(self))]
    pub async fn list_members(&self, requester: MemberId) -> ServiceResult<Vec<MemberResponse>> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::View, Target::Members)
            .await?;

        let members = self.ctx.member_repo().list_all().await?;

        Ok(members.into_iter().map(MemberResponse::from).collect())
    }

    /// Edit a member's name, email, admin flag and optionally password (admin only)
    #[instrument(skip(self, input))]
    pub async fn update_member(
        &self,
        requester: MemberId,
        member_id: MemberId,
        input: MemberInput,
    ) -> ServiceResult<MemberResponse> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::Edit, Target::Members)
            .await?;

        let mut member = self
            .ctx
            .member_repo()
            .find_by_id(member_id)
            .await?
            .ok_or(DomainError::MemberNotFound(member_id))?;

        let valid = Validator::new(self.ctx)
            .validate_member(input, Some(&member))
            .await?;

        member.set_name(valid.name);
        member.set_email(valid.email);
        member.set_admin(valid.is_admin);
        if let Some(password) = valid.password.as_deref() {
            member.set_password_hash(self.ctx.password_service().hash(password)?);
        }

        self.ctx.member_repo().update(&member).await?;

        info!(member_id = %member.id, %requester, "Member updated");

        Ok(MemberResponse::from(member))
    }

    /// Change the requester's own email and optionally password
    #[instrument(skip(self, input))]
    pub async fn update_profile(
        &self,
        requester: MemberId,
        input: ProfileInput,
    ) -> ServiceResult<MemberResponse> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::Edit, Target::Member(requester))
            .await?;

        let mut member = self
            .ctx
            .member_repo()
            .find_by_id(requester)
            .await?
            .ok_or(DomainError::MemberNotFound(requester))?;

        let valid = Validator::new(self.ctx)
            .validate_profile(input, &member)
            .await?;

        member.set_email(valid.email);
        if let Some(password) = valid.password.as_deref() {
            member.set_password_hash(self.ctx.password_service().hash(password)?);
        }

        self.ctx.member_repo().update(&member).await?;

        info!(member_id = %member.id, "Profile updated");

        Ok(MemberResponse::from(member))
    }

    /// Delete a member and their associations (admin only, never oneself)
    #[instrument(skip(self))]
    pub async fn delete_member(&self, requester: MemberId, member_id: MemberId) -> ServiceResult<()> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::Delete, Target::Member(member_id))
            .await?;

        self.ctx.member_repo().delete(member_id).await?;

        info!(%member_id, %requester, "Member deleted");

        Ok(())
    }

    /// Check an email and password pair against the stored hash
    ///
    /// Unknown email and wrong password fail the same way.
    #[instrument(skip(self, password))]
    pub async fn verify_password(&self, email: &str, password: &str) -> ServiceResult<MemberResponse> {
        let Some(member) = self.ctx.member_repo().find_by_email(email.trim()).await? else {
            warn!("Password check for unknown email");
            return Err(AppError::InvalidCredentials.into());
        };

        if let Err(e) = self
            .ctx
            .password_service()
            .verify_or_error(password, &member.password_hash)
        {
            warn!(member_id = %member.id, "Password check failed");
            return Err(e.into());
        }

        Ok(MemberResponse::from(member))
    }
}
