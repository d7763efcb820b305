//! Course service
//!
//! Handles course creation, details, listing, editing and deletion.

use tracing::{info, instrument, warn};

use tracker_core::entities::{Course, Role};
use tracker_core::{AccessAction, CourseId, DomainError, MemberId};

use crate::dto::{CourseDetailsResponse, CourseInput, CourseResponse};

use super::access::{AccessService, Target};
use super::context::ServiceContext;
use super::error::ServiceResult;
use super::validation::Validator;

/// Course service
pub struct CourseService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> CourseService<'a> {
    /// Create a new CourseService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Create a course and make the creator its owner
    ///
    /// The creator is granted the lowest-privilege role that passes the
    /// delete cutoff, in the same transaction as the course insert.
    #[instrument(skip(self, input))]
    pub async fn add_course(
        &self,
        requester: MemberId,
        input: CourseInput,
    ) -> ServiceResult<CourseResponse> {
        let creator = AccessService::new(self.ctx).requester(requester).await?;

        let fields = Validator::new(self.ctx).validate_course(input, None).await?;

        let owner = self.owner_role().await?;
        if owner.is_none() {
            warn!(
                owner_privilege = %self.ctx.owner_privilege(),
                "No role passes the delete cutoff; course created without an owner"
            );
        }

        let course = self
            .ctx
            .course_repo()
            .create(&fields, owner.map(|role| (role.id, creator.id)))
            .await?;

        info!(course_id = %course.id, name = %course.name, code = %course.code, owner = %creator.id, "Course created");

        Ok(CourseResponse::from(course))
    }

    /// Get course details with owner names and the requester's privilege
    #[instrument(skip(self))]
    pub async fn get_course(
        &self,
        requester: MemberId,
        course_id: CourseId,
    ) -> ServiceResult<CourseDetailsResponse> {
        let access = AccessService::new(self.ctx);
        access
            .authorize(requester, AccessAction::View, Target::Course(course_id))
            .await?;

        let course = self.find(course_id).await?;
        let member = access.requester(requester).await?;
        let privilege = access.effective_privilege(course_id, &member).await?;

        let owner_privilege = self.ctx.owner_privilege();
        let owners = self
            .ctx
            .association_repo()
            .roster(course_id)
            .await?
            .into_iter()
            .filter(|entry| !entry.is_unassigned() && entry.privilege >= owner_privilege)
            .map(|entry| entry.member_name)
            .collect();

        Ok(CourseDetailsResponse {
            course: CourseResponse::from(course),
            owners,
            privilege,
        })
    }

    /// List courses: every course for admins, otherwise those the requester holds a role in
    #[instrument(skip(self))]
    pub async fn list_courses(&self, requester: MemberId) -> ServiceResult<Vec<CourseResponse>> {
        let member = AccessService::new(self.ctx).requester(requester).await?;

        if member.is_admin {
            let courses = self.ctx.course_repo().list_all().await?;
            return Ok(courses.into_iter().map(CourseResponse::from).collect());
        }

        let access = AccessService::new(self.ctx);
        let mut visible = Vec::new();
        for course in self.ctx.course_repo().list_for_member(member.id).await? {
            let privilege = access.privilege_in(course.id, member.id).await?;
            if privilege.is_some_and(|p| self.ctx.cutoffs().allows(p, AccessAction::View)) {
                visible.push(CourseResponse::from(course));
            }
        }
        Ok(visible)
    }

    /// Edit a course's fields
    #[instrument(skip(self, input))]
    pub async fn update_course(
        &self,
        requester: MemberId,
        course_id: CourseId,
        input: CourseInput,
    ) -> ServiceResult<CourseResponse> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::Edit, Target::Course(course_id))
            .await?;

        let mut course = self.find(course_id).await?;
        let fields = Validator::new(self.ctx)
            .validate_course(input, Some(&course))
            .await?;

        course.apply(fields);
        self.ctx.course_repo().update(&course).await?;

        info!(%course_id, %requester, "Course updated");

        Ok(CourseResponse::from(course))
    }

    /// Delete a course and its associations
    #[instrument(skip(self))]
    pub async fn delete_course(&self, requester: MemberId, course_id: CourseId) -> ServiceResult<()> {
        AccessService::new(self.ctx)
            .authorize(requester, AccessAction::Delete, Target::Course(course_id))
            .await?;

        self.ctx.course_repo().delete(course_id).await?;

        info!(%course_id, %requester, "Course deleted");

        Ok(())
    }

    async fn find(&self, course_id: CourseId) -> ServiceResult<Course> {
        Ok(self
            .ctx
            .course_repo()
            .find_by_id(course_id)
            .await?
            .ok_or(DomainError::CourseNotFound(course_id))?)
    }

    /// Lowest-privilege role that passes the delete cutoff
    async fn owner_role(&self) -> ServiceResult<Option<Role>> {
        let owner_privilege = self.ctx.owner_privilege();
        let roles = self.ctx.role_repo().list_all().await?;

        Ok(roles
            .into_iter()
            .filter(|r| !r.is_unassigned() && r.privilege >= owner_privilege)
            .min_by_key(|r| r.privilege))
    }
}
