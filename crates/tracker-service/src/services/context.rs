//! Service context - dependency container for services
//!
//! Holds the entity store handles, the password service and the access
//! settings every use case reads. There is no global state; callers build one
//! context and hand a reference to each service.

use std::sync::Arc;

use tracker_common::{AppConfig, PasswordService};
use tracker_core::traits::{
    AssociationRepository, CourseRepository, MemberRepository, RoleRepository,
};
use tracker_core::{AccessCutoffs, Privilege};
use tracker_db::{
    MemoryStore, PgAssociationRepository, PgCourseRepository, PgMemberRepository, PgPool,
    PgRoleRepository,
};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
#[derive(Clone)]
pub struct ServiceContext {
    // Repositories
    member_repo: Arc<dyn MemberRepository>,
    course_repo: Arc<dyn CourseRepository>,
    role_repo: Arc<dyn RoleRepository>,
    association_repo: Arc<dyn AssociationRepository>,

    // Services
    password_service: PasswordService,

    // Access settings
    cutoffs: AccessCutoffs,
    roles_locked: bool,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(
        member_repo: Arc<dyn MemberRepository>,
        course_repo: Arc<dyn CourseRepository>,
        role_repo: Arc<dyn RoleRepository>,
        association_repo: Arc<dyn AssociationRepository>,
        cutoffs: AccessCutoffs,
        roles_locked: bool,
    ) -> Self {
        Self {
            member_repo,
            course_repo,
            role_repo,
            association_repo,
            password_service: PasswordService::new(),
            cutoffs,
            roles_locked,
        }
    }

    /// Context backed by PostgreSQL repositories sharing one pool
    pub fn postgres(pool: PgPool, config: &AppConfig) -> Self {
        Self::new(
            Arc::new(PgMemberRepository::new(pool.clone())),
            Arc::new(PgCourseRepository::new(pool.clone())),
            Arc::new(PgRoleRepository::new(pool.clone())),
            Arc::new(PgAssociationRepository::new(pool)),
            config.access,
            config.roles.locked,
        )
    }

    /// Context backed by a shared in-memory store with default cutoffs
    pub fn in_memory(store: Arc<MemoryStore>) -> Self {
        Self::new(
            store.clone(),
            store.clone(),
            store.clone(),
            store,
            AccessCutoffs::default(),
            false,
        )
    }

    /// Replace the privilege cutoffs
    ///
    /// # Errors
    /// Returns a validation error if the cutoffs are not monotonic
    pub fn with_cutoffs(mut self, cutoffs: AccessCutoffs) -> ServiceResult<Self> {
        cutoffs.validate()?;
        self.cutoffs = cutoffs;
        Ok(self)
    }

    /// Enable or disable role add/edit/delete
    pub fn with_roles_locked(mut self, locked: bool) -> Self {
        self.roles_locked = locked;
        self
    }

    // === Repositories ===

    /// Get the member repository
    pub fn member_repo(&self) -> &dyn MemberRepository {
        self.member_repo.as_ref()
    }

    /// Get the course repository
    pub fn course_repo(&self) -> &dyn CourseRepository {
        self.course_repo.as_ref()
    }

    /// Get the role repository
    pub fn role_repo(&self) -> &dyn RoleRepository {
        self.role_repo.as_ref()
    }

    /// Get the association repository
    pub fn association_repo(&self) -> &dyn AssociationRepository {
        self.association_repo.as_ref()
    }

    // === Services ===

    /// Get the password service
    pub fn password_service(&self) -> &PasswordService {
        &self.password_service
    }

    // === Access settings ===

    /// Per-action privilege cutoffs
    pub fn cutoffs(&self) -> &AccessCutoffs {
        &self.cutoffs
    }

    /// Privilege a course creator is granted, the delete cutoff
    pub fn owner_privilege(&self) -> Privilege {
        self.cutoffs.delete
    }

    /// Whether role add/edit/delete is disabled
    pub fn roles_locked(&self) -> bool {
        self.roles_locked
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("repositories", &"...")
            .field("cutoffs", &self.cutoffs)
            .field("roles_locked", &self.roles_locked)
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    member_repo: Option<Arc<dyn MemberRepository>>,
    course_repo: Option<Arc<dyn CourseRepository>>,
    role_repo: Option<Arc<dyn RoleRepository>>,
    association_repo: Option<Arc<dyn AssociationRepository>>,
    cutoffs: AccessCutoffs,
    roles_locked: bool,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use one store for all four repositories
    pub fn store<S>(self, store: Arc<S>) -> Self
    where
        S: MemberRepository + CourseRepository + RoleRepository + AssociationRepository + 'static,
    {
        self.member_repo(store.clone())
            .course_repo(store.clone())
            .role_repo(store.clone())
            .association_repo(store)
    }

    pub fn member_repo(mut self, repo: Arc<dyn MemberRepository>) -> Self {
        self.member_repo = Some(repo);
        self
    }

    pub fn course_repo(mut self, repo: Arc<dyn CourseRepository>) -> Self {
        self.course_repo = Some(repo);
        self
    }

    pub fn role_repo(mut self, repo: Arc<dyn RoleRepository>) -> Self {
        self.role_repo = Some(repo);
        self
    }

    pub fn association_repo(mut self, repo: Arc<dyn AssociationRepository>) -> Self {
        self.association_repo = Some(repo);
        self
    }

    pub fn cutoffs(mut self, cutoffs: AccessCutoffs) -> Self {
        self.cutoffs = cutoffs;
        self
    }

    pub fn roles_locked(mut self, locked: bool) -> Self {
        self.roles_locked = locked;
        self
    }

    /// Build the ServiceContext
    ///
    /// # Errors
    /// Returns `ServiceError::Validation` if any repository is missing or the
    /// cutoffs are not monotonic
    pub fn build(self) -> ServiceResult<ServiceContext> {
        self.cutoffs.validate()?;
        Ok(ServiceContext::new(
            self.member_repo
                .ok_or_else(|| ServiceError::validation("member_repo is required"))?,
            self.course_repo
                .ok_or_else(|| ServiceError::validation("course_repo is required"))?,
            self.role_repo
                .ok_or_else(|| ServiceError::validation("role_repo is required"))?,
            self.association_repo
                .ok_or_else(|| ServiceError::validation("association_repo is required"))?,
            self.cutoffs,
            self.roles_locked,
        ))
    }
}
