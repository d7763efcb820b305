//! Test helpers for integration tests
//!
//! Provides a seeded service context with an admin, plus shortcuts for
//! creating members and courses and granting roles through the services.

use anyhow::{Context, Result};
use tracker_common::{AppConfig, PasswordService, SeedConfig};
use tracker_core::entities::NewMember;
use tracker_core::{CourseId, MemberId, Privilege, RoleId};
use tracker_db::{create_pool, run_migrations, DatabaseConfig, MemoryStore};
use tracker_service::{
    seed_defaults, AssignmentService, CourseResponse, CourseService, MemberResponse,
    MemberService, RoleAssignment, ServiceContext,
};

use crate::fixtures::{course_input, member_input, unique_suffix, PASSWORD};

/// Seeded service context with one admin
pub struct TestApp {
    pub ctx: ServiceContext,
    pub admin: MemberId,
}

impl TestApp {
    /// Context over a fresh in-memory store
    pub async fn memory() -> Result<Self> {
        Self::bootstrap(ServiceContext::in_memory(MemoryStore::shared())).await
    }

    /// In-memory context with role mutation disabled
    pub async fn memory_with_roles_locked() -> Result<Self> {
        let ctx = ServiceContext::in_memory(MemoryStore::shared()).with_roles_locked(true);
        Self::bootstrap(ctx).await
    }

    /// Context over PostgreSQL, or `None` when `DATABASE_URL` is not set
    pub async fn postgres() -> Result<Option<Self>> {
        if !check_test_env() {
            return Ok(None);
        }
        let config = test_config()?;
        let pool = create_pool(&DatabaseConfig::from(&config.database)).await?;
        run_migrations(&pool).await?;
        let ctx = ServiceContext::postgres(pool, &config);
        Ok(Some(Self::bootstrap(ctx).await?))
    }

    async fn bootstrap(ctx: ServiceContext) -> Result<Self> {
        seed_defaults(&ctx, &SeedConfig::default()).await?;

        let suffix = unique_suffix();
        let hash = PasswordService::new().hash(PASSWORD)?;
        let admin = NewMember::new(
            format!("admin{suffix}"),
            format!("admin{suffix}@tracker.com"),
            hash,
            true,
        )?;
        let admin = ctx.member_repo().create(&admin).await?.id;

        Ok(Self { ctx, admin })
    }

    /// Add a non-admin member through the member service
    pub async fn member(&self, prefix: &str) -> Result<MemberResponse> {
        Ok(MemberService::new(&self.ctx)
            .add_member(self.admin, member_input(prefix))
            .await?)
    }

    /// Add a course as the admin
    pub async fn course(&self, prefix: &str) -> Result<CourseResponse> {
        Ok(CourseService::new(&self.ctx)
            .add_course(self.admin, course_input(prefix))
            .await?)
    }

    /// Role holding a privilege level
    pub async fn role_at(&self, level: i32) -> Result<RoleId> {
        self.ctx
            .role_repo()
            .find_by_privilege(Privilege::new(level))
            .await?
            .map(|role| role.id)
            .with_context(|| format!("no role at privilege {level}"))
    }

    /// Grant the role at `level` to a member in a course, as the admin
    pub async fn grant(&self, course: CourseId, member: MemberId, level: i32) -> Result<()> {
        let role = self.role_at(level).await?;
        AssignmentService::new(&self.ctx)
            .assign(self.admin, course, &[RoleAssignment::new(member, role)])
            .await?;
        Ok(())
    }

    /// Privilege the member holds in the course, if any
    pub async fn privilege(&self, course: CourseId, member: MemberId) -> Result<Option<Privilege>> {
        Ok(self
            .ctx
            .association_repo()
            .privilege_of(course, member)
            .await?)
    }
}

/// Load test configuration
pub fn test_config() -> Result<AppConfig> {
    // Load from environment or use defaults
    dotenvy::dotenv().ok();

    let config = AppConfig::from_env().map_err(|e| anyhow::anyhow!("Config error: {}", e))?;

    Ok(config)
}

/// Check if the PostgreSQL test environment is available
pub fn check_test_env() -> bool {
    dotenvy::dotenv().ok();

    if std::env::var("DATABASE_URL").is_err() {
        eprintln!("Skipping test: DATABASE_URL not set");
        return false;
    }

    true
}
