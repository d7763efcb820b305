//! Repository traits (ports) - define the interface for data access
//!
//! The domain layer defines what it needs, and the infrastructure layer
//! provides the implementation. Every mutation is one store transaction.

use async_trait::async_trait;

use crate::entities::{
    Association, AssociationChange, Course, Member, NewCourse, NewMember, NewRole, Role,
    RosterEntry,
};
use crate::error::DomainError;
use crate::value_objects::{CourseId, MemberId, Privilege, RoleId};

/// Result type for repository operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// Member Repository
// ============================================================================

#[async_trait]
pub trait MemberRepository: Send + Sync {
    /// Find member by ID
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>>;

    /// Find member by name (case-insensitive)
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Member>>;

    /// Find member by email (case-insensitive)
    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>>;

    /// List all members ordered by name
    async fn list_all(&self) -> RepoResult<Vec<Member>>;

    /// Create a new member
    async fn create(&self, member: &NewMember) -> RepoResult<Member>;

    /// Update an existing member
    async fn update(&self, member: &Member) -> RepoResult<()>;

    /// Delete a member and their associations
    async fn delete(&self, id: MemberId) -> RepoResult<()>;
}

// ============================================================================
// Course Repository
// ============================================================================

#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Find course by ID
    async fn find_by_id(&self, id: CourseId) -> RepoResult<Option<Course>>;

    /// Find the course holding a (name, code) pair (case-insensitive)
    async fn find_by_name_and_code(&self, name: &str, code: &str) -> RepoResult<Option<Course>>;

    /// List all courses ordered by name
    async fn list_all(&self) -> RepoResult<Vec<Course>>;

    /// List courses the member holds a role in
    async fn list_for_member(&self, member_id: MemberId) -> RepoResult<Vec<Course>>;

    /// Create a course, optionally granting `owner` its role in the same transaction
    async fn create(
        &self,
        course: &NewCourse,
        owner: Option<(RoleId, MemberId)>,
    ) -> RepoResult<Course>;

    /// Update an existing course
    async fn update(&self, course: &Course) -> RepoResult<()>;

    /// Delete a course and its associations
    async fn delete(&self, id: CourseId) -> RepoResult<()>;
}

// ============================================================================
// Role Repository
// ============================================================================

#[async_trait]
pub trait RoleRepository: Send + Sync {
    /// Find role by ID
    async fn find_by_id(&self, id: RoleId) -> RepoResult<Option<Role>>;

    /// Find role by name (case-insensitive)
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Role>>;

    /// Find role by privilege level
    async fn find_by_privilege(&self, privilege: Privilege) -> RepoResult<Option<Role>>;

    /// List all roles ordered by privilege
    async fn list_all(&self) -> RepoResult<Vec<Role>>;

    /// Create a new role
    async fn create(&self, role: &NewRole) -> RepoResult<Role>;

    /// Update an existing role
    async fn update(&self, role: &Role) -> RepoResult<()>;

    /// Delete a role and every association granting it
    async fn delete(&self, id: RoleId) -> RepoResult<()>;
}

// ============================================================================
// Association Repository
// ============================================================================

#[async_trait]
pub trait AssociationRepository: Send + Sync {
    /// Find the row linking a member to a course
    async fn find(&self, course_id: CourseId, member_id: MemberId)
        -> RepoResult<Option<Association>>;

    /// Privilege of the role the member holds in the course, if any
    async fn privilege_of(
        &self,
        course_id: CourseId,
        member_id: MemberId,
    ) -> RepoResult<Option<Privilege>>;

    /// Every member with their role in the course; members without a row are Unassigned
    async fn roster(&self, course_id: CourseId) -> RepoResult<Vec<RosterEntry>>;

    /// All rows for a member
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Association>>;

    /// Apply a batch of changes to one course in a single transaction
    async fn apply(&self, course_id: CourseId, changes: &[AssociationChange]) -> RepoResult<()>;
}
