//! Repository implementations
//!
//! PostgreSQL implementations of the repository traits defined in tracker-core.
//! Each repository handles database operations for a specific domain entity.

mod association;
mod course;
mod error;
mod member;
mod role;

pub use association::PgAssociationRepository;
pub use course::PgCourseRepository;
pub use member::PgMemberRepository;
pub use role::PgRoleRepository;
