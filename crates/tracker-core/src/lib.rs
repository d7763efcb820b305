//! # tracker-core
//!
//! Domain layer containing entities, value objects, field validators and
//! repository traits for the course tracker's access-control model.
//! This crate has zero dependencies on infrastructure (database, web framework, etc.).

pub mod entities;
pub mod error;
pub mod traits;
pub mod validation;
pub mod value_objects;

// Re-export commonly used types at crate root
pub use entities::{
    Association, AssociationChange, Course, Member, NewCourse, NewMember, NewRole, Role,
    RosterEntry, UNASSIGNED_ROLE_NAME,
};
pub use error::{DomainError, ErrorKind};
pub use traits::{
    AssociationRepository, CourseRepository, MemberRepository, RepoResult, RoleRepository,
};
pub use value_objects::{
    AccessAction, AccessCutoffs, CourseId, IdParseError, MemberId, Privilege, RoleId,
};
