//! Repository traits

mod repositories;

pub use repositories::{
    AssociationRepository, CourseRepository, MemberRepository, RepoResult, RoleRepository,
};
