//! Database models - SQLx-compatible structs for PostgreSQL tables

mod association;
mod course;
mod member;
mod role;

pub use association::{AssociationModel, RosterRowModel};
pub use course::CourseModel;
pub use member::MemberModel;
pub use role::RoleModel;
