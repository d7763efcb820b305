//! Domain entities - core business objects

mod association;
mod course;
mod member;
mod role;

pub use association::{Association, AssociationChange, RosterEntry};
pub use course::{Course, NewCourse};
pub use member::{Member, NewMember};
pub use role::{is_unassigned_name, NewRole, Role, UNASSIGNED_ROLE_NAME};
