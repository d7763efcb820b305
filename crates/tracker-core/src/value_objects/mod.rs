//! Value objects - immutable types that represent domain concepts

mod access;
mod ids;

pub use access::{AccessAction, AccessCutoffs, Privilege};
pub use ids::{CourseId, IdParseError, MemberId, RoleId};
