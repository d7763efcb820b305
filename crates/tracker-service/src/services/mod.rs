//! Business logic services
//!
//! This module contains the use cases over members, courses, roles and
//! course assignments, plus the validation layer and access-control
//! evaluator every use case runs through.

pub mod access;
pub mod assignment;
pub mod context;
pub mod course;
pub mod error;
pub mod member;
pub mod role;
pub mod seed;
pub mod validation;

// Re-export all services for convenience
pub use access::{AccessService, Decision, Target};
pub use assignment::AssignmentService;
pub use context::{ServiceContext, ServiceContextBuilder};
pub use course::CourseService;
pub use error::{ServiceError, ServiceResult, NOT_AUTHORIZED_MSG, OPERATION_FAILED_MSG};
pub use member::MemberService;
pub use role::RoleService;
pub use seed::{seed_defaults, DEFAULT_ROLES};
pub use validation::{ValidMember, ValidProfile, Validator};
