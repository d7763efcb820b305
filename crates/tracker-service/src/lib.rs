//! # tracker-service
//!
//! Application layer containing the course tracker's use cases, the
//! validation layer, the access-control evaluator and DTOs.

pub mod dto;
pub mod services;

pub use dto::{
    AssignmentSummary, CourseDetailsResponse, CourseInput, CourseResponse, MemberInput,
    MemberResponse, ProfileInput, RoleAssignment, RoleInput, RoleResponse, RosterResponse,
    SeedReport,
};
pub use services::{
    seed_defaults, AccessService, AssignmentService, CourseService, Decision, MemberService,
    RoleService, ServiceContext, ServiceContextBuilder, ServiceError, ServiceResult, Target,
    Validator, NOT_AUTHORIZED_MSG,
};
