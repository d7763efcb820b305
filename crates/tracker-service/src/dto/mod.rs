//! Data transfer objects for use-case inputs and outputs
//!
//! This module provides:
//! - Request DTOs with shape validation
//! - Response DTOs for serializing outputs
//! - Mappers for converting domain entities to DTOs

pub mod mappers;
pub mod requests;
pub mod responses;

pub use requests::{CourseInput, MemberInput, ProfileInput, RoleAssignment, RoleInput};

pub use responses::{
    AssignmentSummary, CourseDetailsResponse, CourseResponse, MemberResponse, RoleResponse,
    RosterResponse, SeedReport,
};
