//! Integration test utilities for the course tracker
//!
//! This crate provides helpers for running use-case scenarios against the
//! in-memory store and, when `DATABASE_URL` is set, against PostgreSQL.

pub mod fixtures;
pub mod helpers;

pub use fixtures::*;
pub use helpers::*;
