//! # tracker-db
//!
//! Entity store adapters: PostgreSQL repositories via SQLx, plus an in-memory
//! store with the same constraints.
//!
//! ## Overview
//!
//! - Connection pool management and migrations
//! - Database models with SQLx `FromRow` derives
//! - Entity ↔ Model mappers
//! - Repository implementations (`Pg*Repository`, `MemoryStore`)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use tracker_db::pool::{create_pool, run_migrations, DatabaseConfig};
//! use tracker_db::repositories::PgMemberRepository;
//! use tracker_core::traits::MemberRepository;
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DatabaseConfig::from_env();
//!     let pool = create_pool(&config).await?;
//!     run_migrations(&pool).await?;
//!     let members = PgMemberRepository::new(pool);
//!
//!     // Use the repository...
//!     Ok(())
//! }
//! ```

pub mod mappers;
pub mod memory;
pub mod models;
pub mod pool;
pub mod repositories;

// Re-export commonly used types
pub use memory::MemoryStore;
pub use pool::{create_pool, create_pool_from_env, run_migrations, DatabaseConfig, PgPool};
pub use repositories::{
    PgAssociationRepository, PgCourseRepository, PgMemberRepository, PgRoleRepository,
};
