//! Test fixtures and data generators
//!
//! Provides reusable test data for integration tests. Names carry a unique
//! suffix so PostgreSQL runs never collide with earlier rows.

use std::sync::atomic::{AtomicU64, Ordering};

use tracker_service::{CourseInput, MemberInput};

/// Counter for unique test data
static COUNTER: AtomicU64 = AtomicU64::new(1);

/// Password every fixture member is created with
pub const PASSWORD: &str = "Secret123";

/// Get a unique suffix for test data
pub fn unique_suffix() -> u64 {
    let pid = u64::from(std::process::id());
    pid * 10_000 + COUNTER.fetch_add(1, Ordering::SeqCst)
}

/// Member input with a unique name and email
pub fn member_input(prefix: &str) -> MemberInput {
    let suffix = unique_suffix();
    MemberInput::new(
        format!("{prefix}{suffix}"),
        format!("{prefix}{suffix}@tracker.com"),
    )
    .with_password(PASSWORD)
}

/// Course input with a unique name and code
pub fn course_input(prefix: &str) -> CourseInput {
    let suffix = unique_suffix();
    CourseInput::new(format!("{prefix} {suffix}"), format!("SDEV {suffix}"))
}
