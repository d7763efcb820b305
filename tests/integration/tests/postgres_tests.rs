//! Use-case scenarios against PostgreSQL
//!
//! These tests require:
//! - Running PostgreSQL instance
//! - Environment variable: DATABASE_URL
//!
//! Run with: cargo test -p integration-tests --test postgres_tests

use integration_tests::{course_input, TestApp, PASSWORD};
use tracker_core::{DomainError, Privilege};
use tracker_service::{
    AssignmentService, CourseInput, CourseService, MemberInput, MemberService, RoleAssignment,
    ServiceError,
};

#[tokio::test]
async fn test_pg_email_unique_ignoring_case() {
    let Some(app) = TestApp::postgres().await.unwrap() else {
        return;
    };
    let paul = app.member("paul").await.unwrap();

    let err = MemberService::new(&app.ctx)
        .add_member(
            app.admin,
            MemberInput::new(format!("{}x", paul.name), paul.email.to_uppercase()).with_password(PASSWORD),
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::DuplicateEmail)));
}

#[tokio::test]
async fn test_pg_course_owner_and_cascade() {
    let Some(app) = TestApp::postgres().await.unwrap() else {
        return;
    };
    let chair = app.member("chair").await.unwrap();
    let student = app.member("student").await.unwrap();
    let courses = CourseService::new(&app.ctx);

    let course = courses.add_course(chair.id, course_input("Arrakis")).await.unwrap();
    assert_eq!(app.privilege(course.id, chair.id).await.unwrap(), Some(Privilege::new(30)));

    app.grant(course.id, student.id, 1).await.unwrap();
    let err = courses.delete_course(student.id, course.id).await.unwrap_err();
    assert!(err.is_authorization());

    courses.delete_course(chair.id, course.id).await.unwrap();
    assert!(app.ctx.association_repo().find_by_member(student.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_pg_chair_edits_and_assigns() {
    let Some(app) = TestApp::postgres().await.unwrap() else {
        return;
    };
    let chair = app.member("chair").await.unwrap();
    let paul = app.member("paul").await.unwrap();
    let course = app.course("Caladan").await.unwrap();
    app.grant(course.id, chair.id, 30).await.unwrap();

    let edit = CourseInput::new(course.name.clone(), course.code.clone()).description("Ocean world");
    let updated = CourseService::new(&app.ctx)
        .update_course(chair.id, course.id, edit)
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Ocean world"));

    let teacher = app.role_at(20).await.unwrap();
    let assignments = AssignmentService::new(&app.ctx);
    let summary = assignments
        .assign(chair.id, course.id, &[RoleAssignment::new(paul.id, teacher)])
        .await
        .unwrap();
    assert_eq!(summary.added, 1);

    let summary = assignments
        .assign(chair.id, course.id, &[RoleAssignment::unassign(paul.id)])
        .await
        .unwrap();
    assert_eq!(summary.removed, 1);
    assert_eq!(app.privilege(course.id, paul.id).await.unwrap(), None);

    CourseService::new(&app.ctx)
        .delete_course(app.admin, course.id)
        .await
        .unwrap();
}
