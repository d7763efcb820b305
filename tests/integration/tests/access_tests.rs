//! Access-control and integrity scenarios over the in-memory store
//!
//! Run with: cargo test -p integration-tests --test access_tests

use integration_tests::{course_input, member_input, TestApp, PASSWORD};
use tracker_core::entities::{AssociationChange, NewRole};
use tracker_core::{AccessAction, AccessCutoffs, DomainError, ErrorKind, MemberId, Privilege, RoleId};
use tracker_service::{
    AccessService, AssignmentService, CourseInput, CourseService, MemberInput, MemberService,
    RoleAssignment, RoleInput, RoleService, ServiceError, Target, NOT_AUTHORIZED_MSG,
};

// ============================================================================
// Uniqueness
// ============================================================================

#[tokio::test]
async fn test_email_unique_ignoring_case() {
    let app = TestApp::memory().await.unwrap();
    let members = MemberService::new(&app.ctx);

    members
        .add_member(app.admin, MemberInput::new("jessica", "admin@tracker.com").with_password(PASSWORD))
        .await
        .unwrap();

    let err = members
        .add_member(app.admin, MemberInput::new("gurney", "Admin@Tracker.com").with_password(PASSWORD))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
    assert!(matches!(err, ServiceError::Domain(DomainError::DuplicateEmail)));

    let paul = app.member("paul").await.unwrap();
    let err = members
        .update_member(app.admin, paul.id, MemberInput::new(paul.name.clone(), "ADMIN@tracker.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::DuplicateEmail)));
}

#[tokio::test]
async fn test_course_pair_unique_but_parts_shareable() {
    let app = TestApp::memory().await.unwrap();
    let courses = CourseService::new(&app.ctx);

    courses
        .add_course(app.admin, CourseInput::new("Database Security", "SDEV 350"))
        .await
        .unwrap();

    let same_name = CourseInput::new("Database Security", "SDEV 400");
    let same_code = CourseInput::new("Web Security", "SDEV 350");
    assert!(courses.add_course(app.admin, same_name).await.is_ok());
    assert!(courses.add_course(app.admin, same_code).await.is_ok());

    let err = courses
        .add_course(app.admin, CourseInput::new("Database Security", "SDEV 350"))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Duplicate);
}

#[tokio::test]
async fn test_role_id_one_is_unassigned() {
    let app = TestApp::memory().await.unwrap();

    let unassigned = app.ctx.role_repo().find_by_id(RoleId::UNASSIGNED).await.unwrap().unwrap();
    assert_eq!(unassigned.name, "Unassigned");

    assert!(matches!(
        NewRole::with_id(RoleId::UNASSIGNED, "Dean", Privilege::new(40)),
        Err(DomainError::ReservedRoleId)
    ));

    let err = RoleService::new(&app.ctx)
        .update_role(app.admin, RoleId::UNASSIGNED, RoleInput::new("Dean", 40))
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::ReservedRoleId)));
}

#[tokio::test]
async fn test_second_role_updates_existing_row() {
    let app = TestApp::memory().await.unwrap();
    let course = app.course("Arrakis").await.unwrap();
    let paul = app.member("paul").await.unwrap();

    app.grant(course.id, paul.id, 1).await.unwrap();
    app.grant(course.id, paul.id, 20).await.unwrap();

    let rows = app.ctx.association_repo().find_by_member(paul.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(app.privilege(course.id, paul.id).await.unwrap(), Some(Privilege::new(20)));

    let student = app.role_at(1).await.unwrap();
    let err = app
        .ctx
        .association_repo()
        .apply(
            course.id,
            &[AssociationChange::Grant {
                member_id: paul.id,
                role_id: student,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateAssociation));
}

// ============================================================================
// Cascading deletes
// ============================================================================

#[tokio::test]
async fn test_deletes_remove_associations() {
    let app = TestApp::memory().await.unwrap();
    let course = app.course("Arrakis").await.unwrap();
    let other = app.course("Caladan").await.unwrap();
    let paul = app.member("paul").await.unwrap();
    let leto = app.member("leto").await.unwrap();
    let teacher = app.role_at(20).await.unwrap();
    app.grant(course.id, paul.id, 20).await.unwrap();
    app.grant(other.id, paul.id, 1).await.unwrap();
    app.grant(course.id, leto.id, 1).await.unwrap();
    app.grant(other.id, leto.id, 20).await.unwrap();
    let assoc = app.ctx.association_repo();

    MemberService::new(&app.ctx).delete_member(app.admin, paul.id).await.unwrap();
    assert!(assoc.find_by_member(paul.id).await.unwrap().is_empty());

    CourseService::new(&app.ctx).delete_course(app.admin, course.id).await.unwrap();
    let rows = assoc.find_by_member(leto.id).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].course_id, other.id);

    RoleService::new(&app.ctx).delete_role(app.admin, teacher).await.unwrap();
    assert!(assoc.find_by_member(leto.id).await.unwrap().is_empty());
}

// ============================================================================
// Access evaluation
// ============================================================================

#[test]
fn test_cutoffs_are_monotonic() {
    let cutoffs = AccessCutoffs::default();
    for level in 0..=99 {
        let privilege = Privilege::new(level);
        if cutoffs.allows(privilege, AccessAction::Delete) {
            assert!(cutoffs.allows(privilege, AccessAction::Edit));
            assert!(cutoffs.allows(privilege, AccessAction::View));
        }
        if cutoffs.allows(privilege, AccessAction::Edit) {
            assert!(cutoffs.allows(privilege, AccessAction::View));
            assert!(cutoffs.allows(privilege, AccessAction::Assign));
        }
    }

    let inverted = AccessCutoffs::new(
        Privilege::new(10),
        Privilege::new(10),
        Privilege::new(30),
        Privilege::new(20),
    );
    assert!(inverted.is_err());
}

#[tokio::test]
async fn test_no_association_denies_every_course_action() {
    let app = TestApp::memory().await.unwrap();
    let course = app.course("Arrakis").await.unwrap();
    let other = app.course("Caladan").await.unwrap();
    let paul = app.member("paul").await.unwrap();
    app.grant(other.id, paul.id, 30).await.unwrap();
    let access = AccessService::new(&app.ctx);

    for action in [AccessAction::View, AccessAction::Assign, AccessAction::Edit, AccessAction::Delete] {
        let decision = access.decide(paul.id, action, Target::Course(course.id)).await.unwrap();
        assert!(!decision.is_allowed(), "{action} allowed without a row");
        let decision = access.decide(paul.id, action, Target::Course(other.id)).await.unwrap();
        assert!(decision.is_allowed(), "{action} denied for chair");
    }
}

#[tokio::test]
async fn test_admin_denied_only_self_delete() {
    let app = TestApp::memory().await.unwrap();
    let course = app.course("Arrakis").await.unwrap();
    let paul = app.member("paul").await.unwrap();
    let access = AccessService::new(&app.ctx);

    let targets = [
        Target::Course(course.id),
        Target::Member(paul.id),
        Target::Member(app.admin),
        Target::Members,
        Target::Role(RoleId::new(2)),
        Target::Roles,
    ];
    for target in targets {
        for action in [AccessAction::View, AccessAction::Assign, AccessAction::Edit, AccessAction::Delete] {
            let allowed = access.decide(app.admin, action, target).await.unwrap().is_allowed();
            let self_delete = action == AccessAction::Delete && target == Target::Member(app.admin);
            assert_eq!(allowed, !self_delete, "{action} on {target}");
        }
    }
}

#[tokio::test]
async fn test_same_member_different_privilege_per_course() {
    let app = TestApp::memory().await.unwrap();
    let arrakis = app.course("Arrakis").await.unwrap();
    let caladan = app.course("Caladan").await.unwrap();
    let paul = app.member("paul").await.unwrap();
    app.grant(arrakis.id, paul.id, 30).await.unwrap();
    app.grant(caladan.id, paul.id, 1).await.unwrap();
    let courses = CourseService::new(&app.ctx);

    assert!(courses.delete_course(paul.id, arrakis.id).await.is_ok());
    assert!(courses.delete_course(paul.id, caladan.id).await.unwrap_err().is_authorization());
}

#[tokio::test]
async fn test_denial_hides_existence() {
    let app = TestApp::memory().await.unwrap();
    let course = app.course("Arrakis").await.unwrap();
    let paul = app.member("paul").await.unwrap();
    let courses = CourseService::new(&app.ctx);

    let existing = courses.delete_course(paul.id, course.id).await.unwrap_err();
    let missing = courses
        .delete_course(paul.id, tracker_core::CourseId::new(9_999))
        .await
        .unwrap_err();

    assert_eq!(existing.user_message(), NOT_AUTHORIZED_MSG);
    assert_eq!(existing.user_message(), missing.user_message());
    assert_eq!(existing.status_code(), missing.status_code());
}

// ============================================================================
// Scenarios
// ============================================================================

#[tokio::test]
async fn test_chair_edits_course_description() {
    let app = TestApp::memory().await.unwrap();
    let course = app.course("Arrakis").await.unwrap();
    let chair = app.member("chair").await.unwrap();
    app.grant(course.id, chair.id, 30).await.unwrap();

    let edit = CourseInput::new(course.name.clone(), course.code.clone())
        .description("Survival on the deep desert");
    let updated = CourseService::new(&app.ctx)
        .update_course(chair.id, course.id, edit)
        .await
        .unwrap();
    assert_eq!(updated.description.as_deref(), Some("Survival on the deep desert"));

    let stored = app.ctx.course_repo().find_by_id(course.id).await.unwrap().unwrap();
    assert_eq!(stored.description.as_deref(), Some("Survival on the deep desert"));
}

#[tokio::test]
async fn test_student_cannot_delete_course() {
    let app = TestApp::memory().await.unwrap();
    let course = app.course("Arrakis").await.unwrap();
    let student = app.member("student").await.unwrap();
    app.grant(course.id, student.id, 1).await.unwrap();

    let err = CourseService::new(&app.ctx)
        .delete_course(student.id, course.id)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::NotAuthorized)));
    assert!(app.ctx.course_repo().find_by_id(course.id).await.unwrap().is_some());
    assert_eq!(app.privilege(course.id, student.id).await.unwrap(), Some(Privilege::new(1)));
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = TestApp::memory().await.unwrap();

    let err = MemberService::new(&app.ctx)
        .delete_member(app.admin, app.admin)
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Domain(DomainError::SelfAction)));
    assert!(app.ctx.member_repo().find_by_id(app.admin).await.unwrap().is_some());
}

// ============================================================================
// Assignment
// ============================================================================

#[tokio::test]
async fn test_assignment_respects_ceiling() {
    let app = TestApp::memory().await.unwrap();
    let course = app.course("Arrakis").await.unwrap();
    let teacher = app.member("teacher").await.unwrap();
    let paul = app.member("paul").await.unwrap();
    app.grant(course.id, teacher.id, 20).await.unwrap();
    let assignments = AssignmentService::new(&app.ctx);

    let roster = assignments.roster(teacher.id, course.id).await.unwrap();
    assert!(roster.roles.iter().all(|r| r.privilege <= Privilege::new(19)));
    assert!(roster.members.iter().all(|m| m.member_id != teacher.id));

    for level in [20, 30] {
        let role = app.role_at(level).await.unwrap();
        let err = assignments
            .assign(teacher.id, course.id, &[RoleAssignment::new(paul.id, role)])
            .await
            .unwrap_err();
        assert!(err.is_authorization());
    }

    let student = app.role_at(1).await.unwrap();
    let summary = assignments
        .assign(teacher.id, course.id, &[RoleAssignment::new(paul.id, student)])
        .await
        .unwrap();
    assert_eq!(summary.added, 1);
}

#[tokio::test]
async fn test_unassign_removes_row_and_never_stores_role_one() {
    let app = TestApp::memory().await.unwrap();
    let course = app.course("Arrakis").await.unwrap();
    let paul = app.member("paul").await.unwrap();
    app.grant(course.id, paul.id, 1).await.unwrap();

    let summary = AssignmentService::new(&app.ctx)
        .assign(app.admin, course.id, &[RoleAssignment::unassign(paul.id)])
        .await
        .unwrap();
    assert_eq!(summary.removed, 1);
    assert!(app.ctx.association_repo().find(course.id, paul.id).await.unwrap().is_none());

    let err = app
        .ctx
        .association_repo()
        .apply(
            course.id,
            &[AssociationChange::Grant {
                member_id: paul.id,
                role_id: RoleId::UNASSIGNED,
            }],
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::ReservedRoleId));
}

// ============================================================================
// Members and roles
// ============================================================================

#[tokio::test]
async fn test_blank_password_on_edit_keeps_hash() {
    let app = TestApp::memory().await.unwrap();
    let paul = app.member("paul").await.unwrap();
    let members = MemberService::new(&app.ctx);

    let mut edit = MemberInput::new(paul.name.clone(), "usul@fremen.com");
    edit.password = Some("   ".to_string());
    edit.confirm_password = Some(String::new());
    members.update_member(app.admin, paul.id, edit).await.unwrap();

    assert!(members.verify_password("usul@fremen.com", PASSWORD).await.is_ok());
}

#[tokio::test]
async fn test_roles_locked_blocks_only_mutation() {
    let app = TestApp::memory_with_roles_locked().await.unwrap();
    let roles = RoleService::new(&app.ctx);
    let teacher = app.role_at(20).await.unwrap();

    let err = roles.add_role(app.admin, RoleInput::new("Dean", 40)).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    let err = roles
        .update_role(app.admin, teacher, RoleInput::new("Lecturer", 20))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);
    let err = roles.delete_role(app.admin, teacher).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unavailable);

    assert_eq!(roles.list_roles(app.admin).await.unwrap().len(), 4);
    assert!(roles.get_role(app.admin, teacher).await.is_ok());
}

#[tokio::test]
async fn test_profile_is_self_service_only() {
    let app = TestApp::memory().await.unwrap();
    let paul = app.member("paul").await.unwrap();
    let leto = app.member("leto").await.unwrap();
    let members = MemberService::new(&app.ctx);

    assert!(members.get_member(paul.id, paul.id).await.is_ok());
    assert!(members.get_member(paul.id, leto.id).await.unwrap_err().is_authorization());
    assert!(members
        .get_member(paul.id, MemberId::new(9_999))
        .await
        .unwrap_err()
        .is_authorization());
}

#[tokio::test]
async fn test_creator_owns_new_course() {
    let app = TestApp::memory().await.unwrap();
    let paul = app.member("paul").await.unwrap();
    let courses = CourseService::new(&app.ctx);

    let course = courses.add_course(paul.id, course_input("Ecology")).await.unwrap();
    let details = courses.get_course(paul.id, course.id).await.unwrap();
    assert_eq!(details.owners, vec![paul.name.clone()]);
    assert_eq!(details.privilege, Privilege::new(30));

    let json = serde_json::to_value(&details).unwrap();
    assert_eq!(json["name"], course.name);
    assert_eq!(json["privilege"], 30);

    let listed = courses.list_courses(paul.id).await.unwrap();
    assert_eq!(listed.len(), 1);

    let other = member_input("other");
    let other = MemberService::new(&app.ctx).add_member(app.admin, other).await.unwrap();
    assert!(courses.list_courses(other.id).await.unwrap().is_empty());
}
