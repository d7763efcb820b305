//! In-memory implementation of every repository trait
//!
//! Enforces the same uniqueness, foreign-key and role constraints as the
//! PostgreSQL schema. Each mutation runs against a clone of the tables that
//! is swapped in only when the whole operation succeeds, so a failed
//! multi-step write leaves nothing behind.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;

use tracker_core::entities::{
    is_unassigned_name, Association, AssociationChange, Course, Member, NewCourse, NewMember,
    NewRole, Role, RosterEntry,
};
use tracker_core::error::DomainError;
use tracker_core::traits::{
    AssociationRepository, CourseRepository, MemberRepository, RepoResult, RoleRepository,
};
use tracker_core::value_objects::{CourseId, MemberId, Privilege, RoleId};

#[derive(Debug, Clone)]
struct Tables {
    members: BTreeMap<MemberId, Member>,
    courses: BTreeMap<CourseId, Course>,
    roles: BTreeMap<RoleId, Role>,
    associations: Vec<Association>,
    next_member_id: i64,
    next_course_id: i64,
    next_role_id: i64,
}

impl Default for Tables {
    fn default() -> Self {
        let unassigned = Role::unassigned();
        Self {
            members: BTreeMap::new(),
            courses: BTreeMap::new(),
            roles: BTreeMap::from([(unassigned.id, unassigned)]),
            associations: Vec::new(),
            next_member_id: 1,
            next_course_id: 1,
            // id 1 belongs to Unassigned
            next_role_id: 2,
        }
    }
}

fn fk_violation(table: &str) -> DomainError {
    DomainError::DatabaseError(format!(
        "insert on table \"associations\" violates foreign key constraint to \"{table}\""
    ))
}

impl Tables {
    fn check_member_unique(
        &self,
        name: &str,
        email: &str,
        except: Option<MemberId>,
    ) -> RepoResult<()> {
        let others = self.members.values().filter(|m| Some(m.id) != except);
        for other in others {
            if other.name.eq_ignore_ascii_case(name) {
                return Err(DomainError::DuplicateName);
            }
            if other.email.eq_ignore_ascii_case(email) {
                return Err(DomainError::DuplicateEmail);
            }
        }
        Ok(())
    }

    fn check_course_unique(&self, name: &str, code: &str, except: Option<CourseId>) -> RepoResult<()> {
        let taken = self
            .courses
            .values()
            .any(|c| Some(c.id) != except && c.has_name_and_code(name, code));
        if taken {
            return Err(DomainError::DuplicateCourse {
                name: name.to_string(),
                code: code.to_string(),
            });
        }
        Ok(())
    }

    fn check_role(&self, id: Option<RoleId>, name: &str, privilege: Privilege) -> RepoResult<()> {
        let unassigned = is_unassigned_name(name);
        if id.is_some_and(RoleId::is_unassigned) && !unassigned {
            return Err(DomainError::ReservedRoleId);
        }
        if !unassigned && !privilege.is_grantable() {
            return Err(DomainError::InvalidPrivilege(privilege.level()));
        }
        for other in self.roles.values().filter(|r| Some(r.id) != id) {
            if other.name.eq_ignore_ascii_case(name) {
                return Err(DomainError::DuplicateRoleName);
            }
            if other.privilege == privilege {
                return Err(DomainError::DuplicatePrivilege);
            }
        }
        Ok(())
    }

    fn position(&self, course_id: CourseId, member_id: MemberId) -> Option<usize> {
        self.associations
            .iter()
            .position(|a| a.links(course_id, member_id))
    }

    fn insert_association(&mut self, row: Association) -> RepoResult<()> {
        if !self.courses.contains_key(&row.course_id) {
            return Err(fk_violation("courses"));
        }
        if !self.roles.contains_key(&row.role_id) {
            return Err(fk_violation("roles"));
        }
        if !self.members.contains_key(&row.member_id) {
            return Err(fk_violation("members"));
        }
        if self.position(row.course_id, row.member_id).is_some() {
            return Err(DomainError::DuplicateAssociation);
        }
        self.associations.push(row);
        Ok(())
    }
}

/// In-memory entity store
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    /// Create an empty store holding only the Unassigned role
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store wrapped for sharing across repository handles
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Number of association rows (for tests)
    pub fn association_count(&self) -> usize {
        self.tables.lock().associations.len()
    }

    fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> T {
        f(&self.tables.lock())
    }

    /// Run `f` against a draft copy, committing only on success
    fn transact<T>(&self, f: impl FnOnce(&mut Tables) -> RepoResult<T>) -> RepoResult<T> {
        let mut tables = self.tables.lock();
        let mut draft = tables.clone();
        let out = f(&mut draft)?;
        *tables = draft;
        Ok(out)
    }
}

#[async_trait]
impl MemberRepository for MemoryStore {
    async fn find_by_id(&self, id: MemberId) -> RepoResult<Option<Member>> {
        Ok(self.read(|t| t.members.get(&id).cloned()))
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Member>> {
        Ok(self.read(|t| {
            t.members
                .values()
                .find(|m| m.name.eq_ignore_ascii_case(name))
                .cloned()
        }))
    }

    async fn find_by_email(&self, email: &str) -> RepoResult<Option<Member>> {
        Ok(self.read(|t| {
            t.members
                .values()
                .find(|m| m.email.eq_ignore_ascii_case(email))
                .cloned()
        }))
    }

    async fn list_all(&self) -> RepoResult<Vec<Member>> {
        let mut members: Vec<Member> = self.read(|t| t.members.values().cloned().collect());
        members.sort_by_key(|m| m.name.to_lowercase());
        Ok(members)
    }

    async fn create(&self, member: &NewMember) -> RepoResult<Member> {
        self.transact(|t| {
            t.check_member_unique(&member.name, &member.email, None)?;
            let id = MemberId::new(t.next_member_id);
            t.next_member_id += 1;
            let stored = member.clone().into_member(id, Utc::now());
            t.members.insert(id, stored.clone());
            Ok(stored)
        })
    }

    async fn update(&self, member: &Member) -> RepoResult<()> {
        self.transact(|t| {
            if !t.members.contains_key(&member.id) {
                return Err(DomainError::MemberNotFound(member.id));
            }
            t.check_member_unique(&member.name, &member.email, Some(member.id))?;
            let mut stored = member.clone();
            stored.updated_at = Utc::now();
            t.members.insert(member.id, stored);
            Ok(())
        })
    }

    async fn delete(&self, id: MemberId) -> RepoResult<()> {
        self.transact(|t| {
            t.associations.retain(|a| a.member_id != id);
            t.members
                .remove(&id)
                .map(|_| ())
                .ok_or(DomainError::MemberNotFound(id))
        })
    }
}

#[async_trait]
impl CourseRepository for MemoryStore {
    async fn find_by_id(&self, id: CourseId) -> RepoResult<Option<Course>> {
        Ok(self.read(|t| t.courses.get(&id).cloned()))
    }

    async fn find_by_name_and_code(&self, name: &str, code: &str) -> RepoResult<Option<Course>> {
        Ok(self.read(|t| {
            t.courses
                .values()
                .find(|c| c.has_name_and_code(name, code))
                .cloned()
        }))
    }

    async fn list_all(&self) -> RepoResult<Vec<Course>> {
        let mut courses: Vec<Course> = self.read(|t| t.courses.values().cloned().collect());
        courses.sort_by_key(|c| (c.name.to_lowercase(), c.code.to_lowercase()));
        Ok(courses)
    }

    async fn list_for_member(&self, member_id: MemberId) -> RepoResult<Vec<Course>> {
        let mut courses: Vec<Course> = self.read(|t| {
            t.associations
                .iter()
                .filter(|a| a.member_id == member_id)
                .filter_map(|a| t.courses.get(&a.course_id).cloned())
                .collect()
        });
        courses.sort_by_key(|c| (c.name.to_lowercase(), c.code.to_lowercase()));
        Ok(courses)
    }

    async fn create(
        &self,
        course: &NewCourse,
        owner: Option<(RoleId, MemberId)>,
    ) -> RepoResult<Course> {
        self.transact(|t| {
            t.check_course_unique(&course.name, &course.code, None)?;
            let id = CourseId::new(t.next_course_id);
            t.next_course_id += 1;
            let stored = course.clone().into_course(id, Utc::now());
            t.courses.insert(id, stored.clone());
            if let Some((role_id, member_id)) = owner {
                t.insert_association(Association::new(id, role_id, member_id)?)?;
            }
            Ok(stored)
        })
    }

    async fn update(&self, course: &Course) -> RepoResult<()> {
        self.transact(|t| {
            if !t.courses.contains_key(&course.id) {
                return Err(DomainError::CourseNotFound(course.id));
            }
            t.check_course_unique(&course.name, &course.code, Some(course.id))?;
            let mut stored = course.clone();
            stored.updated_at = Utc::now();
            t.courses.insert(course.id, stored);
            Ok(())
        })
    }

    async fn delete(&self, id: CourseId) -> RepoResult<()> {
        self.transact(|t| {
            t.associations.retain(|a| a.course_id != id);
            t.courses
                .remove(&id)
                .map(|_| ())
                .ok_or(DomainError::CourseNotFound(id))
        })
    }
}

#[async_trait]
impl RoleRepository for MemoryStore {
    async fn find_by_id(&self, id: RoleId) -> RepoResult<Option<Role>> {
        Ok(self.read(|t| t.roles.get(&id).cloned()))
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Role>> {
        Ok(self.read(|t| {
            t.roles
                .values()
                .find(|r| r.name.eq_ignore_ascii_case(name))
                .cloned()
        }))
    }

    async fn find_by_privilege(&self, privilege: Privilege) -> RepoResult<Option<Role>> {
        Ok(self.read(|t| t.roles.values().find(|r| r.privilege == privilege).cloned()))
    }

    async fn list_all(&self) -> RepoResult<Vec<Role>> {
        let mut roles: Vec<Role> = self.read(|t| t.roles.values().cloned().collect());
        roles.sort_by_key(|r| r.privilege);
        Ok(roles)
    }

    async fn create(&self, role: &NewRole) -> RepoResult<Role> {
        self.transact(|t| {
            if let Some(id) = role.id {
                if t.roles.contains_key(&id) {
                    return Err(DomainError::DuplicateRoleName);
                }
            }
            t.check_role(role.id, &role.name, role.privilege)?;
            let id = match role.id {
                Some(id) => id,
                None => {
                    let id = RoleId::new(t.next_role_id);
                    t.next_role_id += 1;
                    id
                }
            };
            let stored = role.clone().into_role(id);
            t.roles.insert(id, stored.clone());
            Ok(stored)
        })
    }

    async fn update(&self, role: &Role) -> RepoResult<()> {
        self.transact(|t| {
            if !t.roles.contains_key(&role.id) {
                return Err(DomainError::RoleNotFound(role.id));
            }
            t.check_role(Some(role.id), &role.name, role.privilege)?;
            t.roles.insert(role.id, role.clone());
            Ok(())
        })
    }

    async fn delete(&self, id: RoleId) -> RepoResult<()> {
        self.transact(|t| {
            t.associations.retain(|a| a.role_id != id);
            t.roles
                .remove(&id)
                .map(|_| ())
                .ok_or(DomainError::RoleNotFound(id))
        })
    }
}

#[async_trait]
impl AssociationRepository for MemoryStore {
    async fn find(
        &self,
        course_id: CourseId,
        member_id: MemberId,
    ) -> RepoResult<Option<Association>> {
        Ok(self.read(|t| {
            t.associations
                .iter()
                .find(|a| a.links(course_id, member_id))
                .copied()
        }))
    }

    async fn privilege_of(
        &self,
        course_id: CourseId,
        member_id: MemberId,
    ) -> RepoResult<Option<Privilege>> {
        Ok(self.read(|t| {
            t.associations
                .iter()
                .find(|a| a.links(course_id, member_id))
                .and_then(|a| t.roles.get(&a.role_id))
                .map(|r| r.privilege)
        }))
    }

    async fn roster(&self, course_id: CourseId) -> RepoResult<Vec<RosterEntry>> {
        let mut roster: Vec<RosterEntry> = self.read(|t| {
            t.members
                .values()
                .map(|m| {
                    let role = t
                        .associations
                        .iter()
                        .find(|a| a.links(course_id, m.id))
                        .and_then(|a| t.roles.get(&a.role_id))
                        .cloned()
                        .unwrap_or_else(Role::unassigned);
                    RosterEntry {
                        member_id: m.id,
                        member_name: m.name.clone(),
                        is_admin: m.is_admin,
                        role_id: role.id,
                        role_name: role.name,
                        privilege: role.privilege,
                    }
                })
                .collect()
        });
        roster.sort_by_key(|e| e.member_name.to_lowercase());
        Ok(roster)
    }

    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Association>> {
        let mut rows: Vec<Association> = self.read(|t| {
            t.associations
                .iter()
                .filter(|a| a.member_id == member_id)
                .copied()
                .collect()
        });
        rows.sort_by_key(|a| a.course_id);
        Ok(rows)
    }

    async fn apply(&self, course_id: CourseId, changes: &[AssociationChange]) -> RepoResult<()> {
        self.transact(|t| {
            for change in changes {
                match *change {
                    AssociationChange::Grant { member_id, role_id } => {
                        t.insert_association(Association::new(course_id, role_id, member_id)?)?;
                    }
                    AssociationChange::Change { member_id, role_id } => {
                        let row = Association::new(course_id, role_id, member_id)?;
                        if !t.roles.contains_key(&role_id) {
                            return Err(fk_violation("roles"));
                        }
                        let idx = t.position(course_id, member_id).ok_or_else(|| {
                            DomainError::Validation(format!(
                                "member {member_id} holds no role in course {course_id}"
                            ))
                        })?;
                        t.associations[idx] = row;
                    }
                    AssociationChange::Revoke { member_id } => {
                        t.associations.retain(|a| !a.links(course_id, member_id));
                    }
                }
            }
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_member(name: &str, email: &str) -> NewMember {
        NewMember::new(name, email, "$argon2id$hash", false).unwrap()
    }

    fn new_course(name: &str, code: &str) -> NewCourse {
        NewCourse::new(name, code, None, None).unwrap()
    }

    #[test]
    fn test_store_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MemoryStore>();
    }

    #[tokio::test]
    async fn test_unassigned_role_present() {
        let store = MemoryStore::new();
        let role = RoleRepository::find_by_id(&store, RoleId::UNASSIGNED)
            .await
            .unwrap()
            .unwrap();
        assert!(role.is_unassigned());
        assert_eq!(role.privilege, Privilege::UNASSIGNED);
    }

    #[tokio::test]
    async fn test_member_email_unique_ignoring_case() {
        let store = MemoryStore::new();
        MemberRepository::create(&store, &new_member("admin", "admin@tracker.com"))
            .await
            .unwrap();

        let err = MemberRepository::create(&store, &new_member("other", "Admin@Tracker.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateEmail));

        let err = MemberRepository::create(&store, &new_member("ADMIN", "x@tracker.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateName));
    }

    #[tokio::test]
    async fn test_member_update_keeps_own_values() {
        let store = MemoryStore::new();
        let mut member = MemberRepository::create(&store, &new_member("leto", "leto@caladan.com"))
            .await
            .unwrap();
        member.set_email("LETO@caladan.com".to_string());
        MemberRepository::update(&store, &member).await.unwrap();

        let found = MemberRepository::find_by_email(&store, "leto@CALADAN.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.email, "LETO@caladan.com");
    }

    #[tokio::test]
    async fn test_course_pair_unique() {
        let store = MemoryStore::new();
        CourseRepository::create(&store, &new_course("Database Security", "SDEV 350"), None)
            .await
            .unwrap();

        // sharing one field is fine
        CourseRepository::create(&store, &new_course("Database Security", "SDEV 351"), None)
            .await
            .unwrap();
        CourseRepository::create(&store, &new_course("Databases", "SDEV 350"), None)
            .await
            .unwrap();

        let err = CourseRepository::create(&store, &new_course("database security", "sdev 350"), None)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateCourse { .. }));
    }

    #[tokio::test]
    async fn test_create_course_with_owner_rolls_back() {
        let store = MemoryStore::new();
        let chair = RoleRepository::create(&store, &NewRole::new("Chair", Privilege::new(30)).unwrap())
            .await
            .unwrap();

        // owner member does not exist: the course insert must not survive
        let err = CourseRepository::create(
            &store,
            &new_course("Database Security", "SDEV 350"),
            Some((chair.id, MemberId::new(42))),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, DomainError::DatabaseError(_)));
        assert!(CourseRepository::list_all(&store).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_cascades_associations() {
        let store = MemoryStore::new();
        let member = MemberRepository::create(&store, &new_member("paul", "paul@arrakis.com"))
            .await
            .unwrap();
        let chair = RoleRepository::create(&store, &NewRole::new("Chair", Privilege::new(30)).unwrap())
            .await
            .unwrap();
        let course = CourseRepository::create(
            &store,
            &new_course("Desert Power", "ARR 101"),
            Some((chair.id, member.id)),
        )
        .await
        .unwrap();
        assert_eq!(store.association_count(), 1);

        RoleRepository::delete(&store, chair.id).await.unwrap();
        assert_eq!(store.association_count(), 0);
        assert!(CourseRepository::find_by_id(&store, course.id).await.unwrap().is_some());

        let err = RoleRepository::delete(&store, chair.id).await.unwrap_err();
        assert!(matches!(err, DomainError::RoleNotFound(_)));
    }

    #[tokio::test]
    async fn test_role_invariants() {
        let store = MemoryStore::new();
        let err = RoleRepository::create(&store, &NewRole::new("unassigned", Privilege::new(5)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateRoleName));

        RoleRepository::create(&store, &NewRole::new("Student", Privilege::new(1)).unwrap())
            .await
            .unwrap();
        let err = RoleRepository::create(&store, &NewRole::new("Pupil", Privilege::new(1)).unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicatePrivilege));

        let mut renamed = Role::unassigned();
        renamed.name = "Chair".to_string();
        let err = RoleRepository::update(&store, &renamed).await.unwrap_err();
        assert!(matches!(err, DomainError::ReservedRoleId));
    }

    #[tokio::test]
    async fn test_apply_is_atomic() {
        let store = MemoryStore::new();
        let a = MemberRepository::create(&store, &new_member("alia", "alia@arrakis.com"))
            .await
            .unwrap();
        let b = MemberRepository::create(&store, &new_member("ghanima", "ghanima@arrakis.com"))
            .await
            .unwrap();
        let student = RoleRepository::create(&store, &NewRole::new("Student", Privilege::new(1)).unwrap())
            .await
            .unwrap();
        let course = CourseRepository::create(&store, &new_course("Desert Power", "ARR 101"), None)
            .await
            .unwrap();

        // second change fails, so the first grant must be rolled back
        let err = store
            .apply(
                course.id,
                &[
                    AssociationChange::Grant {
                        member_id: a.id,
                        role_id: student.id,
                    },
                    AssociationChange::Change {
                        member_id: b.id,
                        role_id: student.id,
                    },
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert_eq!(store.association_count(), 0);

        store
            .apply(
                course.id,
                &[AssociationChange::Grant {
                    member_id: a.id,
                    role_id: student.id,
                }],
            )
            .await
            .unwrap();
        assert_eq!(
            store.privilege_of(course.id, a.id).await.unwrap(),
            Some(Privilege::new(1))
        );

        let err = store
            .apply(
                course.id,
                &[AssociationChange::Grant {
                    member_id: a.id,
                    role_id: student.id,
                }],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::DuplicateAssociation));

        let roster = store.roster(course.id).await.unwrap();
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].member_name, "alia");
        assert_eq!(roster[0].role_id, student.id);
        assert!(roster[1].is_unassigned());
    }
}
