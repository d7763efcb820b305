//! PostgreSQL implementation of AssociationRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::{debug, instrument};

use tracker_core::entities::{Association, AssociationChange, RosterEntry};
use tracker_core::error::DomainError;
use tracker_core::traits::{AssociationRepository, RepoResult};
use tracker_core::value_objects::{CourseId, MemberId, Privilege};

use crate::models::{AssociationModel, RosterRowModel};

use super::error::{map_association_write_error, map_db_error};

/// PostgreSQL implementation of AssociationRepository
#[derive(Clone)]
pub struct PgAssociationRepository {
    pool: PgPool,
}

impl PgAssociationRepository {
    /// Create a new PgAssociationRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AssociationRepository for PgAssociationRepository {
    #[instrument(skip(self))]
    async fn find(
        &self,
        course_id: CourseId,
        member_id: MemberId,
    ) -> RepoResult<Option<Association>> {
        let result = sqlx::query_as::<_, AssociationModel>(
            r"
            SELECT course_id, role_id, member_id
            FROM associations
            WHERE course_id = $1 AND member_id = $2
            ",
        )
        .bind(course_id.into_inner())
        .bind(member_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Association::from))
    }

    #[instrument(skip(self))]
    async fn privilege_of(
        &self,
        course_id: CourseId,
        member_id: MemberId,
    ) -> RepoResult<Option<Privilege>> {
        let privilege = sqlx::query_scalar::<_, i32>(
            r"
            SELECT r.privilege
            FROM associations a
            INNER JOIN roles r ON r.id = a.role_id
            WHERE a.course_id = $1 AND a.member_id = $2
            ",
        )
        .bind(course_id.into_inner())
        .bind(member_id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(privilege.map(Privilege::new))
    }

    #[instrument(skip(self))]
    async fn roster(&self, course_id: CourseId) -> RepoResult<Vec<RosterEntry>> {
        let rows = sqlx::query_as::<_, RosterRowModel>(
            r"
            SELECT m.id AS member_id, m.name AS member_name, m.is_admin,
                   r.id AS role_id, r.name AS role_name, r.privilege
            FROM members m
            LEFT JOIN associations a ON a.member_id = m.id AND a.course_id = $1
            LEFT JOIN roles r ON r.id = a.role_id
            ORDER BY LOWER(m.name)
            ",
        )
        .bind(course_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(rows.into_iter().map(RosterEntry::from).collect())
    }

    #[instrument(skip(self))]
    async fn find_by_member(&self, member_id: MemberId) -> RepoResult<Vec<Association>> {
        let results = sqlx::query_as::<_, AssociationModel>(
            r"
            SELECT course_id, role_id, member_id
            FROM associations
            WHERE member_id = $1
            ORDER BY course_id
            ",
        )
        .bind(member_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Association::from).collect())
    }

    #[instrument(skip(self, changes), fields(changes = changes.len()))]
    async fn apply(&self, course_id: CourseId, changes: &[AssociationChange]) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        for change in changes {
            match *change {
                AssociationChange::Grant { member_id, role_id } => {
                    let row = Association::new(course_id, role_id, member_id)?;
                    sqlx::query(
                        r"
                        INSERT INTO associations (course_id, role_id, member_id)
                        VALUES ($1, $2, $3)
                        ",
                    )
                    .bind(row.course_id.into_inner())
                    .bind(row.role_id.into_inner())
                    .bind(row.member_id.into_inner())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_association_write_error)?;
                }
                AssociationChange::Change { member_id, role_id } => {
                    let row = Association::new(course_id, role_id, member_id)?;
                    let result = sqlx::query(
                        r"
                        UPDATE associations SET role_id = $3
                        WHERE course_id = $1 AND member_id = $2
                        ",
                    )
                    .bind(row.course_id.into_inner())
                    .bind(row.member_id.into_inner())
                    .bind(row.role_id.into_inner())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_association_write_error)?;

                    if result.rows_affected() == 0 {
                        return Err(DomainError::Validation(format!(
                            "member {member_id} holds no role in course {course_id}"
                        )));
                    }
                }
                AssociationChange::Revoke { member_id } => {
                    let result = sqlx::query(
                        r"
                        DELETE FROM associations WHERE course_id = $1 AND member_id = $2
                        ",
                    )
                    .bind(course_id.into_inner())
                    .bind(member_id.into_inner())
                    .execute(&mut *tx)
                    .await
                    .map_err(map_db_error)?;

                    if result.rows_affected() == 0 {
                        debug!(%member_id, "Revoke found no association row");
                    }
                }
            }
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_repo_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PgAssociationRepository>();
    }
}
