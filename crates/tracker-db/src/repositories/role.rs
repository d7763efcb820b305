//! PostgreSQL implementation of RoleRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tracker_core::entities::{NewRole, Role};
use tracker_core::error::DomainError;
use tracker_core::traits::{RepoResult, RoleRepository};
use tracker_core::value_objects::{Privilege, RoleId};

use crate::models::RoleModel;

use super::error::{map_db_error, map_role_write_error};

/// PostgreSQL implementation of RoleRepository
#[derive(Clone)]
pub struct PgRoleRepository {
    pool: PgPool,
}

impl PgRoleRepository {
    /// Create a new PgRoleRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RoleRepository for PgRoleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: RoleId) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r"
            SELECT id, name, privilege FROM roles WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Role::from))
    }

    #[instrument(skip(self))]
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r"
            SELECT id, name, privilege FROM roles WHERE LOWER(name) = LOWER($1)
            ",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Role::from))
    }

    #[instrument(skip(self))]
    async fn find_by_privilege(&self, privilege: Privilege) -> RepoResult<Option<Role>> {
        let result = sqlx::query_as::<_, RoleModel>(
            r"
            SELECT id, name, privilege FROM roles WHERE privilege = $1
            ",
        )
        .bind(privilege.level())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Role::from))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<Role>> {
        let results = sqlx::query_as::<_, RoleModel>(
            r"
            SELECT id, name, privilege FROM roles ORDER BY privilege
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Role::from).collect())
    }

    #[instrument(skip(self, role), fields(name = %role.name, privilege = %role.privilege))]
    async fn create(&self, role: &NewRole) -> RepoResult<Role> {
        let result = match role.id {
            Some(id) => {
                sqlx::query_as::<_, RoleModel>(
                    r"
                    INSERT INTO roles (id, name, privilege)
                    VALUES ($1, $2, $3)
                    RETURNING id, name, privilege
                    ",
                )
                .bind(id.into_inner())
                .bind(&role.name)
                .bind(role.privilege.level())
                .fetch_one(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, RoleModel>(
                    r"
                    INSERT INTO roles (name, privilege)
                    VALUES ($1, $2)
                    RETURNING id, name, privilege
                    ",
                )
                .bind(&role.name)
                .bind(role.privilege.level())
                .fetch_one(&self.pool)
                .await
            }
        };

        let model = result.map_err(|e| map_role_write_error(e, role.privilege.level()))?;

        Ok(Role::from(model))
    }

    #[instrument(skip(self, role), fields(id = %role.id))]
    async fn update(&self, role: &Role) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE roles SET name = $2, privilege = $3 WHERE id = $1
            ",
        )
        .bind(role.id.into_inner())
        .bind(&role.name)
        .bind(role.privilege.level())
        .execute(&self.pool)
        .await
        .map_err(|e| map_role_write_error(e, role.privilege.level()))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RoleNotFound(role.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: RoleId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM associations WHERE role_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM roles WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::RoleNotFound(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
