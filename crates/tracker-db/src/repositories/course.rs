//! PostgreSQL implementation of CourseRepository

use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use tracker_core::entities::{Association, Course, NewCourse};
use tracker_core::error::DomainError;
use tracker_core::traits::{CourseRepository, RepoResult};
use tracker_core::value_objects::{CourseId, MemberId, RoleId};

use crate::models::CourseModel;

use super::error::{map_association_write_error, map_course_write_error, map_db_error};

/// PostgreSQL implementation of CourseRepository
#[derive(Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    /// Create a new PgCourseRepository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: CourseId) -> RepoResult<Option<Course>> {
        let result = sqlx::query_as::<_, CourseModel>(
            r"
            SELECT id, name, code, course_group, description, created_at, updated_at
            FROM courses
            WHERE id = $1
            ",
        )
        .bind(id.into_inner())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Course::from))
    }

    #[instrument(skip(self))]
    async fn find_by_name_and_code(&self, name: &str, code: &str) -> RepoResult<Option<Course>> {
        let result = sqlx::query_as::<_, CourseModel>(
            r"
            SELECT id, name, code, course_group, description, created_at, updated_at
            FROM courses
            WHERE LOWER(name) = LOWER($1) AND LOWER(code) = LOWER($2)
            ",
        )
        .bind(name)
        .bind(code)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(result.map(Course::from))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> RepoResult<Vec<Course>> {
        let results = sqlx::query_as::<_, CourseModel>(
            r"
            SELECT id, name, code, course_group, description, created_at, updated_at
            FROM courses
            ORDER BY LOWER(name), LOWER(code)
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Course::from).collect())
    }

    #[instrument(skip(self))]
    async fn list_for_member(&self, member_id: MemberId) -> RepoResult<Vec<Course>> {
        let results = sqlx::query_as::<_, CourseModel>(
            r"
            SELECT c.id, c.name, c.code, c.course_group, c.description, c.created_at, c.updated_at
            FROM courses c
            INNER JOIN associations a ON a.course_id = c.id
            WHERE a.member_id = $1
            ORDER BY LOWER(c.name), LOWER(c.code)
            ",
        )
        .bind(member_id.into_inner())
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        Ok(results.into_iter().map(Course::from).collect())
    }

    #[instrument(skip(self, course), fields(name = %course.name, code = %course.code))]
    async fn create(
        &self,
        course: &NewCourse,
        owner: Option<(RoleId, MemberId)>,
    ) -> RepoResult<Course> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        let model = sqlx::query_as::<_, CourseModel>(
            r"
            INSERT INTO courses (name, code, course_group, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, code, course_group, description, created_at, updated_at
            ",
        )
        .bind(&course.name)
        .bind(&course.code)
        .bind(&course.group)
        .bind(&course.description)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| map_course_write_error(e, &course.name, &course.code))?;

        if let Some((role_id, member_id)) = owner {
            let owner = Association::new(CourseId::new(model.id), role_id, member_id)?;
            sqlx::query(
                r"
                INSERT INTO associations (course_id, role_id, member_id)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(owner.course_id.into_inner())
            .bind(owner.role_id.into_inner())
            .bind(owner.member_id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_association_write_error)?;
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(Course::from(model))
    }

    #[instrument(skip(self, course), fields(id = %course.id))]
    async fn update(&self, course: &Course) -> RepoResult<()> {
        let result = sqlx::query(
            r"
            UPDATE courses
            SET name = $2, code = $3, course_group = $4, description = $5, updated_at = NOW()
            WHERE id = $1
            ",
        )
        .bind(course.id.into_inner())
        .bind(&course.name)
        .bind(&course.code)
        .bind(&course.group)
        .bind(&course.description)
        .execute(&self.pool)
        .await
        .map_err(|e| map_course_write_error(e, &course.name, &course.code))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CourseNotFound(course.id));
        }

        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: CourseId) -> RepoResult<()> {
        let mut tx = self.pool.begin().await.map_err(map_db_error)?;

        sqlx::query("DELETE FROM associations WHERE course_id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.into_inner())
            .execute(&mut *tx)
            .await
            .map_err(map_db_error)?;

        if result.rows_affected() == 0 {
            return Err(DomainError::CourseNotFound(id));
        }

        tx.commit().await.map_err(map_db_error)?;

        Ok(())
    }
}
