use anyhow::Context;
use async_trait::async_trait;

use super::repo_types::{Course, CourseFields, CourseWithOwner, CourseWithOwnerRow};
use crate::db::PgDb;

#[async_trait]
pub trait CourseRepo: Send + Sync {
    async fn list_with_owner(&self) -> anyhow::Result<Vec<CourseWithOwner>>;
    async fn find_with_owner(&self, id: i32) -> anyhow::Result<Option<CourseWithOwner>>;
    async fn find(&self, id: i32) -> anyhow::Result<Option<Course>>;
    async fn create(&self, owner_id: i32, fields: CourseFields) -> anyhow::Result<Course>;
    /// Optional fields that were not sent keep their stored value; an
    /// explicit `null` clears them.
    async fn update(&self, id: i32, fields: CourseFields) -> anyhow::Result<Option<Course>>;
    /// Returns whether a row was removed.
    async fn delete(&self, id: i32) -> anyhow::Result<bool>;
}

const WITH_OWNER: &str = r#"
    SELECT c.id, c.user_id, c.title, c.description, c.estimated_time, c.materials_needed,
           u.id            AS owner_id,
           u.first_name    AS owner_first_name,
           u.last_name     AS owner_last_name,
           u.email_address AS owner_email_address
    FROM courses c
    JOIN users u ON u.id = c.user_id
"#;

#[async_trait]
impl CourseRepo for PgDb {
    async fn list_with_owner(&self) -> anyhow::Result<Vec<CourseWithOwner>> {
        let rows = sqlx::query_as::<_, CourseWithOwnerRow>(&format!("{WITH_OWNER} ORDER BY c.id"))
            .fetch_all(&self.pool)
            .await
            .context("list courses")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_with_owner(&self, id: i32) -> anyhow::Result<Option<CourseWithOwner>> {
        let row = sqlx::query_as::<_, CourseWithOwnerRow>(&format!("{WITH_OWNER} WHERE c.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .context("find course with owner")?;
        Ok(row.map(Into::into))
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            SELECT id, user_id, title, description, estimated_time, materials_needed,
                   created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .context("find course")?;
        Ok(course)
    }

    async fn create(&self, owner_id: i32, fields: CourseFields) -> anyhow::Result<Course> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            INSERT INTO courses (user_id, title, description, estimated_time, materials_needed)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, user_id, title, description, estimated_time, materials_needed,
                      created_at, updated_at
            "#,
        )
        .bind(owner_id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.estimated_time_value())
        .bind(fields.materials_needed_value())
        .fetch_one(&self.pool)
        .await
        .context("insert course")?;
        Ok(course)
    }

    async fn update(&self, id: i32, fields: CourseFields) -> anyhow::Result<Option<Course>> {
        let course = sqlx::query_as::<_, Course>(
            r#"
            UPDATE courses
               SET title            = $2,
                   description      = $3,
                   estimated_time   = CASE WHEN $6 THEN $4 ELSE estimated_time END,
                   materials_needed = CASE WHEN $7 THEN $5 ELSE materials_needed END,
                   updated_at       = now()
             WHERE id = $1
            RETURNING id, user_id, title, description, estimated_time, materials_needed,
                      created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.estimated_time_value())
        .bind(fields.materials_needed_value())
        .bind(fields.estimated_time.is_some())
        .bind(fields.materials_needed.is_some())
        .fetch_optional(&self.pool)
        .await
        .context("update course")?;
        Ok(course)
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let res = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .context("delete course")?;
        Ok(res.rows_affected() > 0)
    }
}
