use anyhow::Context;
use async_trait::async_trait;

use super::repo_types::{NewUser, User};
use crate::db::PgDb;

#[async_trait]
pub trait UserRepo: Send + Sync {
    /// Exact-match lookup by email address.
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn create(&self, user: NewUser) -> anyhow::Result<User>;
}

#[async_trait]
impl UserRepo for PgDb {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(
            r#"
            SELECT id, first_name, last_name, email_address, password, created_at, updated_at
            FROM users
            WHERE email_address = $1
            ORDER BY id
            LIMIT 1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await
        .context("find user by email")?;
        Ok(user)
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (first_name, last_name, email_address, password)
            VALUES ($1, $2, $3, $4)
            RETURNING id, first_name, last_name, email_address, password, created_at, updated_at
            "#,
        )
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(&user.email_address)
        .bind(&user.password)
        .fetch_one(&self.pool)
        .await
        .context("insert user")?;
        Ok(user)
    }
}
