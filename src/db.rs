use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing::info;

use crate::config::AppConfig;

/// Idempotent table definitions applied at startup.
const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id            SERIAL PRIMARY KEY,
        first_name    TEXT NOT NULL,
        last_name     TEXT NOT NULL,
        email_address TEXT NOT NULL,
        password      TEXT NOT NULL,
        created_at    TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at    TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS courses (
        id               SERIAL PRIMARY KEY,
        user_id          INTEGER NOT NULL REFERENCES users (id),
        title            TEXT NOT NULL,
        description      TEXT NOT NULL,
        estimated_time   TEXT,
        materials_needed TEXT,
        created_at       TIMESTAMPTZ NOT NULL DEFAULT now(),
        updated_at       TIMESTAMPTZ NOT NULL DEFAULT now()
    )
    "#,
    r#"CREATE INDEX IF NOT EXISTS users_email_address_idx ON users (email_address)"#,
    r#"CREATE INDEX IF NOT EXISTS courses_user_id_idx ON courses (user_id)"#,
];

/// Postgres-backed store; implements every repository trait.
#[derive(Clone)]
pub struct PgDb {
    pub pool: PgPool,
}

impl PgDb {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn connect(config: &AppConfig) -> anyhow::Result<Self> {
        info!("testing the connection to the database");
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await
            .context("connect to database")?;
        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .context("ping database")?;
        info!("connection to the database successful");
        Ok(Self { pool })
    }

    pub async fn sync_schema(&self) -> anyhow::Result<()> {
        for stmt in SCHEMA {
            sqlx::query(*stmt)
                .execute(&self.pool)
                .await
                .context("synchronize schema")?;
        }
        info!("schema synchronized");
        Ok(())
    }
}
