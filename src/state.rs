use std::sync::Arc;

use crate::config::AppConfig;
use crate::courses::repo::CourseRepo;
use crate::db::PgDb;
use crate::users::repo::UserRepo;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub users: Arc<dyn UserRepo>,
    pub courses: Arc<dyn CourseRepo>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let db = PgDb::connect(&config).await?;
        db.sync_schema().await?;
        Ok(Self::from_pg(Arc::new(config), db))
    }

    pub fn from_pg(config: Arc<AppConfig>, db: PgDb) -> Self {
        let db = Arc::new(db);
        Self {
            config,
            users: db.clone() as Arc<dyn UserRepo>,
            courses: db as Arc<dyn CourseRepo>,
        }
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        users: Arc<dyn UserRepo>,
        courses: Arc<dyn CourseRepo>,
    ) -> Self {
        Self {
            config,
            users,
            courses,
        }
    }
}
