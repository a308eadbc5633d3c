//! In-memory repositories and request helpers for router-level tests.

use std::sync::{Arc, Mutex};

use argon2::{
    password_hash::{PasswordHasher, SaltString},
    Algorithm, Argon2, Params, Version,
};
use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, Response},
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use time::OffsetDateTime;
use tower::ServiceExt;

use crate::{
    app::build_app,
    config::AppConfig,
    courses::{
        repo::CourseRepo,
        repo_types::{Course, CourseFields, CourseWithOwner},
    },
    state::AppState,
    users::{
        dto::PublicUser,
        repo::UserRepo,
        repo_types::{NewUser, User},
    },
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    courses: Vec<Course>,
}

/// Shared in-memory tables implementing both repositories.
#[derive(Clone, Default)]
pub struct MemoryDb {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryDb {
    pub fn users(&self) -> Vec<User> {
        self.tables.lock().unwrap().users.clone()
    }

    pub fn courses(&self) -> Vec<Course> {
        self.tables.lock().unwrap().courses.clone()
    }

    pub fn course(&self, id: i32) -> Option<Course> {
        self.courses().into_iter().find(|c| c.id == id)
    }

    /// Inserts a user whose password is hashed with cheap argon2 params.
    pub fn seed_user(&self, email: &str, password: &str) -> User {
        let mut t = self.tables.lock().unwrap();
        let user = User {
            id: t.users.len() as i32 + 1,
            first_name: "Seed".into(),
            last_name: "User".into(),
            email_address: email.into(),
            password: cheap_hash(password),
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        t.users.push(user.clone());
        user
    }

    pub fn seed_course(&self, owner_id: i32, title: &str) -> Course {
        let mut t = self.tables.lock().unwrap();
        let course = Course {
            id: next_course_id(&t),
            user_id: owner_id,
            title: title.into(),
            description: format!("About {title}"),
            estimated_time: Some("2 hours".into()),
            materials_needed: None,
            created_at: OffsetDateTime::now_utc(),
            updated_at: OffsetDateTime::now_utc(),
        };
        t.courses.push(course.clone());
        course
    }
}

fn next_course_id(t: &Tables) -> i32 {
    t.courses.iter().map(|c| c.id).max().unwrap_or(0) + 1
}

fn with_owner(t: &Tables, c: &Course) -> anyhow::Result<CourseWithOwner> {
    let owner = t
        .users
        .iter()
        .find(|u| u.id == c.user_id)
        .ok_or_else(|| anyhow::anyhow!("course {} has no owner", c.id))?;
    Ok(CourseWithOwner {
        id: c.id,
        user_id: c.user_id,
        title: c.title.clone(),
        description: c.description.clone(),
        estimated_time: c.estimated_time.clone(),
        materials_needed: c.materials_needed.clone(),
        user: PublicUser::from(owner),
    })
}

pub fn cheap_hash(password: &str) -> String {
    let params = Params::new(8, 1, 1, None).unwrap();
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut OsRng);
    argon2
        .hash_password(password.as_bytes(), &salt)
        .unwrap()
        .to_string()
}

#[async_trait]
impl UserRepo for MemoryDb {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let t = self.tables.lock().unwrap();
        Ok(t.users.iter().find(|u| u.email_address == email).cloned())
    }

    async fn create(&self, user: NewUser) -> anyhow::Result<User> {
        let mut t = self.tables.lock().unwrap();
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: t.users.len() as i32 + 1,
            first_name: user.first_name,
            last_name: user.last_name,
            email_address: user.email_address,
            password: user.password,
            created_at: now,
            updated_at: now,
        };
        t.users.push(user.clone());
        Ok(user)
    }
}

#[async_trait]
impl CourseRepo for MemoryDb {
    async fn list_with_owner(&self) -> anyhow::Result<Vec<CourseWithOwner>> {
        let t = self.tables.lock().unwrap();
        t.courses.iter().map(|c| with_owner(&t, c)).collect()
    }

    async fn find_with_owner(&self, id: i32) -> anyhow::Result<Option<CourseWithOwner>> {
        let t = self.tables.lock().unwrap();
        t.courses
            .iter()
            .find(|c| c.id == id)
            .map(|c| with_owner(&t, c))
            .transpose()
    }

    async fn find(&self, id: i32) -> anyhow::Result<Option<Course>> {
        Ok(self.course(id))
    }

    async fn create(&self, owner_id: i32, fields: CourseFields) -> anyhow::Result<Course> {
        let mut t = self.tables.lock().unwrap();
        if !t.users.iter().any(|u| u.id == owner_id) {
            anyhow::bail!("foreign key violation: user {owner_id}");
        }
        let now = OffsetDateTime::now_utc();
        let course = Course {
            id: next_course_id(&t),
            user_id: owner_id,
            title: fields.title,
            description: fields.description,
            estimated_time: fields.estimated_time.flatten(),
            materials_needed: fields.materials_needed.flatten(),
            created_at: now,
            updated_at: now,
        };
        t.courses.push(course.clone());
        Ok(course)
    }

    async fn update(&self, id: i32, fields: CourseFields) -> anyhow::Result<Option<Course>> {
        let mut t = self.tables.lock().unwrap();
        let Some(c) = t.courses.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        c.title = fields.title;
        c.description = fields.description;
        if let Some(v) = fields.estimated_time {
            c.estimated_time = v;
        }
        if let Some(v) = fields.materials_needed {
            c.materials_needed = v;
        }
        c.updated_at = OffsetDateTime::now_utc();
        Ok(Some(c.clone()))
    }

    async fn delete(&self, id: i32) -> anyhow::Result<bool> {
        let mut t = self.tables.lock().unwrap();
        let before = t.courses.len();
        t.courses.retain(|c| c.id != id);
        Ok(t.courses.len() != before)
    }
}

/// Repository whose every call fails, for 500 paths.
pub struct BrokenDb;

#[async_trait]
impl UserRepo for BrokenDb {
    async fn find_by_email(&self, _email: &str) -> anyhow::Result<Option<User>> {
        anyhow::bail!("database is down")
    }
    async fn create(&self, _user: NewUser) -> anyhow::Result<User> {
        anyhow::bail!("database is down")
    }
}

#[async_trait]
impl CourseRepo for BrokenDb {
    async fn list_with_owner(&self) -> anyhow::Result<Vec<CourseWithOwner>> {
        anyhow::bail!("database is down")
    }
    async fn find_with_owner(&self, _id: i32) -> anyhow::Result<Option<CourseWithOwner>> {
        anyhow::bail!("database is down")
    }
    async fn find(&self, _id: i32) -> anyhow::Result<Option<Course>> {
        anyhow::bail!("database is down")
    }
    async fn create(&self, _owner_id: i32, _fields: CourseFields) -> anyhow::Result<Course> {
        anyhow::bail!("database is down")
    }
    async fn update(&self, _id: i32, _fields: CourseFields) -> anyhow::Result<Option<Course>> {
        anyhow::bail!("database is down")
    }
    async fn delete(&self, _id: i32) -> anyhow::Result<bool> {
        anyhow::bail!("database is down")
    }
}

pub fn test_config() -> AppConfig {
    AppConfig {
        database_url: "postgres://unused".into(),
        db_max_connections: 1,
        host: "127.0.0.1".into(),
        port: 0,
        enable_global_error_logging: true,
    }
}

pub fn memory_state() -> (AppState, MemoryDb) {
    let db = MemoryDb::default();
    let state = AppState::from_parts(
        Arc::new(test_config()),
        Arc::new(db.clone()),
        Arc::new(db.clone()),
    );
    (state, db)
}

pub fn memory_app() -> (Router, MemoryDb) {
    let (state, db) = memory_state();
    (build_app(state), db)
}

pub fn broken_app() -> Router {
    let db = Arc::new(BrokenDb);
    build_app(AppState::from_parts(
        Arc::new(test_config()),
        db.clone(),
        db,
    ))
}

pub fn basic_auth(email: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{email}:{password}")))
}

/// Sends one request through the router.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    auth: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut req = Request::builder().method(method).uri(uri);
    if let Some(auth) = auth {
        req = req.header(header::AUTHORIZATION, auth);
    }
    let req = match body {
        Some(json) => req
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => req.body(Body::empty()),
    }
    .unwrap();
    app.clone().oneshot(req).await.unwrap()
}

pub async fn body_json(res: Response<Body>) -> serde_json::Value {
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

pub async fn body_bytes(res: Response<Body>) -> Vec<u8> {
    to_bytes(res.into_body(), usize::MAX).await.unwrap().to_vec()
}
