use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

use crate::users::dto::PublicUser;

/// Course record in the database.
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Fields a client may set on a course. For the optional columns the outer
/// `None` means "not sent" and `Some(None)` means an explicit `null`.
#[derive(Debug, Clone, Default)]
pub struct CourseFields {
    pub title: String,
    pub description: String,
    pub estimated_time: Option<Option<String>>,
    pub materials_needed: Option<Option<String>>,
}

impl CourseFields {
    /// Column value on insert, where "not sent" and `null` both store NULL.
    pub fn estimated_time_value(&self) -> Option<&str> {
        self.estimated_time.as_ref().and_then(|v| v.as_deref())
    }

    pub fn materials_needed_value(&self) -> Option<&str> {
        self.materials_needed.as_ref().and_then(|v| v.as_deref())
    }
}

/// Joined course + owner row.
#[derive(Debug, FromRow)]
pub struct CourseWithOwnerRow {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    pub owner_id: i32,
    pub owner_first_name: String,
    pub owner_last_name: String,
    pub owner_email_address: String,
}

/// Course as returned by the read endpoints, owner embedded under `User`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWithOwner {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: String,
    pub estimated_time: Option<String>,
    pub materials_needed: Option<String>,
    #[serde(rename = "User")]
    pub user: PublicUser,
}

impl From<CourseWithOwnerRow> for CourseWithOwner {
    fn from(r: CourseWithOwnerRow) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            title: r.title,
            description: r.description,
            estimated_time: r.estimated_time,
            materials_needed: r.materials_needed,
            user: PublicUser {
                id: r.owner_id,
                first_name: r.owner_first_name,
                last_name: r.owner_last_name,
                email_address: r.owner_email_address,
            },
        }
    }
}
