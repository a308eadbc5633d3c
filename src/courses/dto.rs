use serde::{Deserialize, Deserializer};

use super::repo_types::CourseFields;
use crate::validation::{present, Checks};

pub const COURSE_NOT_FOUND: &str = "Sorry, course not found.";
pub const NOT_COURSE_OWNER: &str = "Sorry, you are not the owner of the course.";

/// Body of POST and PUT /api/courses. A `userId` in the body is ignored;
/// the owner is always the authenticated user.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    #[serde(default, deserialize_with = "sent_or_null")]
    pub estimated_time: Option<Option<String>>,
    #[serde(default, deserialize_with = "sent_or_null")]
    pub materials_needed: Option<Option<String>>,
}

/// Only runs when the key is present, so `null` becomes `Some(None)`.
fn sent_or_null<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

impl CourseRequest {
    pub fn validate(self) -> Result<CourseFields, Vec<String>> {
        Checks::new()
            .require(&self.title, "Please check your course title")
            .require(&self.description, "Please check your course description")
            .finish()?;

        Ok(CourseFields {
            title: present(&self.title).unwrap_or_default().to_string(),
            description: present(&self.description).unwrap_or_default().to_string(),
            estimated_time: self.estimated_time,
            materials_needed: self.materials_needed,
        })
    }
}
