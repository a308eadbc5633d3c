use serde::{Deserialize, Serialize};

use super::repo_types::User;
use crate::validation::{is_valid_email, present, Checks};

pub const MIN_PASSWORD_LEN: usize = 6;

/// Request body for user registration.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email_address: Option<String>,
    pub password: Option<String>,
}

/// A registration payload that passed validation.
#[derive(Debug)]
pub struct Registration {
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub password: String,
}

impl RegisterRequest {
    pub fn validate(self) -> Result<Registration, Vec<String>> {
        let email_ok = present(&self.email_address).is_some_and(is_valid_email);
        let password_len = present(&self.password).map(|p| p.chars().count());

        let mut checks = Checks::new();
        checks
            .require(&self.first_name, "Please check your first name")
            .require(&self.last_name, "Please check your last name")
            .check(email_ok, "Please check your email")
            .require(&self.password, "Please introduce a valid password")
            .check(
                password_len.map_or(true, |n| n >= MIN_PASSWORD_LEN),
                "Please your password need at least 6 characters",
            );
        checks.finish()?;

        Ok(Registration {
            first_name: self.first_name.unwrap_or_default(),
            last_name: self.last_name.unwrap_or_default(),
            email_address: self.email_address.unwrap_or_default(),
            password: self.password.unwrap_or_default(),
        })
    }
}

/// Public part of the user returned to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
}

impl From<&User> for PublicUser {
    fn from(u: &User) -> Self {
        Self {
            id: u.id,
            first_name: u.first_name.clone(),
            last_name: u.last_name.clone(),
            email_address: u.email_address.clone(),
        }
    }
}
