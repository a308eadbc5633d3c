use base64::{engine::general_purpose::STANDARD, Engine as _};
use tracing::{debug, warn};

use super::password::verify_password_blocking;
use crate::{error::ApiError, users::repo::UserRepo, users::repo_types::User};

/// Credentials carried by a Basic `Authorization` header.
#[derive(Debug, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Parses `Basic base64(email:password)`. `None` for anything malformed.
pub fn parse_basic(header: &str) -> Option<Credentials> {
    let (scheme, encoded) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("basic") {
        return None;
    }
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (email, password) = decoded.split_once(':')?;
    Some(Credentials {
        email: email.to_string(),
        password: password.to_string(),
    })
}

/// Resolves the user behind an `Authorization` header value.
pub async fn authenticate(users: &dyn UserRepo, header: Option<&str>) -> Result<User, ApiError> {
    let Some(header) = header else {
        warn!("authentication header not found");
        return Err(ApiError::Unauthorized);
    };
    let Some(creds) = parse_basic(header) else {
        warn!("malformed basic auth header");
        return Err(ApiError::Unauthorized);
    };

    let Some(user) = users.find_by_email(&creds.email).await? else {
        warn!(email = %creds.email, "user not found for email");
        return Err(ApiError::Unauthorized);
    };

    if !verify_password_blocking(creds.password, user.password.clone()).await? {
        warn!(email = %creds.email, user_id = user.id, "authentication failure");
        return Err(ApiError::Unauthorized);
    }

    debug!(user_id = user.id, "authenticated");
    Ok(user)
}
