use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::services::authenticate;
use crate::{error::ApiError, state::AppState, users::repo_types::User};

/// Extracts Basic credentials and resolves them to the stored user.
pub struct AuthUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // A non-ASCII header value is treated like a missing one.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());

        let user = authenticate(state.users.as_ref(), header).await?;
        Ok(AuthUser(user))
    }
}
