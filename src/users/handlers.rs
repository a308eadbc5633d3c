use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{PublicUser, RegisterRequest},
    repo_types::NewUser,
};
use crate::{
    app::route_not_found,
    auth::{password::hash_password_blocking, AuthUser},
    error::{ApiError, AppJson},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new().route(
        "/users",
        get(current_user).post(register).fallback(route_not_found),
    )
}

/// GET /api/users
#[instrument(skip_all)]
pub async fn current_user(AuthUser(user): AuthUser) -> Json<PublicUser> {
    Json(PublicUser::from(&user))
}

/// POST /api/users
#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let reg = payload.validate().map_err(|errors| {
        warn!(?errors, "invalid registration payload");
        ApiError::Validation(errors)
    })?;

    // Check-then-insert; emails are not unique at the storage layer.
    if state.users.find_by_email(&reg.email_address).await?.is_some() {
        warn!(email = %reg.email_address, "email already registered");
        return Err(ApiError::BadRequest("This user already exists".into()));
    }

    let password = hash_password_blocking(reg.password).await?;
    let user = state
        .users
        .create(NewUser {
            first_name: reg.first_name,
            last_name: reg.last_name,
            email_address: reg.email_address,
            password,
        })
        .await?;

    info!(user_id = user.id, email = %user.email_address, "user registered");
    Ok((StatusCode::CREATED, [(LOCATION, "/")]))
}
