use axum::{
    extract::State,
    http::{header::LOCATION, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tracing::{info, instrument, warn};

use super::{
    dto::{CourseRequest, COURSE_NOT_FOUND, NOT_COURSE_OWNER},
    repo_types::{Course, CourseWithOwner},
};
use crate::{
    app::route_not_found,
    auth::{policy::ensure_owner, AuthUser},
    error::{ApiError, AppJson, AppPath},
    state::AppState,
    users::repo_types::User,
};

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/courses",
            get(list_courses)
                .post(create_course)
                .fallback(route_not_found),
        )
        .route(
            "/courses/:id",
            get(get_course)
                .put(update_course)
                .delete(delete_course)
                .fallback(route_not_found),
        )
}

/// GET /api/courses
#[instrument(skip(state))]
pub async fn list_courses(
    State(state): State<AppState>,
) -> Result<Json<Vec<CourseWithOwner>>, ApiError> {
    let courses = state.courses.list_with_owner().await?;
    Ok(Json(courses))
}

/// GET /api/courses/:id
#[instrument(skip(state))]
pub async fn get_course(
    State(state): State<AppState>,
    AppPath(id): AppPath<i32>,
) -> Result<Json<CourseWithOwner>, ApiError> {
    let course = state
        .courses
        .find_with_owner(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(COURSE_NOT_FOUND.into()))?;
    Ok(Json(course))
}

/// POST /api/courses
#[instrument(skip_all)]
pub async fn create_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppJson(payload): AppJson<CourseRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let fields = payload.validate().map_err(|errors| {
        warn!(?errors, "invalid course payload");
        ApiError::Validation(errors)
    })?;

    let course = state.courses.create(user.id, fields).await?;
    info!(course_id = course.id, user_id = user.id, "course created");
    Ok((StatusCode::CREATED, [(LOCATION, format!("courses/{}", course.id))]))
}

/// PUT /api/courses/:id
#[instrument(skip(state, user, payload))]
pub async fn update_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i32>,
    AppJson(payload): AppJson<CourseRequest>,
) -> Result<StatusCode, ApiError> {
    let fields = payload.validate().map_err(|errors| {
        warn!(?errors, "invalid course payload");
        ApiError::Validation(errors)
    })?;

    let course = owned_course(&state, &user, id).await?;
    state
        .courses
        .update(course.id, fields)
        .await?
        .ok_or_else(|| ApiError::NotFound(COURSE_NOT_FOUND.into()))?;

    info!(course_id = id, user_id = user.id, "course updated");
    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /api/courses/:id
#[instrument(skip(state, user))]
pub async fn delete_course(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    AppPath(id): AppPath<i32>,
) -> Result<StatusCode, ApiError> {
    let course = owned_course(&state, &user, id).await?;
    if !state.courses.delete(course.id).await? {
        return Err(ApiError::NotFound(COURSE_NOT_FOUND.into()));
    }

    info!(course_id = id, user_id = user.id, "course deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// Loads course `id`, failing with 404 when absent and 403 when `user` is not its owner.
async fn owned_course(
    state: &AppState,
    user: &User,
    id: i32,
) -> Result<Course, ApiError> {
    let course = state
        .courses
        .find(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(COURSE_NOT_FOUND.into()))?;

    if let Err(e) = ensure_owner(&course, user, NOT_COURSE_OWNER) {
        warn!(course_id = id, owner_id = course.user_id, user_id = user.id, "not the course owner");
        return Err(e);
    }
    Ok(course)
}
