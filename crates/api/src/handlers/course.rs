//! Handlers for the `/courses` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eduvillage_core::course::{CourseDraft, CourseInput};
use eduvillage_core::error::CoreError;
use eduvillage_core::types::DbId;
use eduvillage_db::models::course::Course;
use eduvillage_db::repositories::CourseRepo;

use crate::error::{AppError, AppResult};
use crate::handlers::MessageResponse;
use crate::middleware::rbac::{RequireAdmin, RequireCourseEditor};
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Course",
        id,
    })
}

/// POST /api/courses
///
/// The requesting teacher or admin becomes the instructor.
pub async fn create(
    RequireCourseEditor(user): RequireCourseEditor,
    State(state): State<AppState>,
    Json(input): Json<CourseInput>,
) -> AppResult<(StatusCode, Json<Course>)> {
    let draft = CourseDraft::from_input(input)?;
    let course = CourseRepo::create(&state.pool, &draft, Some(user.user_id)).await?;
    tracing::info!(
        course_id = course.id,
        user_id = user.user_id,
        kind = course.kind.tag().as_str(),
        "Course created"
    );
    Ok((StatusCode::CREATED, Json(course)))
}

/// GET /api/courses
pub async fn list(State(state): State<AppState>) -> AppResult<Json<Vec<Course>>> {
    let courses = CourseRepo::list(&state.pool).await?;
    Ok(Json(courses))
}

/// GET /api/courses/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Course>> {
    let course = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;
    Ok(Json(course))
}

/// PUT /api/courses/{id}
///
/// Applies the patch to the stored variant and revalidates the result.
pub async fn update(
    RequireCourseEditor(user): RequireCourseEditor,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<CourseInput>,
) -> AppResult<Json<Course>> {
    let existing = CourseRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| not_found(id))?;

    let draft = existing.draft().apply_patch(input)?;
    let course = CourseRepo::update(&state.pool, id, &draft)
        .await?
        .ok_or_else(|| not_found(id))?;

    tracing::info!(course_id = id, user_id = user.user_id, "Course updated");
    Ok(Json(course))
}

/// DELETE /api/courses/{id}
pub async fn delete(
    RequireAdmin(user): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !CourseRepo::delete(&state.pool, id).await? {
        return Err(not_found(id));
    }
    tracing::info!(course_id = id, user_id = user.user_id, "Course deleted");
    Ok(Json(MessageResponse::new("Course deleted successfully")))
}
