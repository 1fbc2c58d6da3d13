//! Handlers for the `/enrollments` resource.
//!
//! Every lookup is keyed by `(enrollment id, caller id)`, so one user's
//! enrollment is indistinguishable from a missing one to everybody else.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use eduvillage_core::enrollment::{normalize_lesson_id, validate_progress};
use eduvillage_core::error::CoreError;
use eduvillage_core::types::DbId;
use eduvillage_db::models::enrollment::{EnrollmentDetail, EnrollmentRow};
use eduvillage_db::repositories::{CourseRepo, EnrollmentRepo};
use serde::Deserialize;

use crate::error::{AppError, AppResult};
use crate::handlers::MessageResponse;
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Request body for `POST /enrollments`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub course_id: DbId,
}

/// Request body for `PUT /enrollments/{id}/progress`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRequest {
    pub progress: i32,
    pub lesson_id: Option<String>,
}

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Enrollment",
        id,
    })
}

async fn load_detail(state: &AppState, row: EnrollmentRow) -> AppResult<EnrollmentDetail> {
    let id = row.id;
    EnrollmentRepo::detail(&state.pool, row)
        .await?
        .ok_or_else(|| not_found(id))
}

/// GET /api/enrollments
///
/// Also mounted at `GET /api/courses/enrolled/my-courses`.
pub async fn list_mine(
    auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<EnrollmentDetail>>> {
    let rows = EnrollmentRepo::list_for_user(&state.pool, auth.user_id).await?;
    let enrollments = EnrollmentRepo::with_details(&state.pool, rows).await?;
    Ok(Json(enrollments))
}

/// POST /api/enrollments
pub async fn enroll(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<EnrollRequest>,
) -> AppResult<(StatusCode, Json<EnrollmentDetail>)> {
    if CourseRepo::find_by_id(&state.pool, input.course_id)
        .await?
        .is_none()
    {
        return Err(AppError::Core(CoreError::NotFound {
            entity: "Course",
            id: input.course_id,
        }));
    }

    let row = EnrollmentRepo::enroll(&state.pool, auth.user_id, input.course_id)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(
                "Already enrolled in this course".into(),
            ))
        })?;

    tracing::info!(
        enrollment_id = row.id,
        user_id = auth.user_id,
        course_id = input.course_id,
        "User enrolled"
    );
    Ok((StatusCode::CREATED, Json(load_detail(&state, row).await?)))
}

/// PUT /api/enrollments/{id}/progress
pub async fn update_progress(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<ProgressRequest>,
) -> AppResult<Json<EnrollmentDetail>> {
    validate_progress(input.progress)?;
    let lesson_id = normalize_lesson_id(input.lesson_id.as_deref());

    let row = EnrollmentRepo::update_progress(
        &state.pool,
        id,
        auth.user_id,
        input.progress,
        lesson_id.as_deref(),
    )
    .await?
    .ok_or_else(|| not_found(id))?;

    tracing::debug!(
        enrollment_id = id,
        user_id = auth.user_id,
        progress = row.progress,
        status = %row.status,
        "Progress updated"
    );
    Ok(Json(load_detail(&state, row).await?))
}

/// DELETE /api/enrollments/{id}
pub async fn unenroll(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<MessageResponse>> {
    if !EnrollmentRepo::delete(&state.pool, id, auth.user_id).await? {
        return Err(not_found(id));
    }
    tracing::info!(enrollment_id = id, user_id = auth.user_id, "User unenrolled");
    Ok(Json(MessageResponse::new("Unenrolled successfully")))
}
