//! Enrollment entity model and response shape.

use eduvillage_core::enrollment::EnrollmentStatus;
use eduvillage_core::error::CoreError;
use eduvillage_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

use crate::models::course::Course;

/// A row from the `enrollments` table.
#[derive(Debug, Clone, FromRow)]
pub struct EnrollmentRow {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub progress: i32,
    pub status: String,
    pub enrolled_at: Timestamp,
    pub last_accessed_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A row from the `enrollment_completed_lessons` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedLesson {
    #[serde(skip)]
    pub enrollment_id: DbId,
    pub lesson_id: String,
    pub completed_at: Timestamp,
}

/// An enrollment with its course and completed lessons attached.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentDetail {
    pub id: DbId,
    pub user_id: DbId,
    pub course_id: DbId,
    pub progress: i32,
    pub status: EnrollmentStatus,
    pub completed_lessons: Vec<CompletedLesson>,
    pub enrolled_at: Timestamp,
    pub last_accessed_at: Timestamp,
    pub course: Course,
}

impl EnrollmentDetail {
    pub fn assemble(
        row: EnrollmentRow,
        course: Course,
        completed_lessons: Vec<CompletedLesson>,
    ) -> Result<Self, CoreError> {
        Ok(Self {
            id: row.id,
            user_id: row.user_id,
            course_id: row.course_id,
            progress: row.progress,
            status: EnrollmentStatus::parse(&row.status)?,
            completed_lessons,
            enrolled_at: row.enrolled_at,
            last_accessed_at: row.last_accessed_at,
            course,
        })
    }
}
