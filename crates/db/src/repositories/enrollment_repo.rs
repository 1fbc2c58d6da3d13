//! Repository for the `enrollments` and `enrollment_completed_lessons` tables.

use std::collections::HashMap;

use eduvillage_core::enrollment::EnrollmentStatus;
use eduvillage_core::types::DbId;
use sqlx::PgPool;

use crate::models::enrollment::{CompletedLesson, EnrollmentDetail, EnrollmentRow};
use crate::repositories::CourseRepo;

/// Column list for `enrollments` queries.
const COLUMNS: &str = "id, user_id, course_id, progress, status, enrolled_at, \
    last_accessed_at, created_at, updated_at";

/// Provides CRUD operations for enrollments.
pub struct EnrollmentRepo;

impl EnrollmentRepo {
    /// Enroll a user in a course.
    ///
    /// Returns `None` when the pair is already enrolled. The unique constraint
    /// decides, so concurrent calls for the same pair create exactly one row.
    pub async fn enroll(
        pool: &PgPool,
        user_id: DbId,
        course_id: DbId,
    ) -> Result<Option<EnrollmentRow>, sqlx::Error> {
        let query = format!(
            "INSERT INTO enrollments (user_id, course_id) \
             VALUES ($1, $2) \
             ON CONFLICT ON CONSTRAINT uq_enrollments_user_course DO NOTHING \
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, EnrollmentRow>(&query)
            .bind(user_id)
            .bind(course_id)
            .fetch_optional(pool)
            .await
    }

    /// Find an enrollment by ID, scoped to its owner.
    pub async fn find_for_user(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
    ) -> Result<Option<EnrollmentRow>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM enrollments WHERE id = $1 AND user_id = $2");
        sqlx::query_as::<_, EnrollmentRow>(&query)
            .bind(id)
            .bind(user_id)
            .fetch_optional(pool)
            .await
    }

    /// List a user's enrollments, most recently accessed first.
    pub async fn list_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<EnrollmentRow>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM enrollments \
             WHERE user_id = $1 \
             ORDER BY last_accessed_at DESC, id DESC"
        );
        sqlx::query_as::<_, EnrollmentRow>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Record progress on an enrollment owned by `user_id`.
    ///
    /// Stores `progress` and its derived status, touches `last_accessed_at` and,
    /// when `lesson_id` is given, records the lesson as completed. Recording
    /// the same lesson again keeps the original completion time.
    ///
    /// Returns `None` if no enrollment matches `(id, user_id)`.
    pub async fn update_progress(
        pool: &PgPool,
        id: DbId,
        user_id: DbId,
        progress: i32,
        lesson_id: Option<&str>,
    ) -> Result<Option<EnrollmentRow>, sqlx::Error> {
        let status = EnrollmentStatus::from_progress(progress);
        let query = format!(
            "UPDATE enrollments SET \
                progress = $3, status = $4, last_accessed_at = NOW() \
             WHERE id = $1 AND user_id = $2 \
             RETURNING {COLUMNS}"
        );

        let mut tx = pool.begin().await?;
        let row = sqlx::query_as::<_, EnrollmentRow>(&query)
            .bind(id)
            .bind(user_id)
            .bind(progress)
            .bind(status.as_str())
            .fetch_optional(&mut *tx)
            .await?;

        if let (Some(row), Some(lesson_id)) = (&row, lesson_id) {
            sqlx::query(
                "INSERT INTO enrollment_completed_lessons (enrollment_id, lesson_id) \
                 VALUES ($1, $2) \
                 ON CONFLICT (enrollment_id, lesson_id) DO NOTHING",
            )
            .bind(row.id)
            .bind(lesson_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(row)
    }

    /// Delete an enrollment owned by `user_id`.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId, user_id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(user_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Completed lessons of the given enrollments, oldest completion first.
    pub async fn completed_lessons(
        pool: &PgPool,
        enrollment_ids: &[DbId],
    ) -> Result<Vec<CompletedLesson>, sqlx::Error> {
        if enrollment_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, CompletedLesson>(
            "SELECT enrollment_id, lesson_id, completed_at \
             FROM enrollment_completed_lessons \
             WHERE enrollment_id = ANY($1) \
             ORDER BY completed_at ASC, lesson_id ASC",
        )
        .bind(enrollment_ids)
        .fetch_all(pool)
        .await
    }

    /// Attach course data and completed lessons to enrollment rows,
    /// preserving the input order.
    pub async fn with_details(
        pool: &PgPool,
        rows: Vec<EnrollmentRow>,
    ) -> Result<Vec<EnrollmentDetail>, sqlx::Error> {
        let course_ids: Vec<DbId> = rows.iter().map(|r| r.course_id).collect();
        let enrollment_ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();

        let courses: HashMap<DbId, _> = CourseRepo::find_by_ids(pool, &course_ids)
            .await?
            .into_iter()
            .map(|course| (course.id, course))
            .collect();

        let mut lessons: HashMap<DbId, Vec<CompletedLesson>> = HashMap::new();
        for lesson in Self::completed_lessons(pool, &enrollment_ids).await? {
            lessons.entry(lesson.enrollment_id).or_default().push(lesson);
        }

        let mut details = Vec::with_capacity(rows.len());
        for row in rows {
            // A course can be deleted between the two reads; its enrollment goes with it.
            let course = match courses.get(&row.course_id) {
                Some(course) => course.clone(),
                None => {
                    tracing::warn!(
                        enrollment_id = row.id,
                        course_id = row.course_id,
                        "Enrollment course vanished while loading"
                    );
                    continue;
                }
            };
            let completed = lessons.remove(&row.id).unwrap_or_default();
            let detail = EnrollmentDetail::assemble(row, course, completed)
                .map_err(|e| sqlx::Error::Decode(Box::new(e)))?;
            details.push(detail);
        }
        Ok(details)
    }

    /// Load one enrollment with its details.
    pub async fn detail(
        pool: &PgPool,
        row: EnrollmentRow,
    ) -> Result<Option<EnrollmentDetail>, sqlx::Error> {
        Ok(Self::with_details(pool, vec![row]).await?.into_iter().next())
    }
}
