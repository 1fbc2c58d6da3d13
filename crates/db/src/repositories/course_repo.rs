//! Repository for the `courses` table.

use eduvillage_core::course::CourseDraft;
use eduvillage_core::types::DbId;
use sqlx::postgres::PgArguments;
use sqlx::query::QueryAs;
use sqlx::{PgPool, Postgres};

use crate::models::course::{Course, CourseColumns};

/// Column list for `courses` queries.
const COLUMNS: &str = "id, kind, title, description, price, thumbnail, sections, \
    total_lessons, instructor_id, class_number, subjects, stream, color, \
    category, status, level, created_at, updated_at";

/// Catalog order: school classes ascending, unstreamed before streamed,
/// general courses (no class number) last.
const CATALOG_ORDER: &str = "class_number ASC NULLS LAST, stream ASC NULLS FIRST, id ASC";

/// Bind the draft columns as `$2..=$15` in insert/update column order.
fn bind_draft<'q>(
    query: QueryAs<'q, Postgres, Course, PgArguments>,
    cols: CourseColumns<'q>,
) -> QueryAs<'q, Postgres, Course, PgArguments> {
    query
        .bind(cols.kind)
        .bind(cols.title)
        .bind(cols.description)
        .bind(cols.price)
        .bind(cols.thumbnail)
        .bind(cols.sections)
        .bind(cols.total_lessons)
        .bind(cols.class_number)
        .bind(cols.subjects)
        .bind(cols.stream)
        .bind(cols.color)
        .bind(cols.category)
        .bind(cols.status)
        .bind(cols.level)
}

fn insert_query() -> String {
    format!(
        "INSERT INTO courses \
            (instructor_id, kind, title, description, price, thumbnail, sections, \
             total_lessons, class_number, subjects, stream, color, category, status, level) \
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15) \
         RETURNING {COLUMNS}"
    )
}

/// Provides CRUD operations for courses.
pub struct CourseRepo;

impl CourseRepo {
    /// Insert a validated course owned by `instructor_id`.
    pub async fn create(
        pool: &PgPool,
        draft: &CourseDraft,
        instructor_id: Option<DbId>,
    ) -> Result<Course, sqlx::Error> {
        let query = insert_query();
        bind_draft(
            sqlx::query_as::<_, Course>(&query).bind(instructor_id),
            CourseColumns::from(draft),
        )
        .fetch_one(pool)
        .await
    }

    /// Insert several courses in one transaction. Either all are created or none.
    pub async fn create_many(
        pool: &PgPool,
        drafts: &[CourseDraft],
        instructor_id: Option<DbId>,
    ) -> Result<Vec<Course>, sqlx::Error> {
        let query = insert_query();
        let mut tx = pool.begin().await?;
        let mut created = Vec::with_capacity(drafts.len());
        for draft in drafts {
            let course = bind_draft(
                sqlx::query_as::<_, Course>(&query).bind(instructor_id),
                CourseColumns::from(draft),
            )
            .fetch_one(&mut *tx)
            .await?;
            created.push(course);
        }
        tx.commit().await?;
        Ok(created)
    }

    /// Find a course by its internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = $1");
        sqlx::query_as::<_, Course>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Fetch every course whose ID is in `ids`. Missing IDs are skipped.
    pub async fn find_by_ids(pool: &PgPool, ids: &[DbId]) -> Result<Vec<Course>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let query = format!("SELECT {COLUMNS} FROM courses WHERE id = ANY($1)");
        sqlx::query_as::<_, Course>(&query)
            .bind(ids)
            .fetch_all(pool)
            .await
    }

    /// List all courses in catalog order.
    pub async fn list(pool: &PgPool) -> Result<Vec<Course>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM courses ORDER BY {CATALOG_ORDER}");
        sqlx::query_as::<_, Course>(&query).fetch_all(pool).await
    }

    /// Number of courses in the catalog.
    pub async fn count(pool: &PgPool) -> Result<i64, sqlx::Error> {
        let count: Option<i64> = sqlx::query_scalar("SELECT COUNT(*) FROM courses")
            .fetch_one(pool)
            .await?;
        Ok(count.unwrap_or(0))
    }

    /// Overwrite every editable column of a course with the patched draft.
    ///
    /// Returns `None` if no course with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        draft: &CourseDraft,
    ) -> Result<Option<Course>, sqlx::Error> {
        let query = format!(
            "UPDATE courses SET \
                kind = $2, title = $3, description = $4, price = $5, thumbnail = $6, \
                sections = $7, total_lessons = $8, class_number = $9, subjects = $10, \
                stream = $11, color = $12, category = $13, status = $14, level = $15 \
             WHERE id = $1 \
             RETURNING {COLUMNS}"
        );
        bind_draft(
            sqlx::query_as::<_, Course>(&query).bind(id),
            CourseColumns::from(draft),
        )
        .fetch_optional(pool)
        .await
    }

    /// Delete a course. Enrollments and cart lines for it are removed by cascade.
    ///
    /// Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
