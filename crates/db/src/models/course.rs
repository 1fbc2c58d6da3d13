//! Course entity model.
//!
//! Both course variants live in one `courses` table. [`CourseRow`] mirrors the
//! columns; [`Course`] is the validated shape with the variant fields folded
//! into a [`CourseKind`].

use eduvillage_core::course::{
    CourseDraft, CourseKind, CourseStatus, GeneralLevel, KindTag, SchoolLevel, Section, Stream,
};
use eduvillage_core::error::CoreError;
use eduvillage_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::FromRow;

/// Raw row from the `courses` table.
#[derive(Debug, Clone, FromRow)]
pub struct CourseRow {
    pub id: DbId,
    pub kind: String,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub thumbnail: Option<String>,
    pub sections: Option<Json<Vec<Section>>>,
    pub total_lessons: i32,
    pub instructor_id: Option<DbId>,
    pub class_number: Option<i32>,
    pub subjects: Vec<String>,
    pub stream: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
    pub level: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A course as returned by the API.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub thumbnail: Option<String>,
    pub sections: Option<Vec<Section>>,
    pub total_lessons: i32,
    pub instructor_id: Option<DbId>,
    #[serde(flatten)]
    pub kind: CourseKind,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

fn stored<T>(value: Option<T>, column: &str, id: DbId) -> Result<T, CoreError> {
    value.ok_or_else(|| CoreError::Internal(format!("course {id} is missing {column}")))
}

impl TryFrom<CourseRow> for Course {
    type Error = CoreError;

    fn try_from(row: CourseRow) -> Result<Self, Self::Error> {
        let kind = match KindTag::parse(&row.kind)? {
            KindTag::School => CourseKind::School {
                class_number: stored(row.class_number, "class_number", row.id)?,
                subjects: row.subjects,
                stream: row.stream.as_deref().map(Stream::parse).transpose()?,
                level: SchoolLevel::parse(&row.level)?,
                color: stored(row.color, "color", row.id)?,
            },
            KindTag::General => CourseKind::General {
                category: stored(row.category, "category", row.id)?,
                level: GeneralLevel::parse(&row.level)?,
                status: CourseStatus::parse(&stored(row.status, "status", row.id)?)?,
            },
        };

        Ok(Course {
            id: row.id,
            title: row.title,
            description: row.description,
            price: row.price,
            thumbnail: row.thumbnail,
            sections: row.sections.map(|json| json.0),
            total_lessons: row.total_lessons,
            instructor_id: row.instructor_id,
            kind,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for Course {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        let raw = CourseRow::from_row(row)?;
        Course::try_from(raw).map_err(|e| sqlx::Error::Decode(Box::new(e)))
    }
}

impl Course {
    /// The editable part of this course, used as the base for patches.
    pub fn draft(&self) -> CourseDraft {
        CourseDraft {
            title: self.title.clone(),
            description: self.description.clone(),
            price: self.price,
            thumbnail: self.thumbnail.clone(),
            sections: self.sections.clone(),
            total_lessons: self.total_lessons,
            kind: self.kind.clone(),
        }
    }
}

/// Column values for an insert or full update, flattened from a draft.
#[derive(Debug, Clone)]
pub struct CourseColumns<'a> {
    pub kind: &'static str,
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub price: f64,
    pub thumbnail: Option<&'a str>,
    pub sections: Option<Json<&'a Vec<Section>>>,
    pub total_lessons: i32,
    pub class_number: Option<i32>,
    pub subjects: &'a [String],
    pub stream: Option<&'static str>,
    pub color: Option<&'a str>,
    pub category: Option<&'a str>,
    pub status: Option<&'static str>,
    pub level: &'static str,
}

impl<'a> From<&'a CourseDraft> for CourseColumns<'a> {
    fn from(draft: &'a CourseDraft) -> Self {
        let base = CourseColumns {
            kind: draft.kind.tag().as_str(),
            title: &draft.title,
            description: draft.description.as_deref(),
            price: draft.price,
            thumbnail: draft.thumbnail.as_deref(),
            sections: draft.sections.as_ref().map(Json),
            total_lessons: draft.total_lessons,
            class_number: None,
            subjects: &[],
            stream: None,
            color: None,
            category: None,
            status: None,
            level: "",
        };
        match &draft.kind {
            CourseKind::School {
                class_number,
                subjects,
                stream,
                level,
                color,
            } => CourseColumns {
                class_number: Some(*class_number),
                subjects: subjects.as_slice(),
                stream: stream.map(Stream::as_str),
                color: Some(color.as_str()),
                level: level.as_str(),
                ..base
            },
            CourseKind::General {
                category,
                level,
                status,
            } => CourseColumns {
                category: Some(category.as_str()),
                status: Some(status.as_str()),
                level: level.as_str(),
                ..base
            },
        }
    }
}
