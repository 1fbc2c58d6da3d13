//! Course catalog domain logic.
//!
//! A course is either a *school course* (keyed by class number 1-12 and an
//! optional senior-secondary stream) or a *general course* (category, skill
//! level and publication status). Both share a title, price, thumbnail and an
//! optional `sections -> lessons` hierarchy.
//!
//! Clients send one flat [`CourseInput`] for both create and update; it is
//! validated here into a [`CourseDraft`] whose [`CourseKind`] carries only the
//! fields that belong to that variant. Whenever a draft has sections,
//! `total_lessons` is recomputed from them, on create and on every patch.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Enumerated fields
// ---------------------------------------------------------------------------

/// Lowercase a label and collapse `_`, `-` and repeated whitespace into single
/// spaces so `"senior_secondary"` and `"Senior  Secondary"` compare equal.
fn fold_label(raw: &str) -> String {
    raw.replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Grade band of a school course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchoolLevel {
    Primary,
    Middle,
    #[serde(rename = "Senior Secondary")]
    SeniorSecondary,
}

impl SchoolLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            SchoolLevel::Primary => "Primary",
            SchoolLevel::Middle => "Middle",
            SchoolLevel::SeniorSecondary => "Senior Secondary",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match fold_label(raw).as_str() {
            "primary" => Ok(SchoolLevel::Primary),
            "middle" => Ok(SchoolLevel::Middle),
            "senior secondary" => Ok(SchoolLevel::SeniorSecondary),
            _ => Err(CoreError::Validation(format!(
                "Unknown school level: '{raw}'. Valid levels: Primary, Middle, Senior Secondary"
            ))),
        }
    }

    /// Band a class number falls into: 1-5 primary, 6-10 middle, 11-12 senior.
    pub fn for_class(class_number: i32) -> Self {
        match class_number {
            i32::MIN..=5 => SchoolLevel::Primary,
            6..=10 => SchoolLevel::Middle,
            _ => SchoolLevel::SeniorSecondary,
        }
    }

    /// Catalog card color used when a course does not specify one.
    pub fn default_color(self) -> &'static str {
        match self {
            SchoolLevel::Primary => "bg-success",
            SchoolLevel::Middle => "bg-primary",
            SchoolLevel::SeniorSecondary => "bg-warning",
        }
    }
}

/// Senior-secondary subject track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Stream {
    #[serde(rename = "PCM")]
    Pcm,
    #[serde(rename = "PCB")]
    Pcb,
    Commerce,
}

impl Stream {
    pub fn as_str(self) -> &'static str {
        match self {
            Stream::Pcm => "PCM",
            Stream::Pcb => "PCB",
            Stream::Commerce => "Commerce",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match fold_label(raw).as_str() {
            "pcm" => Ok(Stream::Pcm),
            "pcb" => Ok(Stream::Pcb),
            "commerce" => Ok(Stream::Commerce),
            _ => Err(CoreError::Validation(format!(
                "Unknown stream: '{raw}'. Valid streams: PCM, PCB, Commerce"
            ))),
        }
    }
}

/// Difficulty of a general course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneralLevel {
    Beginner,
    Intermediate,
    Advanced,
}

impl GeneralLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            GeneralLevel::Beginner => "beginner",
            GeneralLevel::Intermediate => "intermediate",
            GeneralLevel::Advanced => "advanced",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match fold_label(raw).as_str() {
            "beginner" => Ok(GeneralLevel::Beginner),
            "intermediate" => Ok(GeneralLevel::Intermediate),
            "advanced" => Ok(GeneralLevel::Advanced),
            _ => Err(CoreError::Validation(format!(
                "Unknown course level: '{raw}'. Valid levels: beginner, intermediate, advanced"
            ))),
        }
    }
}

/// Publication state of a general course.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl CourseStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CourseStatus::Draft => "draft",
            CourseStatus::Published => "published",
            CourseStatus::Archived => "archived",
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match fold_label(raw).as_str() {
            "draft" => Ok(CourseStatus::Draft),
            "published" => Ok(CourseStatus::Published),
            "archived" => Ok(CourseStatus::Archived),
            _ => Err(CoreError::Validation(format!(
                "Unknown course status: '{raw}'. Valid statuses: draft, published, archived"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Sections and lessons
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub title: String,
    /// Free-form content type, e.g. `"video"` or `"reading"`.
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub lesson_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub title: String,
    #[serde(default)]
    pub lessons: Vec<Lesson>,
}

/// Total number of lessons across all sections.
pub fn count_lessons(sections: &[Section]) -> i32 {
    let total: usize = sections.iter().map(|s| s.lessons.len()).sum();
    i32::try_from(total).unwrap_or(i32::MAX)
}

// ---------------------------------------------------------------------------
// Course variants
// ---------------------------------------------------------------------------

/// Discriminant of [`CourseKind`], as sent in the `kind` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KindTag {
    School,
    General,
}

pub const KIND_SCHOOL: &str = "school";
pub const KIND_GENERAL: &str = "general";

impl KindTag {
    pub fn as_str(self) -> &'static str {
        match self {
            KindTag::School => KIND_SCHOOL,
            KindTag::General => KIND_GENERAL,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match fold_label(raw).as_str() {
            KIND_SCHOOL => Ok(KindTag::School),
            KIND_GENERAL => Ok(KindTag::General),
            _ => Err(CoreError::Validation(format!(
                "Unknown course kind: '{raw}'. Valid kinds: {KIND_SCHOOL}, {KIND_GENERAL}"
            ))),
        }
    }
}

/// Variant-specific course fields. Serialized inline with a `kind` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CourseKind {
    #[serde(rename_all = "camelCase")]
    School {
        class_number: i32,
        subjects: Vec<String>,
        stream: Option<Stream>,
        level: SchoolLevel,
        color: String,
    },
    #[serde(rename_all = "camelCase")]
    General {
        category: String,
        level: GeneralLevel,
        status: CourseStatus,
    },
}

impl CourseKind {
    pub fn tag(&self) -> KindTag {
        match self {
            CourseKind::School { .. } => KindTag::School,
            CourseKind::General { .. } => KindTag::General,
        }
    }
}

// ---------------------------------------------------------------------------
// Boundary input
// ---------------------------------------------------------------------------

/// Flat course payload accepted by create and update.
///
/// On create the required fields of the chosen variant must be present; on
/// update every field is optional and absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CourseInput {
    /// `"school"` or `"general"`. Inferred from `classNumber` when omitted.
    pub kind: Option<String>,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(range(min = 0.0, message = "must not be negative"))]
    pub price: Option<f64>,
    pub thumbnail: Option<String>,
    #[serde(alias = "lessonsCount")]
    #[validate(range(min = 0, message = "must not be negative"))]
    pub total_lessons: Option<i32>,
    pub sections: Option<Vec<Section>>,
    #[validate(range(min = 1, max = 12, message = "must be between 1 and 12"))]
    pub class_number: Option<i32>,
    pub subjects: Option<Vec<String>>,
    pub stream: Option<String>,
    pub level: Option<String>,
    pub color: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

impl CourseInput {
    /// Names of fields present in the input that do not belong to `tag`.
    fn foreign_fields(&self, tag: KindTag) -> Vec<&'static str> {
        let present = match tag {
            KindTag::School => vec![
                ("category", self.category.is_some()),
                ("status", self.status.is_some()),
            ],
            KindTag::General => vec![
                ("classNumber", self.class_number.is_some()),
                ("subjects", self.subjects.is_some()),
                ("stream", self.stream.is_some()),
                ("color", self.color.is_some()),
            ],
        };
        present
            .into_iter()
            .filter(|(_, is_present)| *is_present)
            .map(|(name, _)| name)
            .collect()
    }

    fn reject_foreign_fields(&self, tag: KindTag) -> Result<(), CoreError> {
        let foreign = self.foreign_fields(tag);
        if foreign.is_empty() {
            return Ok(());
        }
        Err(CoreError::Validation(format!(
            "Fields not applicable to a {} course: {}",
            tag.as_str(),
            foreign.join(", ")
        )))
    }
}

fn require<T>(value: Option<T>, field: &str, tag: KindTag) -> Result<T, CoreError> {
    value.ok_or_else(|| {
        CoreError::Validation(format!("{field} is required for a {} course", tag.as_str()))
    })
}

fn non_blank(value: String, field: &str) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} must not be blank")));
    }
    Ok(trimmed.to_string())
}

fn clean_subjects(subjects: Vec<String>) -> Result<Vec<String>, CoreError> {
    let cleaned: Vec<String> = subjects
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();
    if cleaned.is_empty() {
        return Err(CoreError::Validation(
            "subjects must contain at least one subject".into(),
        ));
    }
    Ok(cleaned)
}

/// Default title of a school course, e.g. `"Class 11 - PCM"`.
pub fn school_title(class_number: i32, stream: Option<Stream>) -> String {
    match stream {
        Some(stream) => format!("Class {class_number} - {}", stream.as_str()),
        None => format!("Class {class_number}"),
    }
}

// ---------------------------------------------------------------------------
// Validated draft
// ---------------------------------------------------------------------------

/// A fully validated course, ready to be persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CourseDraft {
    pub title: String,
    pub description: Option<String>,
    pub price: f64,
    pub thumbnail: Option<String>,
    pub sections: Option<Vec<Section>>,
    pub total_lessons: i32,
    pub kind: CourseKind,
}

impl CourseDraft {
    /// Validate a create payload into a draft.
    pub fn from_input(input: CourseInput) -> Result<Self, CoreError> {
        input.validate()?;

        let tag = match input.kind.as_deref() {
            Some(raw) => KindTag::parse(raw)?,
            None if input.class_number.is_some() => KindTag::School,
            None => KindTag::General,
        };
        input.reject_foreign_fields(tag)?;

        let kind = match tag {
            KindTag::School => {
                let class_number = require(input.class_number, "classNumber", tag)?;
                let subjects = clean_subjects(require(input.subjects.clone(), "subjects", tag)?)?;
                let stream = input.stream.as_deref().map(Stream::parse).transpose()?;
                let level = match input.level.as_deref() {
                    Some(raw) => SchoolLevel::parse(raw)?,
                    None => SchoolLevel::for_class(class_number),
                };
                let color = match input.color.clone() {
                    Some(color) => non_blank(color, "color")?,
                    None => level.default_color().to_string(),
                };
                CourseKind::School {
                    class_number,
                    subjects,
                    stream,
                    level,
                    color,
                }
            }
            KindTag::General => CourseKind::General {
                category: non_blank(require(input.category.clone(), "category", tag)?, "category")?,
                level: GeneralLevel::parse(&require(input.level.clone(), "level", tag)?)?,
                status: input
                    .status
                    .as_deref()
                    .map(CourseStatus::parse)
                    .transpose()?
                    .unwrap_or_default(),
            },
        };

        let title = match (input.title, &kind) {
            (Some(title), _) => non_blank(title, "title")?,
            (None, CourseKind::School {
                class_number,
                stream,
                ..
            }) => school_title(*class_number, *stream),
            (None, CourseKind::General { .. }) => {
                return Err(CoreError::Validation(
                    "title is required for a general course".into(),
                ))
            }
        };

        let total_lessons = match (&input.sections, input.total_lessons) {
            (Some(sections), _) => count_lessons(sections),
            (None, Some(total)) => total,
            (None, None) if tag == KindTag::School => {
                return Err(CoreError::Validation(
                    "totalLessons is required for a school course without sections".into(),
                ))
            }
            (None, None) => 0,
        };

        Ok(CourseDraft {
            title,
            description: input.description,
            price: input.price.unwrap_or(0.0),
            thumbnail: input.thumbnail,
            sections: input.sections,
            total_lessons,
            kind,
        })
    }

    /// Apply an update payload, returning the new draft.
    ///
    /// The variant cannot change; fields of the other variant are rejected.
    pub fn apply_patch(&self, patch: CourseInput) -> Result<Self, CoreError> {
        patch.validate()?;

        let tag = self.kind.tag();
        if let Some(raw) = patch.kind.as_deref() {
            let requested = KindTag::parse(raw)?;
            if requested != tag {
                return Err(CoreError::Validation(format!(
                    "Course kind cannot change from {} to {}",
                    tag.as_str(),
                    requested.as_str()
                )));
            }
        }
        patch.reject_foreign_fields(tag)?;

        let mut next = self.clone();
        if let Some(title) = patch.title {
            next.title = non_blank(title, "title")?;
        }
        if let Some(description) = patch.description {
            next.description = Some(description);
        }
        if let Some(price) = patch.price {
            next.price = price;
        }
        if let Some(thumbnail) = patch.thumbnail {
            next.thumbnail = Some(thumbnail);
        }

        match &mut next.kind {
            CourseKind::School {
                class_number,
                subjects,
                stream,
                level,
                color,
            } => {
                if let Some(value) = patch.class_number {
                    *class_number = value;
                }
                if let Some(value) = patch.subjects {
                    *subjects = clean_subjects(value)?;
                }
                if let Some(raw) = patch.stream.as_deref() {
                    *stream = Some(Stream::parse(raw)?);
                }
                if let Some(raw) = patch.level.as_deref() {
                    *level = SchoolLevel::parse(raw)?;
                }
                if let Some(value) = patch.color {
                    *color = non_blank(value, "color")?;
                }
            }
            CourseKind::General {
                category,
                level,
                status,
            } => {
                if let Some(value) = patch.category {
                    *category = non_blank(value, "category")?;
                }
                if let Some(raw) = patch.level.as_deref() {
                    *level = GeneralLevel::parse(raw)?;
                }
                if let Some(raw) = patch.status.as_deref() {
                    *status = CourseStatus::parse(raw)?;
                }
            }
        }

        if let Some(sections) = patch.sections {
            next.sections = Some(sections);
        }
        next.total_lessons = match (&next.sections, patch.total_lessons) {
            (Some(sections), _) => count_lessons(sections),
            (None, Some(total)) => total,
            (None, None) => next.total_lessons,
        };

        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
