//! Enrollment progress rules.
//!
//! An enrollment's status is a pure function of its progress percentage:
//!
//! ```text
//! progress == 0         -> enrolled
//! 0 < progress < 100    -> in_progress
//! progress >= 100       -> completed
//! ```
//!
//! Progress is not required to be monotonic; a lower value replaces a higher
//! one when the client sends it.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const STATUS_ENROLLED: &str = "enrolled";
pub const STATUS_IN_PROGRESS: &str = "in_progress";
pub const STATUS_COMPLETED: &str = "completed";

pub const MIN_PROGRESS: i32 = 0;
pub const MAX_PROGRESS: i32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EnrollmentStatus {
    #[default]
    Enrolled,
    InProgress,
    Completed,
}

impl EnrollmentStatus {
    pub fn from_progress(progress: i32) -> Self {
        if progress >= MAX_PROGRESS {
            EnrollmentStatus::Completed
        } else if progress > MIN_PROGRESS {
            EnrollmentStatus::InProgress
        } else {
            EnrollmentStatus::Enrolled
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EnrollmentStatus::Enrolled => STATUS_ENROLLED,
            EnrollmentStatus::InProgress => STATUS_IN_PROGRESS,
            EnrollmentStatus::Completed => STATUS_COMPLETED,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        match raw {
            STATUS_ENROLLED => Ok(EnrollmentStatus::Enrolled),
            STATUS_IN_PROGRESS => Ok(EnrollmentStatus::InProgress),
            STATUS_COMPLETED => Ok(EnrollmentStatus::Completed),
            other => Err(CoreError::Internal(format!(
                "Unknown enrollment status stored: '{other}'"
            ))),
        }
    }
}

/// Validate a progress percentage submitted by a client.
pub fn validate_progress(progress: i32) -> Result<(), CoreError> {
    if !(MIN_PROGRESS..=MAX_PROGRESS).contains(&progress) {
        return Err(CoreError::Validation(format!(
            "progress must be between {MIN_PROGRESS} and {MAX_PROGRESS}, got {progress}"
        )));
    }
    Ok(())
}

/// Normalize an optional lesson id: blank ids are treated as absent.
pub fn normalize_lesson_id(lesson_id: Option<&str>) -> Option<String> {
    lesson_id
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .map(str::to_string)
}
