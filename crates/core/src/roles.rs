//! Account roles and the role sets used for authorization.
//!
//! Roles are stored as lowercase text in `users.role` and embedded verbatim
//! in access-token claims.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

pub const ROLE_STUDENT: &str = "student";
pub const ROLE_TEACHER: &str = "teacher";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Teacher,
    Admin,
}

/// Roles allowed to create and edit courses.
pub const COURSE_EDITORS: &[Role] = &[Role::Admin, Role::Teacher];

/// Roles allowed to delete courses.
pub const COURSE_DELETERS: &[Role] = &[Role::Admin];

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Student => ROLE_STUDENT,
            Role::Teacher => ROLE_TEACHER,
            Role::Admin => ROLE_ADMIN,
        }
    }

    /// Whether this role is a member of `allowed`.
    pub fn is_any_of(self, allowed: &[Role]) -> bool {
        allowed.contains(&self)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            ROLE_STUDENT => Ok(Role::Student),
            ROLE_TEACHER => Ok(Role::Teacher),
            ROLE_ADMIN => Ok(Role::Admin),
            other => Err(CoreError::Validation(format!(
                "Unknown role: '{other}'. Valid roles: {ROLE_STUDENT}, {ROLE_TEACHER}, {ROLE_ADMIN}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("Teacher".parse::<Role>().unwrap(), Role::Teacher);
        assert_eq!(" admin ".parse::<Role>().unwrap(), Role::Admin);
    }

    #[test]
    fn unknown_role_is_rejected() {
        assert!("principal".parse::<Role>().is_err());
    }

    #[test]
    fn editor_and_deleter_sets() {
        assert!(Role::Teacher.is_any_of(COURSE_EDITORS));
        assert!(!Role::Student.is_any_of(COURSE_EDITORS));
        assert!(!Role::Teacher.is_any_of(COURSE_DELETERS));
        assert!(Role::Admin.is_any_of(COURSE_DELETERS));
    }
}
