//! Built-in school catalog used to seed an empty database.

use crate::course::{school_title, CourseDraft, CourseKind, SchoolLevel, Stream};

/// `(class, subjects, stream, total_lessons, price)` for every seeded course.
const SCHOOL_CATALOG: &[(i32, &[&str], Option<Stream>, i32, f64)] = &[
    (1, &["Maths", "EVS"], None, 48, 50.0),
    (2, &["Maths", "EVS"], None, 52, 50.0),
    (3, &["Maths", "EVS"], None, 56, 50.0),
    (4, &["Maths", "EVS"], None, 60, 50.0),
    (5, &["Maths", "Science"], None, 64, 50.0),
    (6, &["Maths", "Science", "Social Science"], None, 72, 75.0),
    (7, &["Maths", "Science", "Social Science"], None, 76, 75.0),
    (8, &["Maths", "Science", "Social Science"], None, 80, 75.0),
    (9, &["Maths", "Science", "Social Science"], None, 84, 75.0),
    (10, &["Maths", "Science", "Social Science"], None, 88, 75.0),
    (11, &["Physics", "Chemistry", "Maths"], Some(Stream::Pcm), 96, 100.0),
    (11, &["Physics", "Chemistry", "Biology"], Some(Stream::Pcb), 96, 100.0),
    (11, &["Accounts", "Economics", "Business Studies"], Some(Stream::Commerce), 90, 100.0),
    (12, &["Physics", "Chemistry", "Maths"], Some(Stream::Pcm), 102, 100.0),
    (12, &["Physics", "Chemistry", "Biology"], Some(Stream::Pcb), 102, 100.0),
    (12, &["Accounts", "Economics", "Business Studies"], Some(Stream::Commerce), 96, 100.0),
];

fn stream_color(stream: Option<Stream>, level: SchoolLevel) -> &'static str {
    match stream {
        Some(Stream::Pcb) => "bg-destructive",
        Some(Stream::Commerce) => "bg-secondary-foreground",
        Some(Stream::Pcm) | None => level.default_color(),
    }
}

/// Drafts for the full class 1-12 catalog.
pub fn school_catalog() -> Vec<CourseDraft> {
    SCHOOL_CATALOG
        .iter()
        .map(|&(class_number, subjects, stream, total_lessons, price)| {
            let level = SchoolLevel::for_class(class_number);
            let subject_list = subjects.join(", ");
            let description = match stream {
                Some(s) => format!(
                    "Complete curriculum for Class {class_number} {} stream including {subject_list}.",
                    s.as_str()
                ),
                None => format!(
                    "Complete curriculum for Class {class_number} including {subject_list}."
                ),
            };
            CourseDraft {
                title: school_title(class_number, stream),
                description: Some(description),
                price,
                thumbnail: None,
                sections: None,
                total_lessons,
                kind: CourseKind::School {
                    class_number,
                    subjects: subjects.iter().map(|s| s.to_string()).collect(),
                    stream,
                    level,
                    color: stream_color(stream, level).to_string(),
                },
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_covers_every_class() {
        let catalog = school_catalog();
        assert_eq!(catalog.len(), 16);
        for class in 1..=12 {
            assert!(catalog.iter().any(|c| matches!(
                c.kind,
                CourseKind::School { class_number, .. } if class_number == class
            )));
        }
    }

    #[test]
    fn senior_courses_carry_stream_in_title() {
        let catalog = school_catalog();
        assert!(catalog.iter().any(|c| c.title == "Class 12 - PCB"));
        assert!(catalog.iter().any(|c| c.title == "Class 5"));
    }
}
