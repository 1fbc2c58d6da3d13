//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod cart_repo;
pub mod course_repo;
pub mod enrollment_repo;
pub mod notification_repo;
pub mod user_repo;

pub use cart_repo::CartRepo;
pub use course_repo::CourseRepo;
pub use enrollment_repo::EnrollmentRepo;
pub use notification_repo::NotificationRepo;
pub use user_repo::UserRepo;
