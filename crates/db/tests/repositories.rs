//! Integration tests for the repository layer against a real database:
//! - Course variants round-trip through the single `courses` table
//! - Enrollment uniqueness, progress and completed lessons
//! - Cart line arithmetic and checkout
//! - Notifications read flags

use std::time::Duration;

use assert_matches::assert_matches;
use eduvillage_core::cart::MAX_LINE_QUANTITY;
use eduvillage_core::course::{CourseDraft, CourseInput, CourseKind, Lesson, Section, Stream};
use eduvillage_core::enrollment::EnrollmentStatus;
use eduvillage_core::types::DbId;
use eduvillage_db::models::notification::CreateNotification;
use eduvillage_db::models::user::{CreateUser, UpdateUser};
use eduvillage_db::repositories::{
    CartRepo, CourseRepo, EnrollmentRepo, NotificationRepo, UserRepo,
};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, email: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            name: "Ana".to_string(),
            email: email.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role: "student".to_string(),
        },
    )
    .await
    .unwrap()
    .id
}

fn school_draft(class_number: i32, price: f64) -> CourseDraft {
    CourseDraft::from_input(CourseInput {
        class_number: Some(class_number),
        subjects: Some(vec!["Maths".into()]),
        total_lessons: Some(40),
        price: Some(price),
        ..CourseInput::default()
    })
    .unwrap()
}

fn general_draft(lessons_per_section: &[usize]) -> CourseDraft {
    let sections = lessons_per_section
        .iter()
        .enumerate()
        .map(|(i, n)| Section {
            title: format!("Part {i}"),
            lessons: (0..*n)
                .map(|j| Lesson {
                    id: Some(format!("l-{i}-{j}")),
                    title: format!("Lesson {j}"),
                    ..Lesson::default()
                })
                .collect(),
        })
        .collect();
    CourseDraft::from_input(CourseInput {
        title: Some("Watercolour Basics".into()),
        category: Some("art".into()),
        level: Some("beginner".into()),
        price: Some(30.0),
        sections: Some(sections),
        ..CourseInput::default()
    })
    .unwrap()
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_email_violates_unique_constraint(pool: PgPool) {
    new_user(&pool, "ana@x.com").await;
    let result = UserRepo::create(
        &pool,
        &CreateUser {
            name: "Other".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: "h".to_string(),
            role: "student".to_string(),
        },
    )
    .await;

    let err = result.unwrap_err();
    let db_err = err.as_database_error().expect("database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_users_email"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn profile_update_only_touches_given_fields(pool: PgPool) {
    let id = new_user(&pool, "ana@x.com").await;
    let updated = UserRepo::update(
        &pool,
        id,
        &UpdateUser {
            avatar: Some("https://img/ana.png".to_string()),
            ..UpdateUser::default()
        },
    )
    .await
    .unwrap()
    .expect("user exists");

    assert_eq!(updated.name, "Ana");
    assert_eq!(updated.email, "ana@x.com");
    assert_eq!(updated.avatar.as_deref(), Some("https://img/ana.png"));

    assert!(UserRepo::update(&pool, 9999, &UpdateUser::default())
        .await
        .unwrap()
        .is_none());
}

// ---------------------------------------------------------------------------
// Courses
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn course_variants_round_trip(pool: PgPool) {
    let teacher = new_user(&pool, "t@x.com").await;
    let school = CourseRepo::create(&pool, &school_draft(11, 100.0), Some(teacher))
        .await
        .unwrap();
    let general = CourseRepo::create(&pool, &general_draft(&[2, 3]), Some(teacher))
        .await
        .unwrap();

    assert_eq!(school.title, "Class 11");
    assert_eq!(school.instructor_id, Some(teacher));
    assert_matches!(school.kind, CourseKind::School { class_number: 11, .. });

    let fetched = CourseRepo::find_by_id(&pool, general.id)
        .await
        .unwrap()
        .expect("course exists");
    assert_eq!(fetched.total_lessons, 5);
    assert_eq!(fetched.sections.as_ref().map(Vec::len), Some(2));
    assert_matches!(fetched.kind, CourseKind::General { .. });
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_uses_catalog_order(pool: PgPool) {
    let general = CourseRepo::create(&pool, &general_draft(&[1]), None)
        .await
        .unwrap();
    let mut commerce = school_draft(11, 100.0);
    if let CourseKind::School { stream, .. } = &mut commerce.kind {
        *stream = Some(Stream::Commerce);
    }
    let eleven_commerce = CourseRepo::create(&pool, &commerce, None).await.unwrap();
    let two = CourseRepo::create(&pool, &school_draft(2, 50.0), None)
        .await
        .unwrap();

    let ids: Vec<i64> = CourseRepo::list(&pool)
        .await
        .unwrap()
        .into_iter()
        .map(|c| c.id)
        .collect();
    assert_eq!(ids, vec![two.id, eleven_commerce.id, general.id]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_recomputes_lessons_and_delete_cascades(pool: PgPool) {
    let user = new_user(&pool, "s@x.com").await;
    let course = CourseRepo::create(&pool, &general_draft(&[2]), None)
        .await
        .unwrap();

    let patched = course
        .draft()
        .apply_patch(CourseInput {
            sections: general_draft(&[1, 1, 1]).sections,
            ..CourseInput::default()
        })
        .unwrap();
    let updated = CourseRepo::update(&pool, course.id, &patched)
        .await
        .unwrap()
        .expect("course exists");
    assert_eq!(updated.total_lessons, 3);

    EnrollmentRepo::enroll(&pool, user, course.id).await.unwrap();
    CartRepo::add_item(&pool, user, course.id, 1).await.unwrap();

    assert!(CourseRepo::delete(&pool, course.id).await.unwrap());
    assert!(!CourseRepo::delete(&pool, course.id).await.unwrap());
    assert!(EnrollmentRepo::list_for_user(&pool, user).await.unwrap().is_empty());
    assert!(CartRepo::list_items(&pool, user).await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Enrollments
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn second_enroll_is_rejected_by_constraint(pool: PgPool) {
    let user = new_user(&pool, "s@x.com").await;
    let course = CourseRepo::create(&pool, &school_draft(10, 75.0), None)
        .await
        .unwrap();

    let first = EnrollmentRepo::enroll(&pool, user, course.id).await.unwrap();
    assert_matches!(first, Some(ref row) if row.progress == 0 && row.status == "enrolled");

    let second = EnrollmentRepo::enroll(&pool, user, course.id).await.unwrap();
    assert!(second.is_none());
    assert_eq!(EnrollmentRepo::list_for_user(&pool, user).await.unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn progress_updates_status_and_lessons(pool: PgPool) {
    let user = new_user(&pool, "s@x.com").await;
    let course = CourseRepo::create(&pool, &general_draft(&[3]), None)
        .await
        .unwrap();
    let row = EnrollmentRepo::enroll(&pool, user, course.id)
        .await
        .unwrap()
        .unwrap();

    for _ in 0..2 {
        EnrollmentRepo::update_progress(&pool, row.id, user, 50, Some("l-0-0"))
            .await
            .unwrap()
            .expect("enrollment exists");
    }
    let done = EnrollmentRepo::update_progress(&pool, row.id, user, 100, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(done.status, "completed");

    let detail = EnrollmentRepo::detail(&pool, done).await.unwrap().unwrap();
    assert_eq!(detail.status, EnrollmentStatus::Completed);
    assert_eq!(detail.completed_lessons.len(), 1);
    assert_eq!(detail.completed_lessons[0].lesson_id, "l-0-0");
    assert_eq!(detail.course.id, course.id);

    let lowered = EnrollmentRepo::update_progress(&pool, row.id, user, 20, None)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(lowered.progress, 20);
    assert_eq!(lowered.status, "in_progress");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn enrollments_are_scoped_to_their_owner(pool: PgPool) {
    let owner = new_user(&pool, "owner@x.com").await;
    let other = new_user(&pool, "other@x.com").await;
    let course = CourseRepo::create(&pool, &school_draft(3, 50.0), None)
        .await
        .unwrap();
    let row = EnrollmentRepo::enroll(&pool, owner, course.id)
        .await
        .unwrap()
        .unwrap();

    assert!(EnrollmentRepo::update_progress(&pool, row.id, other, 10, None)
        .await
        .unwrap()
        .is_none());
    assert!(!EnrollmentRepo::delete(&pool, row.id, other).await.unwrap());
    assert!(EnrollmentRepo::delete(&pool, row.id, owner).await.unwrap());
}

// ---------------------------------------------------------------------------
// Cart
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn cart_lines_accumulate_and_total_live_prices(pool: PgPool) {
    let user = new_user(&pool, "s@x.com").await;
    let cheap = CourseRepo::create(&pool, &school_draft(1, 50.0), None)
        .await
        .unwrap();
    let pricey = CourseRepo::create(&pool, &school_draft(12, 100.0), None)
        .await
        .unwrap();

    let empty = CartRepo::get_cart(&pool, user).await.unwrap();
    assert!(empty.items.is_empty());
    assert_eq!(empty.totals.total_items, 0);

    CartRepo::add_item(&pool, user, cheap.id, 1).await.unwrap();
    let line = CartRepo::add_item(&pool, user, cheap.id, 2).await.unwrap();
    assert_eq!(line.quantity, 3);
    CartRepo::add_item(&pool, user, pricey.id, 1).await.unwrap();

    let cart = CartRepo::get_cart(&pool, user).await.unwrap();
    assert_eq!(cart.items.len(), 2);
    assert_eq!(cart.items[0].course_id, cheap.id);
    assert_eq!(cart.totals.total_items, 4);
    assert_eq!(cart.totals.total_price, 250.0);

    let repriced = pricey
        .draft()
        .apply_patch(CourseInput {
            price: Some(120.0),
            ..CourseInput::default()
        })
        .unwrap();
    CourseRepo::update(&pool, pricey.id, &repriced).await.unwrap();
    let cart = CartRepo::get_cart(&pool, user).await.unwrap();
    assert_eq!(cart.totals.total_price, 270.0);

    assert!(CartRepo::set_quantity(&pool, user, cheap.id, 1).await.unwrap());
    assert!(!CartRepo::set_quantity(&pool, user, 9999, 1).await.unwrap());
    assert!(CartRepo::remove_item(&pool, user, pricey.id).await.unwrap());
    assert!(!CartRepo::remove_item(&pool, user, pricey.id).await.unwrap());
    assert_eq!(CartRepo::clear(&pool, user).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_enrolls_and_empties_cart(pool: PgPool) {
    let user = new_user(&pool, "s@x.com").await;
    let owned = CourseRepo::create(&pool, &school_draft(4, 50.0), None)
        .await
        .unwrap();
    let fresh = CourseRepo::create(&pool, &school_draft(8, 75.0), None)
        .await
        .unwrap();

    assert!(CartRepo::checkout(&pool, user).await.unwrap().is_none());

    EnrollmentRepo::enroll(&pool, user, owned.id).await.unwrap();
    CartRepo::add_item(&pool, user, owned.id, 1).await.unwrap();
    CartRepo::add_item(&pool, user, fresh.id, 2).await.unwrap();

    let receipt = CartRepo::checkout(&pool, user).await.unwrap().unwrap();
    assert_eq!(receipt.enrollments.len(), 1);
    assert_eq!(receipt.enrollments[0].course_id, fresh.id);
    assert_eq!(receipt.skipped_course_ids, vec![owned.id]);
    // The already-owned course is not charged.
    assert_eq!(receipt.totals.total_items, 2);
    assert_eq!(receipt.totals.total_price, 150.0);

    assert!(CartRepo::list_items(&pool, user).await.unwrap().is_empty());
    assert_eq!(EnrollmentRepo::list_for_user(&pool, user).await.unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn checkout_keeps_lines_added_while_it_runs(pool: PgPool) {
    let user = new_user(&pool, "s@x.com").await;
    let first = CourseRepo::create(&pool, &school_draft(4, 50.0), None)
        .await
        .unwrap();
    let second = CourseRepo::create(&pool, &school_draft(8, 75.0), None)
        .await
        .unwrap();
    CartRepo::add_item(&pool, user, first.id, 1).await.unwrap();

    // An uncommitted enrollment in `first` makes checkout wait on its insert.
    let mut tx = pool.begin().await.unwrap();
    sqlx::query("INSERT INTO enrollments (user_id, course_id) VALUES ($1, $2)")
        .bind(user)
        .bind(first.id)
        .execute(&mut *tx)
        .await
        .unwrap();

    let checkout = tokio::spawn({
        let pool = pool.clone();
        async move { CartRepo::checkout(&pool, user).await }
    });
    tokio::time::sleep(Duration::from_millis(200)).await;

    sqlx::query("INSERT INTO cart_items (user_id, course_id, quantity) VALUES ($1, $2, 1)")
        .bind(user)
        .bind(second.id)
        .execute(&mut *tx)
        .await
        .unwrap();
    tx.commit().await.unwrap();

    let receipt = checkout.await.unwrap().unwrap().unwrap();
    assert_eq!(receipt.skipped_course_ids, vec![first.id]);

    let enrolled: Vec<DbId> = EnrollmentRepo::list_for_user(&pool, user)
        .await
        .unwrap()
        .iter()
        .map(|row| row.course_id)
        .collect();
    let in_cart: Vec<DbId> = CartRepo::list_items(&pool, user)
        .await
        .unwrap()
        .iter()
        .map(|item| item.course_id)
        .collect();
    assert!(!in_cart.contains(&first.id));
    assert!(
        enrolled.contains(&second.id) || in_cart.contains(&second.id),
        "course {} vanished: enrolled={enrolled:?} cart={in_cart:?}",
        second.id
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn repeated_adds_saturate_line_quantity(pool: PgPool) {
    let user = new_user(&pool, "s@x.com").await;
    let course = CourseRepo::create(&pool, &school_draft(5, 50.0), None)
        .await
        .unwrap();

    for _ in 0..3 {
        CartRepo::add_item(&pool, user, course.id, MAX_LINE_QUANTITY)
            .await
            .unwrap();
    }
    let line = CartRepo::add_item(&pool, user, course.id, 1).await.unwrap();
    assert_eq!(line.quantity, MAX_LINE_QUANTITY);
}

// ---------------------------------------------------------------------------
// Notifications
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn notifications_read_flags(pool: PgPool) {
    let user = new_user(&pool, "s@x.com").await;
    let other = new_user(&pool, "o@x.com").await;
    let mut ids = Vec::new();
    for title in ["first", "second", "third"] {
        let n = NotificationRepo::create(
            &pool,
            &CreateNotification {
                user_id: user,
                title: title.to_string(),
                message: "m".to_string(),
            },
        )
        .await
        .unwrap();
        assert!(!n.is_read);
        ids.push(n.id);
    }

    let listed = NotificationRepo::list_for_user(&pool, user).await.unwrap();
    assert_eq!(listed[0].title, "third");
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 3);

    assert!(NotificationRepo::mark_read(&pool, ids[0], other)
        .await
        .unwrap()
        .is_none());
    let read = NotificationRepo::mark_read(&pool, ids[0], user)
        .await
        .unwrap()
        .unwrap();
    assert!(read.is_read && read.read_at.is_some());
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 2);

    assert_eq!(NotificationRepo::mark_all_read(&pool, user).await.unwrap(), 2);
    assert_eq!(NotificationRepo::unread_count(&pool, user).await.unwrap(), 0);
}
