mod common;

use axum::http::StatusCode;
use common::{
    body_json, build_test_app, class_ten_course, create_course, delete_auth, get, post_json_auth,
    put_json_auth, register,
};
use serde_json::json;
use sqlx::PgPool;

#[sqlx::test(migrations = "../../db/migrations")]
async fn catalog_is_public(pool: PgPool) {
    let app = build_test_app(pool);

    let response = get(app, "/api/courses").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_json(response).await.is_array());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn teacher_creates_school_course_with_derived_fields(pool: PgPool) {
    let app = build_test_app(pool);
    let (token, teacher_id) = register(app.clone(), "Mr. Rao", "rao@example.com", "teacher").await;

    let response = post_json_auth(app.clone(), "/api/courses", class_ten_course(), &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let course = body_json(response).await;
    assert_eq!(course["kind"], "school");
    assert_eq!(course["title"], "Class 10");
    assert_eq!(course["classNumber"], 10);
    assert_eq!(course["level"], "Middle");
    assert_eq!(course["color"], "bg-primary");
    assert_eq!(course["totalLessons"], 88);
    assert_eq!(course["instructorId"], teacher_id);

    let id = course["id"].as_i64().unwrap();
    let response = get(app, &format!("/api/courses/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["subjects"], json!(["Maths"]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn sections_override_lesson_count(pool: PgPool) {
    let app = build_test_app(pool);
    let (token, _) = register(app.clone(), "Admin", "admin@example.com", "admin").await;

    let body = json!({
        "title": "Intro to Rust",
        "category": "Programming",
        "level": "beginner",
        "price": 499,
        "totalLessons": 40,
        "sections": [
            { "title": "Basics", "lessons": [{ "id": "l1", "title": "Hello" }, { "id": "l2", "title": "Types" }] },
            { "title": "Ownership", "lessons": [{ "id": "l3", "title": "Borrowing" }] }
        ]
    });
    let response = post_json_auth(app, "/api/courses", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let course = body_json(response).await;
    assert_eq!(course["kind"], "general");
    assert_eq!(course["status"], "draft");
    assert_eq!(course["totalLessons"], 3);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn students_cannot_manage_courses(pool: PgPool) {
    let app = build_test_app(pool);
    let (teacher, _) = register(app.clone(), "Teacher", "t@example.com", "teacher").await;
    let (student, _) = register(app.clone(), "Student", "s@example.com", "student").await;
    let id = create_course(app.clone(), &teacher, class_ten_course()).await;

    let response = post_json_auth(app.clone(), "/api/courses", class_ten_course(), &student).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = put_json_auth(
        app.clone(),
        &format!("/api/courses/{id}"),
        json!({ "price": 1 }),
        &student,
    )
    .await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // Teachers may edit but only admins may delete.
    let response = delete_auth(app, &format!("/api/courses/{id}"), &teacher).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_patches_and_rejects_foreign_fields(pool: PgPool) {
    let app = build_test_app(pool);
    let (token, _) = register(app.clone(), "Teacher", "t@example.com", "teacher").await;
    let id = create_course(app.clone(), &token, class_ten_course()).await;
    let uri = format!("/api/courses/{id}");

    let response = put_json_auth(
        app.clone(),
        &uri,
        json!({ "price": 99.5, "subjects": ["Maths", "Science"] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let course = body_json(response).await;
    assert_eq!(course["price"], 99.5);
    assert_eq!(course["subjects"], json!(["Maths", "Science"]));
    assert_eq!(course["classNumber"], 10);

    let response = put_json_auth(app.clone(), &uri, json!({ "category": "Art" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(app, &uri, json!({ "kind": "general" }), &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn invalid_class_number_is_rejected(pool: PgPool) {
    let app = build_test_app(pool);
    let (token, _) = register(app.clone(), "Teacher", "t@example.com", "teacher").await;

    let mut body = class_ten_course();
    body["classNumber"] = json!(13);
    let response = post_json_auth(app, "/api/courses", body, &token).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn admin_deletes_course(pool: PgPool) {
    let app = build_test_app(pool);
    let (admin, _) = register(app.clone(), "Admin", "admin@example.com", "admin").await;
    let id = create_course(app.clone(), &admin, class_ten_course()).await;
    let uri = format!("/api/courses/{id}");

    let response = delete_auth(app.clone(), &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["message"], "Course deleted successfully");

    let response = get(app.clone(), &uri).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = delete_auth(app, &uri, &admin).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
