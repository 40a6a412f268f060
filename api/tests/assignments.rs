//! Route-level tests for the assignment endpoints.
//!
//! Each test drives the real router over an in-memory database with
//! `tower::ServiceExt::oneshot`. The grading model itself is never reached:
//! these tests exercise the authentication, enrollment and role guards that
//! run before any grading work is scheduled.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use http_body_util::BodyExt;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde_json::{Value, json};
use tower::ServiceExt;

use api::auth::generate_jwt;
use api::routes::routes;
use api::state::ApiState;
use db::models::{assignment, course, enrollment, question, teacher_response, user};
use db::test_utils::setup_test_db;
use grader::GraderError;
use grader::gateway::GradingModel;
use grader::prompt::GradingPrompt;
use util::state::AppState;

/// Stand-in gateway for guard tests; none of them get past the guards to an
/// actual model call.
struct UnreachableModel;

#[async_trait]
impl GradingModel for UnreachableModel {
    async fn generate(&self, _prompt: &GradingPrompt) -> Result<String, GraderError> {
        Err(GraderError::Gateway("no model backend in these tests".into()))
    }
}

struct TestApp {
    app: Router,
    db: DatabaseConnection,
    assignment_id: i64,
    teacher_id: i64,
    student_id: i64,
    outsider_id: i64,
}

async fn spawn_app() -> TestApp {
    let db = setup_test_db().await;
    let now = Utc::now();

    let teacher = user::ActiveModel {
        email: Set("prof@example.org".into()),
        name: Set("Mme Dupont".into()),
        role: Set(user::UserRole::Teacher),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let student = user::ActiveModel {
        email: Set("eleve@example.org".into()),
        name: Set("Jean Martin".into()),
        role: Set(user::UserRole::Student),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let outsider = user::ActiveModel {
        email: Set("visiteur@example.org".into()),
        name: Set("Luc Bernard".into()),
        role: Set(user::UserRole::Student),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let course = course::ActiveModel {
        teacher_id: Set(teacher.id),
        title: Set("Histoire de France".into()),
        description: Set(None),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    enrollment::ActiveModel {
        course_id: Set(course.id),
        student_id: Set(student.id),
        status: Set(enrollment::EnrollmentStatus::Enrolled),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let assignment = assignment::ActiveModel {
        course_id: Set(course.id),
        title: Set("Contrôle 1".into()),
        instructions: Set(None),
        points: Set(10.0),
        due_date: Set(None),
        composed: Set(true),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let q = question::ActiveModel {
        assignment_id: Set(assignment.id),
        question_text: Set("Quelle est la capitale de la France ?".into()),
        max_points: Set(10.0),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    teacher_response::ActiveModel {
        question_id: Set(q.id),
        response_text: Set("Paris".into()),
        created_at: Set(now),
        ..Default::default()
    }
    .insert(&db)
    .await
    .unwrap();

    let app = Router::new().nest("/api", routes()).with_state(ApiState::new(
        AppState::new(db.clone()),
        Arc::new(UnreachableModel),
    ));

    TestApp {
        app,
        db,
        assignment_id: assignment.id,
        teacher_id: teacher.id,
        student_id: student.id,
        outsider_id: outsider.id,
    }
}

fn bearer(user_id: i64, teacher: bool) -> String {
    let (token, _) = generate_jwt(user_id, teacher);
    format!("Bearer {token}")
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(Value::Null)
    };
    (status, json)
}

fn submission_body(question_id: i64) -> String {
    json!({
        "answers": [
            { "question_id": question_id, "response_text": "Paris" }
        ]
    })
    .to_string()
}

#[tokio::test]
async fn health_endpoint_is_public() {
    let test = spawn_app().await;
    let request = Request::get("/api/health").body(Body::empty()).unwrap();
    let (status, json) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
}

#[tokio::test]
async fn submission_without_token_is_unauthorized() {
    let test = spawn_app().await;
    let request = Request::post(format!("/api/assignments/{}/submissions", test.assignment_id))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(submission_body(1)))
        .unwrap();
    let (status, _) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn submission_with_empty_answers_is_rejected() {
    let test = spawn_app().await;
    let request = Request::post(format!("/api/assignments/{}/submissions", test.assignment_id))
        .header(header::AUTHORIZATION, bearer(test.student_id, false))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "answers": [] }).to_string()))
        .unwrap();
    let (status, json) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn submission_to_missing_assignment_is_not_found() {
    let test = spawn_app().await;
    let request = Request::post("/api/assignments/999999/submissions")
        .header(header::AUTHORIZATION, bearer(test.student_id, false))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(submission_body(1)))
        .unwrap();
    let (status, _) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn unenrolled_student_cannot_submit() {
    let test = spawn_app().await;
    let request = Request::post(format!("/api/assignments/{}/submissions", test.assignment_id))
        .header(header::AUTHORIZATION, bearer(test.outsider_id, false))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(submission_body(1)))
        .unwrap();
    let (status, json) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn completed_enrollment_does_not_grant_submission() {
    let test = spawn_app().await;
    let row = enrollment::Entity::find()
        .one(&test.db)
        .await
        .unwrap()
        .unwrap();
    let mut active: enrollment::ActiveModel = row.into();
    active.status = Set(enrollment::EnrollmentStatus::Completed);
    active.update(&test.db).await.unwrap();

    let request = Request::post(format!("/api/assignments/{}/submissions", test.assignment_id))
        .header(header::AUTHORIZATION, bearer(test.student_id, false))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(submission_body(1)))
        .unwrap();
    let (status, _) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn student_cannot_read_another_students_feedback() {
    let test = spawn_app().await;
    let request = Request::get(format!(
        "/api/assignments/{}/students/{}/feedback",
        test.assignment_id, test.student_id
    ))
    .header(header::AUTHORIZATION, bearer(test.outsider_id, false))
    .body(Body::empty())
    .unwrap();
    let (status, _) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn feedback_before_any_submission_is_not_found() {
    let test = spawn_app().await;
    let request = Request::get(format!(
        "/api/assignments/{}/students/{}/feedback",
        test.assignment_id, test.student_id
    ))
    .header(header::AUTHORIZATION, bearer(test.student_id, false))
    .body(Body::empty())
    .unwrap();
    let (status, json) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn student_cannot_validate_feedback() {
    let test = spawn_app().await;
    let request = Request::put(format!(
        "/api/assignments/{}/students/{}/validate",
        test.assignment_id, test.student_id
    ))
    .header(header::AUTHORIZATION, bearer(test.student_id, false))
    .body(Body::empty())
    .unwrap();
    let (status, _) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn teacher_validate_without_feedback_is_not_found() {
    let test = spawn_app().await;
    let request = Request::put(format!(
        "/api/assignments/{}/students/{}/validate",
        test.assignment_id, test.student_id
    ))
    .header(header::AUTHORIZATION, bearer(test.teacher_id, true))
    .body(Body::empty())
    .unwrap();
    let (status, _) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn student_cannot_override_grades() {
    let test = spawn_app().await;
    let request = Request::put(format!(
        "/api/assignments/{}/students/{}/questions/1/grade",
        test.assignment_id, test.student_id
    ))
    .header(header::AUTHORIZATION, bearer(test.student_id, false))
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(json!({ "grade": 5.0 }).to_string()))
    .unwrap();
    let (status, _) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn negative_override_grade_is_rejected() {
    let test = spawn_app().await;
    let request = Request::put(format!(
        "/api/assignments/{}/students/{}/questions/1/grade",
        test.assignment_id, test.student_id
    ))
    .header(header::AUTHORIZATION, bearer(test.teacher_id, true))
    .header(header::CONTENT_TYPE, "application/json")
    .body(Body::from(json!({ "grade": -1.0 }).to_string()))
    .unwrap();
    let (status, _) = send(&test.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}
