//! Shared request/response types and guards for assignment routes.

use axum::http::StatusCode;
use db::models::{assignment, enrollment};
use grader::{GraderError, SubmittedAnswer};
use sea_orm::{DatabaseConnection, EntityTrait};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// One answer in a submission payload.
#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerPayload {
    pub question_id: i64,
    pub response_text: String,
    pub file_reference: Option<String>,
}

impl From<AnswerPayload> for SubmittedAnswer {
    fn from(payload: AnswerPayload) -> Self {
        SubmittedAnswer {
            question_id: payload.question_id,
            response_text: payload.response_text,
            file_reference: payload.file_reference,
        }
    }
}

/// Request body for `POST /assignments/{assignment_id}/submissions`.
#[derive(Debug, Deserialize, Validate)]
pub struct SubmissionRequest {
    #[validate(length(min = 1, message = "answers must not be empty"))]
    pub answers: Vec<AnswerPayload>,
}

/// Request body for the manual grade override endpoint.
#[derive(Debug, Deserialize, Validate)]
pub struct GradeOverrideRequest {
    #[validate(range(min = 0.0, message = "grade must not be negative"))]
    pub grade: f64,
}

/// Verifies that the student holds an active enrollment in the course owning
/// the assignment. Runs before any grading work is scheduled.
///
/// Returns `404` when the assignment does not exist and `403` when the
/// student is not actively enrolled.
pub async fn ensure_enrolled(
    db: &DatabaseConnection,
    assignment_id: i64,
    student_id: i64,
) -> Result<(), (StatusCode, String)> {
    let assignment = assignment::Entity::find_by_id(assignment_id)
        .one(db)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {e}"),
            )
        })?
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                format!("Assignment {assignment_id} not found"),
            )
        })?;

    let enrolled = enrollment::Model::is_enrolled(db, student_id, assignment.course_id)
        .await
        .map_err(|e| {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Database error: {e}"),
            )
        })?;

    if !enrolled {
        return Err((
            StatusCode::FORBIDDEN,
            "Student is not enrolled in this course".to_string(),
        ));
    }
    Ok(())
}

/// Maps a grader error to the status code and message exposed to clients.
///
/// Parse failures keep the raw model output out of the response body; it is
/// already logged server side.
pub fn grader_error_status(err: &GraderError) -> (StatusCode, String) {
    match err {
        GraderError::NotFound(message) => (StatusCode::NOT_FOUND, message.clone()),
        GraderError::Gateway(message) => (
            StatusCode::BAD_GATEWAY,
            format!("Grading service unavailable: {message}"),
        ),
        GraderError::Parse { message, .. } => (
            StatusCode::BAD_GATEWAY,
            format!("Grading output could not be interpreted: {message}"),
        ),
        GraderError::Conflict(message) => (StatusCode::CONFLICT, message.clone()),
        GraderError::Database(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Database error: {e}"),
        ),
    }
}
