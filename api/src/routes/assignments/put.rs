//! Teacher review routes.
//!
//! - `PUT /api/assignments/{assignment_id}/students/{student_id}/validate`
//! - `PUT /api/assignments/{assignment_id}/students/{student_id}/questions/{question_id}/grade`
//!
//! Both endpoints are restricted to teachers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use grader::persist::{self, QuestionFeedback};
use serde::Serialize;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::assignments::common::{GradeOverrideRequest, grader_error_status};
use crate::state::ApiState;

/// Validation state of one student's assignment feedback.
#[derive(Debug, Serialize)]
pub struct FeedbackStatus {
    pub advice: String,
    pub state: bool,
}

/// PUT /api/assignments/{assignment_id}/students/{student_id}/validate
///
/// Marks the student's feedback as teacher-approved. The transition is
/// one-way; validating an already-validated record is a no-op that still
/// returns `200 OK`.
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "message": "Feedback validated successfully",
///   "data": { "advice": "Revois la chronologie.", "state": true }
/// }
/// ```
///
/// - `403 Forbidden` when the caller is not a teacher.
/// - `404 Not Found` when no responses or no feedback exist for the pair.
pub async fn validate_student_feedback(
    State(state): State<ApiState>,
    Path((assignment_id, student_id)): Path<(i64, i64)>,
    user: AuthUser,
) -> impl IntoResponse {
    if !user.0.teacher {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Option<FeedbackStatus>>::error(
                "Only teachers may validate feedback",
            )),
        );
    }

    match persist::validate_feedback(state.db(), assignment_id, student_id).await {
        Ok(feedback) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(FeedbackStatus {
                    advice: feedback.advice,
                    state: feedback.state,
                }),
                "Feedback validated successfully",
            )),
        ),
        Err(e) => {
            let (status, message) = grader_error_status(&e);
            (
                status,
                Json(ApiResponse::<Option<FeedbackStatus>>::error(message)),
            )
        }
    }
}

/// PUT /api/assignments/{assignment_id}/students/{student_id}/questions/{question_id}/grade
///
/// Records a manual grade correction for one question. The previous grade is
/// kept in the grade history; the new grade becomes current.
///
/// ### Request Body (JSON)
/// - `grade` (`number`, required, >= 0): the corrected grade.
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "message": "Grade updated successfully",
///   "data": {
///     "question_id": 9,
///     "response_text": "1800",
///     "grade": 6.5,
///     "grades": [2.0, 6.5],
///     "comment": "La Révolution a débuté en 1789."
///   }
/// }
/// ```
///
/// - `400 Bad Request` when the grade is negative.
/// - `403 Forbidden` when the caller is not a teacher.
/// - `404 Not Found` when no response exists for the triple.
pub async fn override_question_grade(
    State(state): State<ApiState>,
    Path((assignment_id, student_id, question_id)): Path<(i64, i64, i64)>,
    user: AuthUser,
    Json(req): Json<GradeOverrideRequest>,
) -> impl IntoResponse {
    if !user.0.teacher {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Option<QuestionFeedback>>::error(
                "Only teachers may override grades",
            )),
        );
    }

    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Option<QuestionFeedback>>::error(format!(
                "Invalid grade: {e}"
            ))),
        );
    }

    match persist::override_grade(state.db(), assignment_id, student_id, question_id, req.grade)
        .await
    {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(QuestionFeedback {
                    question_id: updated.question_id,
                    response_text: updated.response_text,
                    grade: updated.grade,
                    grades: updated.grades.0,
                    comment: updated.comment,
                }),
                "Grade updated successfully",
            )),
        ),
        Err(e) => {
            let (status, message) = grader_error_status(&e);
            (
                status,
                Json(ApiResponse::<Option<QuestionFeedback>>::error(message)),
            )
        }
    }
}
