//! Feedback retrieval route.
//!
//! - `GET /api/assignments/{assignment_id}/students/{student_id}/feedback`
//!
//! Students may read their own feedback; teachers may read anyone's.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use grader::persist::{self, GradingFeedback};

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::assignments::common::grader_error_status;
use crate::state::ApiState;

/// GET /api/assignments/{assignment_id}/students/{student_id}/feedback
///
/// Returns the per-question grading state (response text, current grade,
/// grade history, comment) plus the global advice and its validation state.
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "message": "Feedback retrieved successfully",
///   "data": {
///     "entries": [
///       {
///         "question_id": 7,
///         "response_text": "Paris",
///         "grade": 10.0,
///         "grades": [10.0],
///         "comment": "Correct."
///       }
///     ],
///     "advice": "Revois la chronologie.",
///     "state": false
///   }
/// }
/// ```
///
/// - `403 Forbidden` when a student requests another student's feedback.
/// - `404 Not Found` when no responses exist for the pair.
pub async fn get_student_feedback(
    State(state): State<ApiState>,
    Path((assignment_id, student_id)): Path<(i64, i64)>,
    user: AuthUser,
) -> impl IntoResponse {
    if !user.0.teacher && user.0.sub != student_id {
        return (
            StatusCode::FORBIDDEN,
            Json(ApiResponse::<Option<GradingFeedback>>::error(
                "Students may only view their own feedback",
            )),
        );
    }

    match persist::get_feedback(state.db(), assignment_id, student_id).await {
        Ok(feedback) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(feedback),
                "Feedback retrieved successfully",
            )),
        ),
        Err(e) => {
            let (status, message) = grader_error_status(&e);
            (
                status,
                Json(ApiResponse::<Option<GradingFeedback>>::error(message)),
            )
        }
    }
}
