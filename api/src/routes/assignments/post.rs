//! Submission route.
//!
//! Provides the endpoint through which a student submits answers for
//! automated grading:
//! - `POST /api/assignments/{assignment_id}/submissions`
//!
//! Key points:
//! - The caller must be actively enrolled in the course owning the
//!   assignment.
//! - Responses, grades and advice are persisted atomically; a grading
//!   failure leaves nothing behind and the student can simply resubmit.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use grader::pipeline::GradingReport;
use validator::Validate;

use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::assignments::common::{
    SubmissionRequest, ensure_enrolled, grader_error_status,
};
use crate::state::ApiState;

/// POST /api/assignments/{assignment_id}/submissions
///
/// Submits the authenticated student's answers and runs the full grading
/// pipeline on them.
///
/// ### Path Parameters
/// - `assignment_id` (`i64`): The assignment being answered.
///
/// ### Request Body (JSON)
/// - `answers` (array, required, non-empty): one entry per answered question:
///   - `question_id` (`i64`, required)
///   - `response_text` (`string`, required)
///   - `file_reference` (`string`, optional)
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "message": "Submission graded successfully",
///   "data": {
///     "responses": [
///       {
///         "question_id": 7,
///         "response_text": "Paris",
///         "grade": 10.0,
///         "grades": [10.0],
///         "comment": "Correct."
///       }
///     ],
///     "advice": "Revois la chronologie.",
///     "skipped_ordinals": []
///   }
/// }
/// ```
///
/// - `400 Bad Request` when the payload is empty or malformed.
/// - `403 Forbidden` when the student is not enrolled in the course.
/// - `404 Not Found` when the assignment does not exist or has no questions.
/// - `502 Bad Gateway` when the grading model is unreachable or its reply
///   cannot be interpreted; nothing is persisted in that case.
pub async fn submit_assignment(
    State(state): State<ApiState>,
    Path(assignment_id): Path<i64>,
    user: AuthUser,
    Json(req): Json<SubmissionRequest>,
) -> impl IntoResponse {
    if let Err(e) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Option<GradingReport>>::error(format!(
                "Invalid submission: {e}"
            ))),
        );
    }

    let student_id = user.0.sub;
    if let Err((status, message)) = ensure_enrolled(state.db(), assignment_id, student_id).await {
        return (
            status,
            Json(ApiResponse::<Option<GradingReport>>::error(message)),
        );
    }

    let answers = req.answers.into_iter().map(Into::into).collect();
    match state
        .pipeline()
        .submit_and_grade(assignment_id, student_id, answers)
        .await
    {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                Some(report),
                "Submission graded successfully",
            )),
        ),
        Err(e) => {
            tracing::error!(assignment_id, student_id, error = %e, "grading attempt failed");
            let (status, message) = grader_error_status(&e);
            (
                status,
                Json(ApiResponse::<Option<GradingReport>>::error(message)),
            )
        }
    }
}
