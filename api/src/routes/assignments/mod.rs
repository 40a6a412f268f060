//! Assignment grading routes.
//!
//! All four core operations hang off `/assignments`:
//! - `POST /{assignment_id}/submissions`: submit and grade.
//! - `GET /{assignment_id}/students/{student_id}/feedback`: read feedback.
//! - `PUT /{assignment_id}/students/{student_id}/validate`: approve advice.
//! - `PUT /{assignment_id}/students/{student_id}/questions/{question_id}/grade`:
//!   manual grade correction.

pub mod common;
pub mod get;
pub mod post;
pub mod put;

use axum::{
    Router,
    routing::{get, post, put},
};

use self::get::get_student_feedback;
use self::post::submit_assignment;
use self::put::{override_question_grade, validate_student_feedback};
use crate::state::ApiState;

/// Builds the `/assignments` route group.
pub fn assignment_routes() -> Router<ApiState> {
    Router::new()
        .route("/{assignment_id}/submissions", post(submit_assignment))
        .route(
            "/{assignment_id}/students/{student_id}/feedback",
            get(get_student_feedback),
        )
        .route(
            "/{assignment_id}/students/{student_id}/validate",
            put(validate_student_feedback),
        )
        .route(
            "/{assignment_id}/students/{student_id}/questions/{question_id}/grade",
            put(override_question_grade),
        )
}
