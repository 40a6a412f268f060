//! Persistence of grading results.
//!
//! Writes parsed grades and comments onto per-question student-response rows
//! and the per-(assignment, student) advice record. The orchestrator calls
//! [`upsert_responses`], [`apply_grading`] and [`store_advice`] inside one
//! transaction so a grading attempt commits atomically or not at all.
//! [`validate_feedback`], [`override_grade`] and [`get_feedback`] are the
//! standalone teacher/reader operations.

use chrono::Utc;
use db::models::{feedback, student_response};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use serde::Serialize;

use crate::context::{GradingContext, SubmittedAnswer};
use crate::error::GraderError;
use crate::parse::GradingOutcome;

/// Per-question grading state returned to readers.
#[derive(Debug, Clone, Serialize)]
pub struct QuestionFeedback {
    pub question_id: i64,
    pub response_text: String,
    pub grade: Option<f64>,
    pub grades: Vec<f64>,
    pub comment: Option<String>,
}

/// The full grading feedback for one (assignment, student) pair.
#[derive(Debug, Clone, Serialize)]
pub struct GradingFeedback {
    pub entries: Vec<QuestionFeedback>,
    pub advice: Option<String>,
    pub state: Option<bool>,
}

async fn find_response<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    student_id: i64,
    question_id: i64,
) -> Result<Option<student_response::Model>, GraderError> {
    Ok(student_response::Entity::find()
        .filter(student_response::Column::AssignmentId.eq(assignment_id))
        .filter(student_response::Column::StudentId.eq(student_id))
        .filter(student_response::Column::QuestionId.eq(question_id))
        .one(conn)
        .await?)
}

/// Inserts or updates the student's response rows for a submission.
///
/// One row exists per (assignment, student, question); a resubmission updates
/// the text in place, leaving the grade history untouched until the grading
/// step appends to it. Returns the rows in question-id order.
pub async fn upsert_responses<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    student_id: i64,
    answers: &[SubmittedAnswer],
) -> Result<Vec<student_response::Model>, GraderError> {
    let now = Utc::now();
    let mut saved = Vec::with_capacity(answers.len());

    for answer in answers {
        let existing =
            find_response(conn, assignment_id, student_id, answer.question_id).await?;

        let model = match existing {
            Some(model) => {
                let mut active: student_response::ActiveModel = model.into();
                active.response_text = Set(answer.response_text.clone());
                active.file_reference = Set(answer.file_reference.clone());
                active.updated_at = Set(now);
                active.update(conn).await?
            }
            None => {
                let active = student_response::ActiveModel {
                    assignment_id: Set(assignment_id),
                    question_id: Set(answer.question_id),
                    student_id: Set(student_id),
                    response_text: Set(answer.response_text.clone()),
                    file_reference: Set(answer.file_reference.clone()),
                    grade: Set(None),
                    grades: Set(student_response::GradeHistory::default()),
                    comment: Set(None),
                    created_at: Set(now),
                    updated_at: Set(now),
                    ..Default::default()
                };
                active.insert(conn).await?
            }
        };
        saved.push(model);
    }

    saved.sort_by_key(|m| m.question_id);
    Ok(saved)
}

/// Applies a parsed grading outcome to the student's response rows.
///
/// Each ordinal is resolved to its real question id through the context's
/// mapping before lookup. Entries whose ordinal or response row cannot be
/// found do not abort the batch; they are logged and returned so the caller
/// can report them.
pub async fn apply_grading<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    student_id: i64,
    outcome: &GradingOutcome,
    context: &GradingContext,
) -> Result<Vec<u32>, GraderError> {
    let mut skipped = Vec::new();

    for (ordinal, grade) in &outcome.grading {
        let Some(question_id) = context.question_id_for(*ordinal) else {
            tracing::warn!(
                assignment_id,
                student_id,
                ordinal,
                "grading entry has no matching question ordinal"
            );
            skipped.push(*ordinal);
            continue;
        };

        let Some(model) = find_response(conn, assignment_id, student_id, question_id).await?
        else {
            tracing::warn!(
                assignment_id,
                student_id,
                question_id,
                "no student response found for grading entry"
            );
            skipped.push(*ordinal);
            continue;
        };

        let mut history = model.grades.clone();
        history.seed_if_empty(model.grade);
        history.record(grade.note);

        let mut active: student_response::ActiveModel = model.into();
        active.grade = Set(Some(grade.note));
        active.grades = Set(history);
        active.comment = Set(Some(grade.commentaires.clone()));
        active.updated_at = Set(Utc::now());
        active.update(conn).await?;
    }

    Ok(skipped)
}

/// Creates or overwrites the advice record hanging off the representative
/// student response.
///
/// A fresh record starts unvalidated; overwriting the advice of an existing
/// record leaves its validation state untouched.
pub async fn store_advice<C: ConnectionTrait>(
    conn: &C,
    assignment_id: i64,
    representative_response_id: i64,
    advice: &str,
) -> Result<feedback::Model, GraderError> {
    let existing = feedback::Entity::find()
        .filter(feedback::Column::StudentResponseId.eq(representative_response_id))
        .one(conn)
        .await?;

    let model = match existing {
        Some(model) => {
            let mut active: feedback::ActiveModel = model.into();
            active.advice = Set(advice.to_string());
            active.update(conn).await?
        }
        None => {
            let active = feedback::ActiveModel {
                assignment_id: Set(assignment_id),
                student_response_id: Set(representative_response_id),
                advice: Set(advice.to_string()),
                state: Set(false),
                created_at: Set(Utc::now()),
                ..Default::default()
            };
            active.insert(conn).await?
        }
    };

    Ok(model)
}

/// Finds the representative (first) response of the (assignment, student)
/// pair, off which the feedback record is keyed.
async fn representative_response(
    db: &DatabaseConnection,
    assignment_id: i64,
    student_id: i64,
) -> Result<Option<student_response::Model>, GraderError> {
    Ok(student_response::Entity::find()
        .filter(student_response::Column::AssignmentId.eq(assignment_id))
        .filter(student_response::Column::StudentId.eq(student_id))
        .order_by_asc(student_response::Column::Id)
        .one(db)
        .await?)
}

/// Marks the student's feedback for an assignment as teacher-approved.
///
/// One-way transition: validating an already-validated record leaves it
/// validated. Fails with `NotFound` when no responses or no feedback exist.
pub async fn validate_feedback(
    db: &DatabaseConnection,
    assignment_id: i64,
    student_id: i64,
) -> Result<feedback::Model, GraderError> {
    let representative = representative_response(db, assignment_id, student_id)
        .await?
        .ok_or_else(|| {
            GraderError::NotFound(format!(
                "no student responses for assignment {assignment_id} and student {student_id}"
            ))
        })?;

    let feedback = feedback::Entity::find()
        .filter(feedback::Column::StudentResponseId.eq(representative.id))
        .one(db)
        .await?
        .ok_or_else(|| {
            GraderError::NotFound(format!(
                "no feedback for student response {}",
                representative.id
            ))
        })?;

    let mut active: feedback::ActiveModel = feedback.into();
    active.state = Set(true);
    Ok(active.update(db).await?)
}

/// Records a manual teacher correction of one question's grade.
///
/// Seeds the grade history from the current grade when the row predates
/// histories, appends the new grade, and makes it current. Feedback is not
/// touched.
pub async fn override_grade(
    db: &DatabaseConnection,
    assignment_id: i64,
    student_id: i64,
    question_id: i64,
    new_grade: f64,
) -> Result<student_response::Model, GraderError> {
    let model = find_response(db, assignment_id, student_id, question_id)
        .await?
        .ok_or_else(|| {
            GraderError::NotFound(format!(
                "no student response for assignment {assignment_id}, student {student_id}, question {question_id}"
            ))
        })?;

    let mut history = model.grades.clone();
    history.seed_if_empty(model.grade);
    history.record(new_grade);

    let mut active: student_response::ActiveModel = model.into();
    active.grade = Set(Some(new_grade));
    active.grades = Set(history);
    active.updated_at = Set(Utc::now());
    Ok(active.update(db).await?)
}

/// Reads back the grading feedback for one (assignment, student) pair.
///
/// Entries come back in question-id order. The advice record is looked up
/// through the representative (lowest-id) response, which is independent of
/// that ordering.
pub async fn get_feedback(
    db: &DatabaseConnection,
    assignment_id: i64,
    student_id: i64,
) -> Result<GradingFeedback, GraderError> {
    let responses = student_response::Entity::find()
        .filter(student_response::Column::AssignmentId.eq(assignment_id))
        .filter(student_response::Column::StudentId.eq(student_id))
        .order_by_asc(student_response::Column::QuestionId)
        .all(db)
        .await?;

    let Some(representative_id) = responses.iter().map(|r| r.id).min() else {
        return Err(GraderError::NotFound(format!(
            "no student responses for assignment {assignment_id} and student {student_id}"
        )));
    };

    let feedback = feedback::Entity::find()
        .filter(feedback::Column::StudentResponseId.eq(representative_id))
        .one(db)
        .await?;

    let (advice, state) = match feedback {
        Some(f) => (Some(f.advice), Some(f.state)),
        None => (None, None),
    };

    let entries = responses
        .into_iter()
        .map(|r| QuestionFeedback {
            question_id: r.question_id,
            response_text: r.response_text,
            grade: r.grade,
            grades: r.grades.0,
            comment: r.comment,
        })
        .collect();

    Ok(GradingFeedback {
        entries,
        advice,
        state,
    })
}
