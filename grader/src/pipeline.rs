//! Grading pipeline orchestration.
//!
//! Drives one grading attempt end to end: assemble the context, build the
//! prompt, call the grading model (with bounded retries on transport
//! failures), parse the reply, then persist responses, grades and advice in
//! a single transaction. The model call happens outside the transaction so a
//! slow upstream never holds database locks.

use std::sync::Arc;
use std::time::Duration;

use sea_orm::{DatabaseConnection, TransactionTrait};
use serde::Serialize;

use crate::context::{GradingContext, SubmittedAnswer, assemble_context};
use crate::error::GraderError;
use crate::gateway::GradingModel;
use crate::parse::{GradingOutcome, parse_grading_output};
use crate::persist::{self, QuestionFeedback};
use crate::prompt::{GradingPrompt, build_prompt};

/// The result of one successful grading attempt.
#[derive(Debug, Clone, Serialize)]
pub struct GradingReport {
    /// Graded per-question state, in question-id order.
    pub responses: Vec<QuestionFeedback>,
    /// The model's global advice, as persisted.
    pub advice: String,
    /// Grading entries the model produced for ordinals that matched no
    /// question or no response. Empty on a clean run.
    pub skipped_ordinals: Vec<u32>,
}

/// Orchestrates grading attempts against one database and one model backend.
pub struct GradingPipeline {
    db: DatabaseConnection,
    model: Arc<dyn GradingModel>,
}

impl GradingPipeline {
    pub fn new(db: DatabaseConnection, model: Arc<dyn GradingModel>) -> Self {
        Self { db, model }
    }

    /// Runs one full grading attempt for a student's submission.
    ///
    /// Nothing is written until the model reply has been parsed successfully;
    /// responses, grades and advice then commit in one transaction. A failure
    /// at any earlier stage leaves the database exactly as it was.
    pub async fn submit_and_grade(
        &self,
        assignment_id: i64,
        student_id: i64,
        answers: Vec<SubmittedAnswer>,
    ) -> Result<GradingReport, GraderError> {
        let context = assemble_context(&self.db, assignment_id, &answers).await?;
        if context.question_count() == 0 {
            return Err(GraderError::NotFound(format!(
                "assignment {assignment_id} has no questions to grade"
            )));
        }
        // Answers referencing questions outside the assignment would either
        // trip a foreign key or persist a stray row grading never reaches.
        if let Some(stray) = answers
            .iter()
            .find(|a| !context.contains_question(a.question_id))
        {
            return Err(GraderError::NotFound(format!(
                "question {} does not belong to assignment {assignment_id}",
                stray.question_id
            )));
        }

        let prompt = build_prompt(&context);
        let raw = self.call_with_retry(&prompt).await?;
        let outcome = parse_grading_output(&raw)?;

        tracing::info!(
            assignment_id,
            student_id,
            graded = outcome.grading.len(),
            "grading model reply parsed"
        );

        let skipped = self
            .commit_attempt(assignment_id, student_id, answers, outcome, context)
            .await?;

        let feedback = persist::get_feedback(&self.db, assignment_id, student_id).await?;
        Ok(GradingReport {
            responses: feedback.entries,
            advice: feedback.advice.unwrap_or_default(),
            skipped_ordinals: skipped,
        })
    }

    /// Persists one parsed attempt atomically and returns the skipped
    /// ordinals.
    async fn commit_attempt(
        &self,
        assignment_id: i64,
        student_id: i64,
        answers: Vec<SubmittedAnswer>,
        outcome: GradingOutcome,
        context: GradingContext,
    ) -> Result<Vec<u32>, GraderError> {
        let skipped = self
            .db
            .transaction::<_, Vec<u32>, GraderError>(move |txn| {
                Box::pin(async move {
                    let saved =
                        persist::upsert_responses(txn, assignment_id, student_id, &answers)
                            .await?;
                    let skipped = persist::apply_grading(
                        txn,
                        assignment_id,
                        student_id,
                        &outcome,
                        &context,
                    )
                    .await?;

                    let representative = saved.iter().min_by_key(|m| m.id).ok_or_else(|| {
                        GraderError::Conflict(format!(
                            "submission for assignment {assignment_id} saved no responses"
                        ))
                    })?;
                    persist::store_advice(txn, assignment_id, representative.id, &outcome.advice)
                        .await?;

                    Ok(skipped)
                })
            })
            .await?;

        if !skipped.is_empty() {
            tracing::warn!(
                assignment_id,
                student_id,
                ?skipped,
                "grading entries skipped during persistence"
            );
        }
        Ok(skipped)
    }

    /// Calls the grading model, retrying transport failures with exponential
    /// backoff. Parse failures are never retried here; the raw reply has
    /// already arrived and retrying would spend quota on the same question.
    async fn call_with_retry(&self, prompt: &GradingPrompt) -> Result<String, GraderError> {
        let max_retries = util::config::grading_max_retries();
        let mut attempt: u32 = 0;
        loop {
            match self.model.generate(prompt).await {
                Ok(raw) => return Ok(raw),
                Err(GraderError::Gateway(message)) if attempt < max_retries => {
                    attempt += 1;
                    let backoff = Duration::from_millis(500 * 2u64.pow(attempt - 1));
                    tracing::warn!(
                        attempt,
                        max_retries,
                        backoff_ms = backoff.as_millis() as u64,
                        %message,
                        "grading model call failed, retrying"
                    );
                    tokio::time::sleep(backoff).await;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
