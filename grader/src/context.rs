//! Context assembly for a grading attempt.
//!
//! Collects the assignment's questions, their teacher reference answers and
//! the student's submitted answers into the three plain-text blocks handed to
//! the grading model, together with the ordinal-to-question-id mapping the
//! persister needs later. Questions are numbered sequentially from 1 in the
//! prompt; that ordinal is a presentation detail and is never treated as a
//! question identifier anywhere else.

use std::collections::HashMap;

use db::models::{question, teacher_response};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder};

use crate::error::GraderError;

/// One answer in a submission payload, matched to its question by id.
#[derive(Debug, Clone)]
pub struct SubmittedAnswer {
    pub question_id: i64,
    pub response_text: String,
    pub file_reference: Option<String>,
}

/// A question joined with its reference answer and the student's answer,
/// ready for prompt rendering.
#[derive(Debug, Clone)]
pub struct AssembledQuestion {
    pub question_id: i64,
    pub question_text: String,
    pub max_points: f64,
    pub reference_answer: String,
    pub student_answer: Option<String>,
}

/// The assembled grading context: three prompt blocks plus the mapping from
/// 1-based prompt ordinals back to real question ids.
#[derive(Debug, Clone)]
pub struct GradingContext {
    /// Block (a): numbered questions with max points and reference answers.
    pub corrected_assessment: String,
    /// Block (b): total question count and point sum.
    pub criteria: String,
    /// Block (c): the student's answers, numbered with the same ordinals.
    pub student_responses: String,
    ordinals: Vec<i64>,
}

impl GradingContext {
    /// Renders the three prompt blocks from joined question data.
    ///
    /// `questions` must already be in a stable order; their position defines
    /// the ordinal used throughout the attempt.
    pub fn from_questions(questions: &[AssembledQuestion]) -> Self {
        let corrected_assessment = questions
            .iter()
            .enumerate()
            .map(|(i, q)| {
                format!(
                    "Question {} ({} points) : {}\nRéponse : {}",
                    i + 1,
                    q.max_points,
                    q.question_text,
                    q.reference_answer
                )
            })
            .collect::<Vec<_>>()
            .join("\n");

        let total: f64 = questions.iter().map(|q| q.max_points).sum();
        let criteria = format!(
            "Cette évaluation compte au total {} question(s) et est cotée sur {} points.",
            questions.len(),
            total
        );

        let student_responses = questions
            .iter()
            .enumerate()
            .filter_map(|(i, q)| {
                q.student_answer
                    .as_ref()
                    .map(|answer| format!("Question {} Réponse : {}", i + 1, answer))
            })
            .collect::<Vec<_>>()
            .join("\n");

        let ordinals = questions.iter().map(|q| q.question_id).collect();

        Self {
            corrected_assessment,
            criteria,
            student_responses,
            ordinals,
        }
    }

    /// Resolves a 1-based prompt ordinal back to the real question id.
    pub fn question_id_for(&self, ordinal: u32) -> Option<i64> {
        if ordinal == 0 {
            return None;
        }
        self.ordinals.get(ordinal as usize - 1).copied()
    }

    pub fn question_count(&self) -> usize {
        self.ordinals.len()
    }

    /// Returns true if the question id belongs to this assignment.
    pub fn contains_question(&self, question_id: i64) -> bool {
        self.ordinals.contains(&question_id)
    }
}

/// Loads the assignment's questions and reference answers and renders the
/// grading context for one student's submission.
///
/// The student's answers are aligned to questions by `question_id`; an
/// unanswered question still occupies its ordinal so the numbering presented
/// to the model stays consistent with the mapping. An assignment without
/// questions yields a degenerate "0 questions" criteria block rather than an
/// error.
pub async fn assemble_context(
    db: &DatabaseConnection,
    assignment_id: i64,
    answers: &[SubmittedAnswer],
) -> Result<GradingContext, GraderError> {
    let questions = question::Entity::find()
        .filter(question::Column::AssignmentId.eq(assignment_id))
        .order_by_asc(question::Column::Id)
        .all(db)
        .await?;

    let question_ids: Vec<i64> = questions.iter().map(|q| q.id).collect();

    // First reference answer per question, in insertion order.
    let mut references: HashMap<i64, String> = HashMap::new();
    if !question_ids.is_empty() {
        let teacher_answers = teacher_response::Entity::find()
            .filter(teacher_response::Column::QuestionId.is_in(question_ids.clone()))
            .order_by_asc(teacher_response::Column::Id)
            .all(db)
            .await?;
        for answer in teacher_answers {
            references
                .entry(answer.question_id)
                .or_insert(answer.response_text);
        }
    }

    let by_question: HashMap<i64, &SubmittedAnswer> =
        answers.iter().map(|a| (a.question_id, a)).collect();

    let assembled: Vec<AssembledQuestion> = questions
        .into_iter()
        .map(|q| AssembledQuestion {
            question_id: q.id,
            question_text: q.question_text,
            max_points: q.max_points,
            reference_answer: references.remove(&q.id).unwrap_or_default(),
            student_answer: by_question
                .get(&q.id)
                .map(|a| a.response_text.clone()),
        })
        .collect();

    Ok(GradingContext::from_questions(&assembled))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_questions() -> Vec<AssembledQuestion> {
        vec![
            AssembledQuestion {
                question_id: 7,
                question_text: "Quelle est la capitale de la France ?".into(),
                max_points: 10.0,
                reference_answer: "Paris".into(),
                student_answer: Some("Paris".into()),
            },
            AssembledQuestion {
                question_id: 9,
                question_text: "En quelle année a débuté la Révolution française ?".into(),
                max_points: 10.0,
                reference_answer: "1789".into(),
                student_answer: Some("1800".into()),
            },
        ]
    }

    #[test]
    fn criteria_states_question_count_and_point_sum() {
        let context = GradingContext::from_questions(&sample_questions());
        assert!(context.criteria.contains("2 question(s)"));
        assert!(context.criteria.contains("20 points"));
    }

    #[test]
    fn criteria_degenerates_for_empty_assignment() {
        let context = GradingContext::from_questions(&[]);
        assert!(context.criteria.contains("0 question(s)"));
        assert!(context.criteria.contains("0 points"));
        assert!(context.corrected_assessment.is_empty());
    }

    #[test]
    fn ordinals_map_back_to_real_question_ids() {
        let context = GradingContext::from_questions(&sample_questions());
        assert_eq!(context.question_id_for(1), Some(7));
        assert_eq!(context.question_id_for(2), Some(9));
        assert_eq!(context.question_id_for(3), None);
        assert_eq!(context.question_id_for(0), None);
    }

    #[test]
    fn unanswered_question_keeps_its_ordinal() {
        let mut questions = sample_questions();
        questions[0].student_answer = None;
        let context = GradingContext::from_questions(&questions);
        assert!(!context.student_responses.contains("Question 1 "));
        assert!(context.student_responses.contains("Question 2 Réponse : 1800"));
        assert_eq!(context.question_id_for(1), Some(7));
    }

    #[test]
    fn assessment_block_numbers_questions_from_one() {
        let context = GradingContext::from_questions(&sample_questions());
        assert!(context.corrected_assessment.starts_with("Question 1 (10 points)"));
        assert!(context.corrected_assessment.contains("Question 2 (10 points)"));
        assert!(context.corrected_assessment.contains("Réponse : 1789"));
    }
}
