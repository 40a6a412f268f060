use chrono::{DateTime, Utc};
use sea_orm::FromJsonQueryResult;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Append-only sequence of every grade ever assigned to one response,
/// oldest first. The current grade is always the last entry.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
pub struct GradeHistory(pub Vec<f64>);

impl GradeHistory {
    /// Appends a grade to the history. Entries are never removed.
    pub fn record(&mut self, grade: f64) {
        self.0.push(grade);
    }

    /// Seeds the history from an existing single grade if it is still empty.
    ///
    /// Older rows graded before histories existed carry only `grade`; the
    /// first amendment folds that value in as the initial entry.
    pub fn seed_if_empty(&mut self, current: Option<f64>) {
        if self.0.is_empty() {
            if let Some(grade) = current {
                self.0.push(grade);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

/// One student's answer to one question of one assignment.
///
/// Mutated exclusively by the grading persister (automated grade) or the
/// manual-override operation (teacher correction); both append to the grade
/// history rather than discarding prior values.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "student_responses")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub question_id: i64,
    pub student_id: i64,
    pub response_text: String,
    /// Optional pointer to an uploaded file accompanying the answer.
    pub file_reference: Option<String>,
    /// Current grade; `None` until the first grading attempt lands.
    pub grade: Option<f64>,
    #[sea_orm(column_type = "Json")]
    pub grades: GradeHistory,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,

    #[sea_orm(
        belongs_to = "super::question::Entity",
        from = "Column::QuestionId",
        to = "super::question::Column::Id"
    )]
    Question,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,

    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedback,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Related<super::feedback::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Feedback.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::GradeHistory;

    #[test]
    fn record_appends_in_order() {
        let mut history = GradeHistory::default();
        history.record(10.0);
        history.record(7.5);
        assert_eq!(history.0, vec![10.0, 7.5]);
    }

    #[test]
    fn seed_if_empty_folds_in_current_grade_once() {
        let mut history = GradeHistory::default();
        history.seed_if_empty(Some(12.0));
        history.seed_if_empty(Some(99.0));
        assert_eq!(history.0, vec![12.0]);
    }

    #[test]
    fn seed_if_empty_without_grade_is_noop() {
        let mut history = GradeHistory::default();
        history.seed_if_empty(None);
        assert!(history.is_empty());
    }
}
