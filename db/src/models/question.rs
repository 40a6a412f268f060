use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// A single question belonging to one assignment.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub question_text: String,
    /// Maximum points attainable for this question.
    pub max_points: f64,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignment::Entity",
        from = "Column::AssignmentId",
        to = "super::assignment::Column::Id"
    )]
    Assignment,

    /// Teacher reference answers used as grading ground truth.
    #[sea_orm(has_many = "super::teacher_response::Entity")]
    TeacherResponse,

    #[sea_orm(has_many = "super::student_response::Entity")]
    StudentResponse,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::teacher_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TeacherResponse.def()
    }
}

impl Related<super::student_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentResponse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
