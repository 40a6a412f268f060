use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Assignment-level advice for one student, produced by a grading attempt.
///
/// Keyed off the representative (first) student response of the
/// (assignment, student) pair; at most one record exists per pair.
/// `state` starts false (pending teacher review) and is flipped to true by
/// the one-way validate operation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "feedback")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    #[sea_orm(unique)]
    pub student_response_id: i64,
    pub advice: String,
    pub state: bool,
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

    #[sea_orm(
        belongs_to = "super::student_response::Entity",
        from = "Column::StudentResponseId",
        to = "super::student_response::Column::Id"
    )]
    StudentResponse,
}

impl Related<super::assignment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl Related<super::student_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentResponse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
