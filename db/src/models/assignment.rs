use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;

/// Represents a gradable unit of work within a course.
///
/// An assignment owns its questions and, transitively, the teacher reference
/// answers; it also owns every student response submitted against it. Deleting
/// an assignment cascades to all of those plus its feedback records.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "assignments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    /// Instructional text shown to students.
    pub instructions: Option<String>,
    /// Total point value of the assignment.
    pub points: f64,
    pub due_date: Option<DateTime<Utc>>,
    /// Whether questions have been composed for this assignment yet.
    pub composed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,

    #[sea_orm(has_many = "super::question::Entity")]
    Question,

    #[sea_orm(has_many = "super::student_response::Entity")]
    StudentResponse,

    #[sea_orm(has_many = "super::feedback::Entity")]
    Feedback,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::question::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl Related<super::student_response::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StudentResponse.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
