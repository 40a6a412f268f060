use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};

/// State of a student's relationship to a course.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(
    rs_type = "String",
    db_type = "Enum",
    enum_name = "enrollment_status_enum"
)]
pub enum EnrollmentStatus {
    /// Actively enrolled; assignments are visible and gradable.
    #[sea_orm(string_value = "enrolled")]
    Enrolled,
    /// Course finished successfully.
    #[sea_orm(string_value = "completed")]
    Completed,
    /// Course finished unsuccessfully.
    #[sea_orm(string_value = "failed")]
    Failed,
}

impl Default for EnrollmentStatus {
    fn default() -> Self {
        Self::Enrolled
    }
}

/// Records a student's membership in a course.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "enrollments")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub course_id: i64,
    pub student_id: i64,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id"
    )]
    Course,

    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::StudentId",
        to = "super::user::Column::Id"
    )]
    Student,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl Model {
    /// Returns true if the student holds an `enrolled` row for the course.
    ///
    /// Used as the entry guard before any grading work is scheduled.
    pub async fn is_enrolled(
        db: &DatabaseConnection,
        student_id: i64,
        course_id: i64,
    ) -> Result<bool, DbErr> {
        let found = Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Status.eq(EnrollmentStatus::Enrolled))
            .one(db)
            .await?;
        Ok(found.is_some())
    }
}

impl ActiveModelBehavior for ActiveModel {}
