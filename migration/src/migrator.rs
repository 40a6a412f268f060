use sea_orm_migration::prelude::*;

use crate::migrations;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(migrations::m202608300001_create_users::Migration),
            Box::new(migrations::m202608300002_create_courses::Migration),
            Box::new(migrations::m202608300003_create_enrollments::Migration),
            Box::new(migrations::m202608300004_create_assignments::Migration),
            Box::new(migrations::m202608300005_create_questions::Migration),
            Box::new(migrations::m202608300006_create_teacher_responses::Migration),
            Box::new(migrations::m202608300007_create_student_responses::Migration),
            Box::new(migrations::m202608300008_create_feedback::Migration),
        ]
    }
}
