pub mod m202608300001_create_users;
pub mod m202608300002_create_courses;
pub mod m202608300003_create_enrollments;
pub mod m202608300004_create_assignments;
pub mod m202608300005_create_questions;
pub mod m202608300006_create_teacher_responses;
pub mod m202608300007_create_student_responses;
pub mod m202608300008_create_feedback;
