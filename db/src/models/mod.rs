pub mod assignment;
pub mod course;
pub mod enrollment;
pub mod feedback;
pub mod question;
pub mod student_response;
pub mod teacher_response;
pub mod user;

pub use assignment::Entity as Assignment;
pub use course::Entity as Course;
pub use enrollment::Entity as Enrollment;
pub use feedback::Entity as Feedback;
pub use question::Entity as Question;
pub use student_response::Entity as StudentResponse;
pub use teacher_response::Entity as TeacherResponse;
pub use user::Entity as User;
