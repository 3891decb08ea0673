pub mod assignment;
pub mod course;

pub use assignment::{
    Assignment, AssignmentStatus, EffectiveStatus, NewAssignmentRequest, Priority, parse_due_date,
};
pub use course::{Course, GradeCategory, NewCourseRequest, default_grade_categories};
