pub mod calendar;
pub mod grade_calculator;
pub mod letter_grade;
pub mod ranking;
pub mod status;
pub mod summary;

pub use calendar::{CalendarDay, assignments_due_on, calendar_month, month_grid, shift_month};
pub use grade_calculator::{
    GradeCalculator, GradeEntrySet, compute_course_grade, format_percentage, parse_score,
};
pub use letter_grade::{GpaStanding, GradeBand, LetterBucket, letter_grade};
pub use ranking::{
    AssignmentQuery, CourseLookup, SemesterFilter, SortKey, StatusFilter, compare_assignments,
    select_assignments, select_courses, unique_semesters,
};
pub use status::{assignment_status, effective_status, is_overdue};
pub use summary::{
    AssignmentCounts, DashboardSummary, GradeStats, assignment_counts, average_gpa,
    build_dashboard_summary, build_grade_stats, credit_weighted_gpa, grade_distribution,
};
