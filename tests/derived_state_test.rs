use chrono::{DateTime, Duration, TimeZone, Utc};
use studytrack::models::{
    Assignment, AssignmentStatus, Course, EffectiveStatus, GradeCategory, Priority,
};
use studytrack::services::{
    AssignmentQuery, CourseLookup, GradeEntrySet, SortKey, StatusFilter, build_dashboard_summary,
    build_grade_stats, compute_course_grade, credit_weighted_gpa, effective_status, letter_grade,
    select_assignments,
};

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 15, 12, 0, 0).unwrap()
}

fn course(id: i64, name: &str, grade: Option<f64>, credits: u32) -> Course {
    Course {
        id,
        name: name.to_string(),
        code: format!("C{}", id),
        instructor: "Staff".to_string(),
        semester: "Fall 2024".to_string(),
        credits,
        color: "#5b21b6".to_string(),
        current_grade: grade,
        grade_categories: vec![
            GradeCategory::new("Exams", 50.0),
            GradeCategory::new("Homework", 50.0),
        ],
    }
}

fn assignment(
    id: i64,
    course_id: i64,
    due_in_hours: i64,
    status: AssignmentStatus,
    priority: Priority,
) -> Assignment {
    Assignment {
        id,
        name: format!("Assignment {}", id),
        course_id: Some(course_id),
        due_at: now() + Duration::hours(due_in_hours),
        priority,
        category: "Homework".to_string(),
        status,
        grade: None,
        max_grade: 100,
        description: String::new(),
    }
}

fn fixture() -> (Vec<Course>, Vec<Assignment>) {
    let courses = vec![
        course(1, "Physics", Some(90.0), 3),
        course(2, "Art History", Some(80.0), 1),
        course(3, "Calculus", None, 4),
    ];
    let assignments = vec![
        assignment(1, 1, -48, AssignmentStatus::Pending, Priority::High),
        assignment(2, 2, 24, AssignmentStatus::Pending, Priority::Low),
        assignment(3, 3, 72, AssignmentStatus::Completed, Priority::Medium),
        assignment(4, 99, 200, AssignmentStatus::Pending, Priority::parse("someday")),
        assignment(5, 1, 0, AssignmentStatus::Pending, Priority::Medium),
    ];
    (courses, assignments)
}

#[test]
fn test_dashboard_summary_end_to_end() {
    let (courses, assignments) = fixture();
    let summary = build_dashboard_summary(&courses, &assignments, now());

    assert_eq!(summary.total_courses, 3);
    // Due now is neither overdue nor upcoming.
    assert_eq!(summary.upcoming.iter().map(|a| a.id).collect::<Vec<_>>(), vec![2]);
    assert_eq!(summary.overdue.iter().map(|a| a.id).collect::<Vec<_>>(), vec![1]);
    assert!((summary.completion_rate - 20.0).abs() < 1e-9);
    assert!((summary.average_gpa - 3.4).abs() < 1e-9);
    assert_eq!(summary.recent_grades.len(), 2);
}

#[test]
fn test_summary_is_deterministic_for_fixed_clock() {
    let (courses, assignments) = fixture();
    let first = build_dashboard_summary(&courses, &assignments, now());
    let second = build_dashboard_summary(&courses, &assignments, now());
    assert_eq!(first, second);
}

#[test]
fn test_two_gpa_figures_stay_distinct() {
    let (courses, assignments) = fixture();
    let dashboard = build_dashboard_summary(&courses, &assignments, now());
    let grades = build_grade_stats(&courses, &assignments);

    assert!((credit_weighted_gpa(&courses) - 3.5).abs() < 1e-9);
    assert!((grades.overall_gpa - 3.5).abs() < 1e-9);
    assert!((dashboard.average_gpa - grades.overall_gpa).abs() > 0.05);
}

#[test]
fn test_overdue_transition_follows_clock() {
    let (_, assignments) = fixture();
    let target = &assignments[1];
    assert_eq!(
        effective_status(target.due_at, target.status, now()),
        EffectiveStatus::Pending
    );
    assert_eq!(
        effective_status(target.due_at, target.status, now() + Duration::hours(25)),
        EffectiveStatus::Overdue
    );

    let mut done = target.clone();
    done.toggle_status();
    assert_eq!(
        effective_status(done.due_at, done.status, now() + Duration::hours(25)),
        EffectiveStatus::Completed
    );
}

#[test]
fn test_assignment_list_sorted_by_priority_and_course() {
    let (courses, assignments) = fixture();
    let lookup = CourseLookup::new(&courses);

    let by_priority = AssignmentQuery {
        sort: SortKey::Priority,
        ..Default::default()
    };
    let ids: Vec<i64> = select_assignments(&assignments, &lookup, &by_priority, now())
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![1, 3, 5, 2, 4]);

    let by_course = AssignmentQuery {
        sort: SortKey::Course,
        ..Default::default()
    };
    let ids: Vec<i64> = select_assignments(&assignments, &lookup, &by_course, now())
        .iter()
        .map(|a| a.id)
        .collect();
    // Unknown course first, then Art History, Calculus, Physics.
    assert_eq!(ids, vec![4, 2, 3, 1, 5]);
}

#[test]
fn test_overdue_filter_combined_with_search() {
    let (courses, assignments) = fixture();
    let lookup = CourseLookup::new(&courses);
    let query = AssignmentQuery {
        text: "physics".to_string(),
        status: StatusFilter::Overdue,
        sort: SortKey::DueDate,
    };
    let ids: Vec<i64> = select_assignments(&assignments, &lookup, &query, now())
        .iter()
        .map(|a| a.id)
        .collect();
    assert_eq!(ids, vec![1]);
}

#[test]
fn test_calculator_renormalizes_and_maps_letter() {
    let physics = course(1, "Physics", None, 3);
    let mut entries = GradeEntrySet::new();
    assert_eq!(compute_course_grade(&physics.grade_categories, &entries), None);

    entries.push_score("Exams", "100");
    assert_eq!(compute_course_grade(&physics.grade_categories, &entries), Some(100.0));

    entries.push_score("Homework", "80");
    let grade = compute_course_grade(&physics.grade_categories, &entries).unwrap();
    assert!((grade - 90.0).abs() < 1e-9);
    assert_eq!(letter_grade(90.0), "A-");
    assert_eq!(letter_grade(89.999), "B+");
}
