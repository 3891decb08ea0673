use std::io::Write;
use std::sync::Arc;

use chrono::{TimeZone, Utc};
use studytrack::models::{AssignmentStatus, Priority};
use studytrack::source::{InMemorySource, JsonFileSource, RecordSource};
use studytrack::{AppError, AppState, Snapshot};
use tempfile::NamedTempFile;

fn write_json(body: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    file.write_all(body.as_bytes())
        .expect("Failed to write temp file");
    file
}

const COURSES: &str = r##"[
    {
        "id": 1,
        "name": "Physics",
        "code": "PHY 101",
        "instructor": "Dr. Curie",
        "semester": "Fall 2024",
        "credits": 3,
        "color": "#2563eb",
        "currentGrade": 90,
        "gradeCategories": [{ "name": "Exams", "weight": 60 }, { "name": "Labs", "weight": 40 }]
    },
    {
        "Id": 2,
        "Name": "Art History",
        "code_c": "ART 210",
        "instructor_c": "Dr. Vasari",
        "semester_c": "Fall 2024",
        "credits_c": 1,
        "current_grade_c": 80,
        "grade_categories_c": "[{\"name\":\"Essays\",\"weight\":100}]"
    }
]"##;

const ASSIGNMENTS: &str = r#"{
    "success": true,
    "data": [
        {
            "Id": 10,
            "Name": "Lab report",
            "course_id_c": { "Id": 1, "Name": "Physics" },
            "due_date_c": "2024-10-14T23:59:00.000Z",
            "status_c": "pending",
            "priority_c": "high",
            "max_grade_c": 50
        },
        {
            "id": 11,
            "name": "Essay draft",
            "courseId": 2,
            "dueDate": "2024-10-17",
            "status": "completed",
            "priority": "someday",
            "grade": 45
        },
        {
            "id": 12,
            "name": "Missing date",
            "courseId": 2
        }
    ]
}"#;

#[tokio::test]
async fn test_json_source_normalizes_both_namings() {
    let courses_file = write_json(COURSES);
    let assignments_file = write_json(ASSIGNMENTS);
    let source = JsonFileSource::new(courses_file.path(), assignments_file.path());

    let courses = source.fetch_courses().await.expect("Failed to fetch courses");
    assert_eq!(courses.len(), 2);
    assert_eq!(courses[1].code, "ART 210");
    assert_eq!(courses[1].grade_categories.len(), 1);

    let assignments = source
        .fetch_assignments()
        .await
        .expect("Failed to fetch assignments");
    assert_eq!(assignments.len(), 2, "record without a due date is skipped");

    let lab = &assignments[0];
    assert_eq!(lab.course_id, Some(1));
    assert_eq!(lab.priority, Priority::High);
    assert_eq!(lab.max_grade, 50);
    assert_eq!(
        lab.due_at,
        Utc.with_ymd_and_hms(2024, 10, 14, 23, 59, 0).unwrap()
    );

    let essay = &assignments[1];
    assert_eq!(essay.status, AssignmentStatus::Completed);
    assert_eq!(essay.priority, Priority::Unrecognized("someday".to_string()));
    assert_eq!(
        serde_json::to_value(essay).unwrap()["priority"],
        serde_json::json!("someday")
    );
    assert_eq!(essay.grade, Some(45));
    assert_eq!(essay.max_grade, 100);
}

#[tokio::test]
async fn test_snapshot_feeds_dashboard() {
    let courses_file = write_json(COURSES);
    let assignments_file = write_json(ASSIGNMENTS);
    let state = AppState::new(Arc::new(JsonFileSource::new(
        courses_file.path(),
        assignments_file.path(),
    )));

    let snapshot = state.snapshot().await.expect("Failed to load snapshot");
    let now = Utc.with_ymd_and_hms(2024, 10, 15, 8, 0, 0).unwrap();
    let summary = snapshot.dashboard(now);

    assert_eq!(summary.total_courses, 2);
    assert_eq!(summary.overdue_count, 1);
    assert_eq!(summary.upcoming_count, 0);
    assert!((summary.completion_rate - 50.0).abs() < 1e-9);

    let stats = snapshot.grade_stats();
    assert!((stats.overall_gpa - 3.5).abs() < 1e-9);
    assert_eq!(stats.completed_assignments, 1);
}

#[tokio::test]
async fn test_missing_file_is_an_io_error() {
    let source = JsonFileSource::new("/nonexistent/courses.json", "/nonexistent/assignments.json");
    let err = Snapshot::load(&source).await.unwrap_err();
    assert!(matches!(err, AppError::Io(_)));
}

#[tokio::test]
async fn test_malformed_json_is_a_json_error() {
    let courses_file = write_json("{ not json");
    let assignments_file = write_json("[]");
    let source = JsonFileSource::new(courses_file.path(), assignments_file.path());
    let err = source.fetch_courses().await.unwrap_err();
    assert!(matches!(err, AppError::Json(_)));
}

#[tokio::test]
async fn test_in_memory_source_round_trip() {
    let source = InMemorySource::default();
    let snapshot = Snapshot::load(&source).await.expect("Failed to load snapshot");
    assert_eq!(snapshot, Snapshot::default());
    assert!(matches!(snapshot.course(1), Err(AppError::NotFound)));
}
