//! Where course and assignment records come from.
//!
//! Everything here is I/O and normalization. The derived-state services only
//! ever see the normalized models.

pub mod dto;

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::course::DEFAULT_COLOR;
use crate::models::assignment::DEFAULT_MAX_GRADE;
use crate::models::{Assignment, AssignmentStatus, Course, Priority, parse_due_date};

use dto::{Record, RecordList};

#[async_trait]
pub trait RecordSource: Send + Sync {
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError>;
    async fn fetch_assignments(&self) -> Result<Vec<Assignment>, AppError>;
}

/// Reads the two collections from JSON files on disk.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    courses_path: PathBuf,
    assignments_path: PathBuf,
}

impl JsonFileSource {
    pub fn new(courses_path: impl Into<PathBuf>, assignments_path: impl Into<PathBuf>) -> Self {
        Self {
            courses_path: courses_path.into(),
            assignments_path: assignments_path.into(),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.courses_path.clone(), config.assignments_path.clone())
    }

    async fn read_records(path: &Path) -> Result<Vec<Record>, AppError> {
        let body = tokio::fs::read_to_string(path).await.map_err(|e| {
            warn!("Failed to read {}: {}", path.display(), e);
            AppError::Io(e)
        })?;
        let list: RecordList = serde_json::from_str(&body)?;
        Ok(list.into_records())
    }
}

#[async_trait]
impl RecordSource for JsonFileSource {
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        let records = Self::read_records(&self.courses_path).await?;
        let courses = courses_from_records(&records);
        info!(
            "Loaded {} courses from {}",
            courses.len(),
            self.courses_path.display()
        );
        Ok(courses)
    }

    async fn fetch_assignments(&self) -> Result<Vec<Assignment>, AppError> {
        let records = Self::read_records(&self.assignments_path).await?;
        let assignments = assignments_from_records(&records);
        info!(
            "Loaded {} assignments from {}",
            assignments.len(),
            self.assignments_path.display()
        );
        Ok(assignments)
    }
}

/// Holds already-normalized collections.
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
}

impl InMemorySource {
    pub fn new(courses: Vec<Course>, assignments: Vec<Assignment>) -> Self {
        Self {
            courses,
            assignments,
        }
    }
}

#[async_trait]
impl RecordSource for InMemorySource {
    async fn fetch_courses(&self) -> Result<Vec<Course>, AppError> {
        Ok(self.courses.clone())
    }

    async fn fetch_assignments(&self) -> Result<Vec<Assignment>, AppError> {
        Ok(self.assignments.clone())
    }
}

/// Records that fail to normalize are skipped with a warning.
pub fn courses_from_records(records: &[Record]) -> Vec<Course> {
    let mut courses = Vec::with_capacity(records.len());
    for record in records {
        match parse_course_from_record(record) {
            Ok(course) => courses.push(course),
            Err(e) => warn!("Skipping course record: {}", e),
        }
    }
    courses
}

pub fn assignments_from_records(records: &[Record]) -> Vec<Assignment> {
    let mut assignments = Vec::with_capacity(records.len());
    for record in records {
        match parse_assignment_from_record(record) {
            Ok(assignment) => assignments.push(assignment),
            Err(e) => warn!("Skipping assignment record: {}", e),
        }
    }
    assignments
}

pub fn parse_course_from_record(record: &Record) -> Result<Course, AppError> {
    let id = record
        .integer(&["id", "Id"])
        .ok_or_else(|| AppError::InvalidRecord("course without id".to_string()))?;
    let name = record.text(&["name", "Name"]).unwrap_or_default();

    let grade_categories = record.categories(&["gradeCategories", "grade_categories_c"]);
    let total_weight: f64 = grade_categories.iter().map(|c| c.weight).sum();
    if !grade_categories.is_empty() && (total_weight - 100.0).abs() > 1e-6 {
        warn!(
            "Course {} ({}) category weights sum to {}, not 100",
            id, name, total_weight
        );
    }

    Ok(Course {
        id,
        name,
        code: record.text(&["code", "code_c"]).unwrap_or_default(),
        instructor: record.text(&["instructor", "instructor_c"]).unwrap_or_default(),
        semester: record.text(&["semester", "semester_c"]).unwrap_or_default(),
        credits: record
            .integer(&["credits", "credits_c"])
            .and_then(|c| u32::try_from(c).ok())
            .unwrap_or(0),
        color: record
            .text(&["color", "color_c"])
            .unwrap_or_else(|| DEFAULT_COLOR.to_string()),
        current_grade: record.number(&["currentGrade", "current_grade_c"]),
        grade_categories,
    })
}

pub fn parse_assignment_from_record(record: &Record) -> Result<Assignment, AppError> {
    let id = record
        .integer(&["id", "Id"])
        .ok_or_else(|| AppError::InvalidRecord("assignment without id".to_string()))?;

    let raw_due = record.text(&["dueDate", "due_date_c"]).unwrap_or_default();
    let due_at = parse_due_date(&raw_due).ok_or_else(|| {
        AppError::InvalidRecord(format!("assignment {} has unreadable due date {:?}", id, raw_due))
    })?;

    Ok(Assignment {
        id,
        name: record.text(&["name", "Name"]).unwrap_or_default(),
        course_id: record.reference(&["courseId", "course_id_c"]),
        due_at,
        priority: record
            .text(&["priority", "priority_c"])
            .map(|p| Priority::parse(&p))
            .unwrap_or_default(),
        category: record.text(&["category", "category_c"]).unwrap_or_default(),
        status: record
            .text(&["status", "status_c"])
            .map(|s| AssignmentStatus::parse(&s))
            .unwrap_or_default(),
        grade: record.integer(&["grade", "grade_c"]),
        max_grade: record
            .integer(&["maxGrade", "max_grade_c"])
            .and_then(|m| u32::try_from(m).ok())
            .filter(|m| *m > 0)
            .unwrap_or(DEFAULT_MAX_GRADE),
        description: record.text(&["description", "description_c"]).unwrap_or_default(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use serde_json::json;

    fn record(value: serde_json::Value) -> Record {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn storage_named_course_is_normalized() {
        let course = parse_course_from_record(&record(json!({
            "Id": 4,
            "Name": "Statistics",
            "code_c": "STAT 200",
            "instructor_c": "Dr. Bayes",
            "semester_c": "Spring 2025",
            "credits_c": 4,
            "current_grade_c": 91,
            "grade_categories_c": "[{\"name\":\"Exams\",\"weight\":70},{\"name\":\"Homework\",\"weight\":30}]"
        })))
        .unwrap();

        assert_eq!(course.id, 4);
        assert_eq!(course.name, "Statistics");
        assert_eq!(course.credits, 4);
        assert_eq!(course.color, DEFAULT_COLOR);
        assert_eq!(course.graded_percentage(), Some(91.0));
        assert_eq!(course.grade_categories.len(), 2);
    }

    #[test]
    fn assignment_defaults_apply() {
        let assignment = parse_assignment_from_record(&record(json!({
            "id": 9,
            "name": "Lab 3",
            "courseId": 4,
            "dueDate": "2024-11-02T23:59:00.000Z",
            "maxGrade": 0
        })))
        .unwrap();

        assert_eq!(assignment.status, AssignmentStatus::Pending);
        assert_eq!(assignment.priority, Priority::Medium);
        assert_eq!(assignment.max_grade, DEFAULT_MAX_GRADE);
        assert_eq!(assignment.grade, None);
        assert_eq!(
            assignment.due_at,
            Utc.with_ymd_and_hms(2024, 11, 2, 23, 59, 0).unwrap()
        );
    }

    #[test]
    fn bad_records_are_skipped() {
        let records = vec![
            record(json!({ "id": 1, "name": "ok", "dueDate": "2024-11-02" })),
            record(json!({ "id": 2, "name": "no date" })),
            record(json!({ "name": "no id", "dueDate": "2024-11-02" })),
        ];
        let assignments = assignments_from_records(&records);
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].id, 1);
    }
}
