use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::error::AppError;
use crate::models::{Assignment, Course, NewAssignmentRequest, NewCourseRequest};
use crate::services::summary::{
    DashboardSummary, GradeStats, build_dashboard_summary, build_grade_stats,
};
use crate::source::RecordSource;

#[derive(Clone)]
pub struct AppState {
    pub source: Arc<dyn RecordSource>,
}

impl AppState {
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    pub async fn snapshot(&self) -> Result<Snapshot, AppError> {
        Snapshot::load(self.source.as_ref()).await
    }
}

/// Both collections, fully fetched. Aggregation only ever runs on one of these.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub courses: Vec<Course>,
    pub assignments: Vec<Assignment>,
}

impl Snapshot {
    pub async fn load(source: &dyn RecordSource) -> Result<Self, AppError> {
        let (courses, assignments) =
            tokio::try_join!(source.fetch_courses(), source.fetch_assignments())?;
        info!(
            "Snapshot ready: {} courses, {} assignments",
            courses.len(),
            assignments.len()
        );
        Ok(Self {
            courses,
            assignments,
        })
    }

    pub fn course(&self, id: i64) -> Result<&Course, AppError> {
        self.courses
            .iter()
            .find(|c| c.id == id)
            .ok_or(AppError::NotFound)
    }

    pub fn next_course_id(&self) -> i64 {
        self.courses.iter().map(|c| c.id).max().unwrap_or(0) + 1
    }

    pub fn next_assignment_id(&self) -> i64 {
        self.assignments.iter().map(|a| a.id).max().unwrap_or(0) + 1
    }

    /// The course a create request would produce. Nothing is written.
    pub fn preview_course(&self, request: NewCourseRequest) -> Result<Course, AppError> {
        request.into_course(self.next_course_id())
    }

    /// The assignment a create request would produce. The referenced course
    /// must be part of this snapshot. Nothing is written.
    pub fn preview_assignment(&self, request: NewAssignmentRequest) -> Result<Assignment, AppError> {
        let assignment = request.into_assignment(self.next_assignment_id())?;
        if let Some(course_id) = assignment.course_id {
            if self.course(course_id).is_err() {
                return Err(AppError::BadRequest(format!("Unknown course: {}", course_id)));
            }
        }
        Ok(assignment)
    }

    pub fn dashboard(&self, now: DateTime<Utc>) -> DashboardSummary<'_> {
        build_dashboard_summary(&self.courses, &self.assignments, now)
    }

    pub fn grade_stats(&self) -> GradeStats {
        build_grade_stats(&self.courses, &self.assignments)
    }
}
