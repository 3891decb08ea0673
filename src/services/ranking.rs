//! Ordering and filtering for the assignment and course lists.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use feruca::Collator;
use serde::Serialize;

use crate::error::AppError;
use crate::models::{Assignment, AssignmentStatus, Course};
use crate::services::status::is_overdue;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    #[default]
    DueDate,
    Priority,
    Course,
}

impl FromStr for SortKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "duedate" | "due-date" | "due_date" => Ok(Self::DueDate),
            "priority" => Ok(Self::Priority),
            "course" => Ok(Self::Course),
            other => Err(AppError::BadRequest(format!("unknown sort key: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
    Overdue,
}

impl FromStr for StatusFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(Self::All),
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "overdue" => Ok(Self::Overdue),
            other => Err(AppError::BadRequest(format!("unknown status filter: {}", other))),
        }
    }
}

/// Course lookup by id. Assignments pointing at a missing course resolve to `None`.
pub struct CourseLookup<'a> {
    by_id: HashMap<i64, &'a Course>,
}

impl<'a> CourseLookup<'a> {
    pub fn new(courses: &'a [Course]) -> Self {
        Self {
            by_id: courses.iter().map(|c| (c.id, c)).collect(),
        }
    }

    pub fn get(&self, course_id: Option<i64>) -> Option<&'a Course> {
        course_id.and_then(|id| self.by_id.get(&id).copied())
    }

    /// Display name used for sorting; unknown courses sort as "".
    pub fn name_of(&self, assignment: &Assignment) -> &'a str {
        self.get(assignment.course_id)
            .map(|c| c.name.as_str())
            .unwrap_or("")
    }
}

thread_local! {
    static COLLATOR: RefCell<Collator> = RefCell::new(Collator::default());
}

/// Unicode Collation Algorithm order (root locale). Accented letters sort
/// with their base letter, and "" sorts before any name.
pub fn locale_compare(a: &str, b: &str) -> Ordering {
    COLLATOR.with(|collator| collator.borrow_mut().collate(a, b))
}

pub fn compare_assignments(
    a: &Assignment,
    b: &Assignment,
    key: SortKey,
    courses: &CourseLookup<'_>,
) -> Ordering {
    match key {
        SortKey::DueDate => a.due_at.cmp(&b.due_at),
        // Higher severity first.
        SortKey::Priority => b.priority.rank().cmp(&a.priority.rank()),
        SortKey::Course => locale_compare(courses.name_of(a), courses.name_of(b)),
    }
}

/// Case-insensitive substring match on the assignment name or its course's name.
pub fn matches_query(assignment: &Assignment, course: Option<&Course>, query: &str) -> bool {
    let needle = query.to_lowercase();
    assignment.name.to_lowercase().contains(&needle)
        || course.is_some_and(|c| c.name.to_lowercase().contains(&needle))
}

/// Overdue is matched on the effective status; the others on stored status,
/// so an overdue assignment also shows under `Pending`.
pub fn matches_status(assignment: &Assignment, filter: StatusFilter, now: DateTime<Utc>) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Pending => assignment.status == AssignmentStatus::Pending,
        StatusFilter::Completed => assignment.status == AssignmentStatus::Completed,
        StatusFilter::Overdue => is_overdue(assignment, now),
    }
}

#[derive(Debug, Clone, Default)]
pub struct AssignmentQuery {
    pub text: String,
    pub status: StatusFilter,
    pub sort: SortKey,
}

/// Filter then stable-sort, the way the assignment list shows them.
pub fn select_assignments<'a>(
    assignments: &'a [Assignment],
    courses: &CourseLookup<'_>,
    query: &AssignmentQuery,
    now: DateTime<Utc>,
) -> Vec<&'a Assignment> {
    let mut selected: Vec<&Assignment> = assignments
        .iter()
        .filter(|a| matches_query(a, courses.get(a.course_id), &query.text))
        .filter(|a| matches_status(a, query.status, now))
        .collect();

    selected.sort_by(|a, b| compare_assignments(a, b, query.sort, courses));
    selected
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SemesterFilter {
    #[default]
    All,
    Only(String),
}

impl FromStr for SemesterFilter {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            Ok(Self::All)
        } else {
            Ok(Self::Only(s.to_string()))
        }
    }
}

pub fn course_matches_query(course: &Course, query: &str) -> bool {
    let needle = query.to_lowercase();
    [&course.name, &course.code, &course.instructor]
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

/// Distinct semester labels in first-seen order.
pub fn unique_semesters(courses: &[Course]) -> Vec<&str> {
    let mut seen: Vec<&str> = Vec::new();
    for course in courses {
        if !seen.contains(&course.semester.as_str()) {
            seen.push(&course.semester);
        }
    }
    seen
}

pub fn select_courses<'a>(
    courses: &'a [Course],
    query: &str,
    semester: &SemesterFilter,
) -> Vec<&'a Course> {
    courses
        .iter()
        .filter(|c| course_matches_query(c, query))
        .filter(|c| match semester {
            SemesterFilter::All => true,
            SemesterFilter::Only(label) => &c.semester == label,
        })
        .collect()
}
