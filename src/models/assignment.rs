use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_MAX_GRADE: u32 = 100;
pub const DEFAULT_CATEGORY: &str = "Assignments";

/// Status as stored. Overdue is never stored, see `services::status`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentStatus {
    #[default]
    Pending,
    Completed,
}

impl AssignmentStatus {
    /// Anything other than "completed" is treated as pending.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("completed") {
            Self::Completed
        } else {
            Self::Pending
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Completed,
            Self::Completed => Self::Pending,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EffectiveStatus {
    Pending,
    Completed,
    Overdue,
}

/// Serialized as its plain name; an unrecognized value is written back verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Unrecognized(String),
}

impl Priority {
    /// Missing priority defaults to medium; unknown values are kept as given.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_lowercase().as_str() {
            "" | "medium" => Self::Medium,
            "low" => Self::Low,
            "high" => Self::High,
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }

    /// Severity ordinal used when sorting: high=3, medium=2, low=1, anything else 0.
    pub fn rank(&self) -> u8 {
        match self {
            Self::High => 3,
            Self::Medium => 2,
            Self::Low => 1,
            Self::Unrecognized(_) => 0,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<String> for Priority {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<Priority> for String {
    fn from(priority: Priority) -> Self {
        priority.as_str().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub name: String,
    pub course_id: Option<i64>,
    #[serde(rename = "dueDate")]
    pub due_at: DateTime<Utc>,
    pub priority: Priority,
    pub category: String,
    pub status: AssignmentStatus,
    pub grade: Option<i64>,
    pub max_grade: u32,
    pub description: String,
}

impl Assignment {
    pub fn is_completed(&self) -> bool {
        self.status == AssignmentStatus::Completed
    }

    /// Flip between pending and completed. The only status transition there is.
    pub fn toggle_status(&mut self) {
        self.status = self.status.toggled();
    }

    pub fn is_graded(&self) -> bool {
        self.grade.is_some()
    }
}

/// Parse a due timestamp.
///
/// Accepts RFC 3339, a local `YYYY-MM-DDTHH:MM[:SS]` (read as UTC) and a bare
/// `YYYY-MM-DD` (midnight UTC).
pub fn parse_due_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Create-form payload. Validated and normalized here before the record is
/// handed to whatever store persists it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAssignmentRequest {
    pub name: String,
    pub course_id: Option<i64>,
    pub due_date: Option<String>,
    pub priority: Option<String>,
    pub category: Option<String>,
    pub max_grade: Option<u32>,
    pub description: Option<String>,
}

impl NewAssignmentRequest {
    pub fn validate(&self) -> Result<DateTime<Utc>, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Assignment name is required".to_string()));
        }
        if self.course_id.is_none() {
            return Err(AppError::BadRequest("Course selection is required".to_string()));
        }
        let raw_due = self
            .due_date
            .as_deref()
            .ok_or_else(|| AppError::BadRequest("Due date is required".to_string()))?;
        parse_due_date(raw_due)
            .ok_or_else(|| AppError::BadRequest(format!("Invalid due date: {}", raw_due)))
    }

    /// New assignments always start pending and ungraded.
    pub fn into_assignment(self, id: i64) -> Result<Assignment, AppError> {
        let due_at = self.validate()?;

        Ok(Assignment {
            id,
            name: self.name,
            course_id: self.course_id,
            due_at,
            priority: self
                .priority
                .as_deref()
                .map(Priority::parse)
                .unwrap_or_default(),
            category: self
                .category
                .unwrap_or_else(|| DEFAULT_CATEGORY.to_string()),
            status: AssignmentStatus::Pending,
            grade: None,
            max_grade: self
                .max_grade
                .filter(|max| *max > 0)
                .unwrap_or(DEFAULT_MAX_GRADE),
            description: self.description.unwrap_or_default(),
        })
    }
}
