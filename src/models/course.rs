use serde::{Deserialize, Serialize};

use crate::error::AppError;

pub const DEFAULT_COLOR: &str = "#5b21b6";
pub const DEFAULT_CREDITS: u32 = 3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeCategory {
    pub name: String,
    pub weight: f64,
}

impl GradeCategory {
    pub fn new(name: impl Into<String>, weight: f64) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }
}

/// Weighting scheme new courses start from.
pub fn default_grade_categories() -> Vec<GradeCategory> {
    vec![
        GradeCategory::new("Assignments", 40.0),
        GradeCategory::new("Exams", 35.0),
        GradeCategory::new("Participation", 15.0),
        GradeCategory::new("Final Project", 10.0),
    ]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub code: String,
    pub instructor: String,
    pub semester: String,
    pub credits: u32,
    pub color: String,
    pub current_grade: Option<f64>,
    pub grade_categories: Vec<GradeCategory>,
}

impl Course {
    /// The entered grade, if any. Zero means "not yet graded".
    pub fn graded_percentage(&self) -> Option<f64> {
        self.current_grade.filter(|grade| *grade > 0.0)
    }

    pub fn is_graded(&self) -> bool {
        self.graded_percentage().is_some()
    }

    /// Sum of category weights. Expected to be 100 but never enforced.
    pub fn total_category_weight(&self) -> f64 {
        self.grade_categories.iter().map(|c| c.weight).sum()
    }
}

/// Create-form payload, see [`crate::Snapshot::preview_course`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourseRequest {
    pub name: String,
    pub code: String,
    pub instructor: String,
    #[serde(default)]
    pub semester: String,
    pub credits: Option<u32>,
    pub color: Option<String>,
    pub current_grade: Option<f64>,
    pub grade_categories: Option<Vec<GradeCategory>>,
}

impl NewCourseRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::BadRequest("Course name is required".to_string()));
        }
        if self.code.trim().is_empty() {
            return Err(AppError::BadRequest("Course code is required".to_string()));
        }
        if self.instructor.trim().is_empty() {
            return Err(AppError::BadRequest("Instructor is required".to_string()));
        }
        Ok(())
    }

    pub fn into_course(self, id: i64) -> Result<Course, AppError> {
        self.validate()?;

        Ok(Course {
            id,
            name: self.name,
            code: self.code,
            instructor: self.instructor,
            semester: self.semester,
            credits: self.credits.unwrap_or(DEFAULT_CREDITS),
            color: self.color.unwrap_or_else(|| DEFAULT_COLOR.to_string()),
            current_grade: self.current_grade,
            grade_categories: self
                .grade_categories
                .unwrap_or_else(default_grade_categories),
        })
    }
}
