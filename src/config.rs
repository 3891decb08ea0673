use std::env;
use std::path::PathBuf;

use crate::error::AppError;

pub const DEFAULT_COURSES_PATH: &str = "courses.json";
pub const DEFAULT_ASSIGNMENTS_PATH: &str = "assignments.json";
pub const DEFAULT_LOG_FILTER: &str = "studytrack=info";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub courses_path: PathBuf,
    pub assignments_path: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            courses_path: PathBuf::from(DEFAULT_COURSES_PATH),
            assignments_path: PathBuf::from(DEFAULT_ASSIGNMENTS_PATH),
        }
    }
}

impl AppConfig {
    /// Reads `STUDYTRACK_COURSES` and `STUDYTRACK_ASSIGNMENTS`, falling back to
    /// files in the working directory. Set-but-empty values are an error.
    pub fn new_from_env() -> Result<Self, AppError> {
        let courses_path = path_from_env("STUDYTRACK_COURSES", DEFAULT_COURSES_PATH)?;
        let assignments_path = path_from_env("STUDYTRACK_ASSIGNMENTS", DEFAULT_ASSIGNMENTS_PATH)?;

        Ok(Self {
            courses_path,
            assignments_path,
        })
    }

    /// CLI flags take precedence over the environment.
    pub fn with_overrides(
        mut self,
        courses_path: Option<PathBuf>,
        assignments_path: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = courses_path {
            self.courses_path = path;
        }
        if let Some(path) = assignments_path {
            self.assignments_path = path;
        }
        self
    }
}

fn path_from_env(key: &str, default: &str) -> Result<PathBuf, AppError> {
    match env::var(key) {
        Ok(value) if value.trim().is_empty() => {
            Err(AppError::BadRequest(format!("{} is set but empty", key)))
        }
        Ok(value) => Ok(PathBuf::from(value)),
        Err(_) => Ok(PathBuf::from(default)),
    }
}

/// `RUST_LOG` if set, otherwise the crate default.
pub fn log_filter() -> String {
    env::var("RUST_LOG").unwrap_or_else(|_| DEFAULT_LOG_FILTER.to_string())
}
