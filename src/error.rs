use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found")]
    NotFound,

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Invalid record: {0}")]
    InvalidRecord(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl From<&AppError> for ErrorResponse {
    fn from(err: &AppError) -> Self {
        let kind = match err {
            AppError::Io(_) => "io",
            AppError::Json(_) => "json",
            AppError::NotFound => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::InvalidRecord(_) => "invalid_record",
        };

        Self {
            error: kind.to_string(),
            message: err.to_string(),
        }
    }
}
