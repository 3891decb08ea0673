//! Derived state for a personal course and assignment tracker: due status,
//! list ordering, weighted course grades, letter grades and GPA summaries.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod source;
pub mod state;

pub use error::AppError;
pub use state::{AppState, Snapshot};
