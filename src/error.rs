use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SprintError {
    #[error("Invalid range: start {start} is after end {end}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid sprint config: {0}")]
    InvalidConfig(String),

    #[error("Date {date} is before the first sprint ({anchor})")]
    DateBeforeFirstSprint { date: NaiveDate, anchor: NaiveDate },

    #[error("Not a sprintcap directory. Run `sprintcap init` first.")]
    NotInitialized,

    #[error("Already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, SprintError>;
