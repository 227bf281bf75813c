use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StaffError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid team profile: {reason}")]
    InvalidProfile { reason: String },

    #[error("Analysis failed: {reason}")]
    Processing { reason: String },

    #[error("Remote scoring failed: {0}")]
    UpstreamScoring(String),

    #[error("Remote scoring timed out after {timeout_ms}ms")]
    ScoringTimeout { timeout_ms: u64 },

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("Team comparison needs {min}..={max} teams, got {actual}")]
    ComparisonSize { min: usize, max: usize, actual: usize },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StaffError {
    /// True for errors raised because the caller handed in bad input,
    /// as opposed to a failure while processing valid input.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            StaffError::InvalidProfile { .. }
                | StaffError::InvalidDateRange { .. }
                | StaffError::ComparisonSize { .. }
        )
    }
}

pub type StaffResult<T> = Result<T, StaffError>;
