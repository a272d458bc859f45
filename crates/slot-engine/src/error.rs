//! Error types for slot-engine operations.

use chrono::{NaiveDate, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SlotError {
    #[error("Invalid class time: end {end} must be after start {start}")]
    InvalidSpan { start: NaiveTime, end: NaiveTime },

    #[error("Invalid time window: {0}")]
    InvalidWindow(String),

    #[error("Class time conflicts with an existing class on {date}")]
    ScheduleConflict { date: NaiveDate },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("No student named '{0}'")]
    UnknownStudent(String),

    #[error("A student named '{0}' already exists")]
    DuplicateStudent(String),
}

pub type Result<T> = std::result::Result<T, SlotError>;
