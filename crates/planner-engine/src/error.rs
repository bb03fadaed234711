//! Error types for planner-engine operations.

use std::path::PathBuf;

use chrono::{NaiveDateTime, NaiveTime};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid task range: start {start} is not before end {end}")]
    InvalidRange {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },

    #[error("Invalid day window: wake {wake} is not before sleep {sleep}")]
    InvalidDayWindow { wake: NaiveTime, sleep: NaiveTime },

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failures reported by a [`Storage`](crate::storage::Storage) collaborator.
///
/// "No prior state" is not an error; storages report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum StorageError {
    /// The persisted document exists but could not be read or written.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The persisted document is not valid JSON or does not match the record layout.
    #[error("Corrupt calendar document: {0}")]
    Corrupt(#[from] serde_json::Error),

    /// The document parsed, but its contents contradict each other.
    #[error("Inconsistent calendar document: {0}")]
    Inconsistent(String),
}

pub type Result<T> = std::result::Result<T, EngineError>;
