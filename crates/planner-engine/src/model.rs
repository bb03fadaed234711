//! Core data model: tasks, the daily active window, and free intervals.
//!
//! All times are naive local date-times. A task belongs to the date its
//! `start` falls on; that date is derived, never stored.

use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{EngineError, Result};

/// Opaque, stable identifier assigned by the [`TaskStore`](crate::store::TaskStore)
/// when a task is inserted. Identifiers are process-local and never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaskId(pub(crate) u64);

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A time-blocked task. Invariant: `start < end`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
}

impl Task {
    /// The date bucket this task belongs to.
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Field-wise equality ignoring the identifier.
    pub fn same_slot(&self, other: &Task) -> bool {
        self.start == other.start && self.end == other.end && self.title == other.title
    }
}

/// Unvalidated task input, as entered by the user or read from storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
}

impl TaskDraft {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime, title: impl Into<String>) -> Self {
        Self {
            start,
            end,
            title: title.into(),
        }
    }

    /// Build a draft from a date plus start/end times of day.
    pub fn on(date: NaiveDate, start: NaiveTime, end: NaiveTime, title: impl Into<String>) -> Self {
        Self::new(date.and_time(start), date.and_time(end), title)
    }

    /// Reject drafts whose range is empty or inverted.
    pub fn validate(&self) -> Result<()> {
        if self.start >= self.end {
            return Err(EngineError::InvalidRange {
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

const DEFAULT_WAKE: NaiveTime = match NaiveTime::from_hms_opt(9, 0, 0) {
    Some(t) => t,
    None => panic!("09:00 is a valid time"),
};

const DEFAULT_SLEEP: NaiveTime = match NaiveTime::from_hms_opt(22, 0, 0) {
    Some(t) => t,
    None => panic!("22:00 is a valid time"),
};

/// The daily `[wake, sleep]` envelope outside of which availability is not considered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    wake: NaiveTime,
    sleep: NaiveTime,
}

impl DayWindow {
    pub fn new(wake: NaiveTime, sleep: NaiveTime) -> Result<Self> {
        if wake >= sleep {
            return Err(EngineError::InvalidDayWindow { wake, sleep });
        }
        Ok(Self { wake, sleep })
    }

    pub fn wake(&self) -> NaiveTime {
        self.wake
    }

    pub fn sleep(&self) -> NaiveTime {
        self.sleep
    }

    /// Active hours of `date` as concrete date-times.
    pub fn bounds(&self, date: NaiveDate) -> (NaiveDateTime, NaiveDateTime) {
        (date.and_time(self.wake), date.and_time(self.sleep))
    }
}

impl Default for DayWindow {
    /// 09:00 to 22:00.
    fn default() -> Self {
        Self {
            wake: DEFAULT_WAKE,
            sleep: DEFAULT_SLEEP,
        }
    }
}

/// A free time window. Derived on demand; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FreeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl FreeInterval {
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}
