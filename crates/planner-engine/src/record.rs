//! Persisted calendar document.
//!
//! The on-disk layout carries the same tasks twice: grouped by ISO date under
//! `personal_calendar`, and flattened in insertion order under `busy_slots`.
//! Both are written from the single in-memory task list. On import,
//! `busy_slots` is authoritative for order and `personal_calendar` must agree
//! with it.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::StorageError;
use crate::model::{Task, TaskDraft};

/// One task as stored on disk. Times are ISO-8601 (`2026-03-02T10:00:00`).
///
/// Ordering is by `(start, end, title)`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskRecord {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub title: String,
}

impl From<&Task> for TaskRecord {
    fn from(t: &Task) -> Self {
        Self {
            start: t.start,
            end: t.end,
            title: t.title.clone(),
        }
    }
}

impl From<TaskRecord> for TaskDraft {
    fn from(r: TaskRecord) -> Self {
        TaskDraft::new(r.start, r.end, r.title)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarDocument {
    /// `YYYY-MM-DD` → tasks starting on that date, in insertion order.
    #[serde(default)]
    pub personal_calendar: BTreeMap<String, Vec<TaskRecord>>,
    /// Every task, in insertion order.
    #[serde(default)]
    pub busy_slots: Vec<TaskRecord>,
}

impl CalendarDocument {
    /// Build the document for a task list given in insertion order.
    pub fn from_tasks<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Self {
        let mut doc = Self::default();
        for task in tasks {
            let record = TaskRecord::from(task);
            doc.personal_calendar
                .entry(date_key(task.date()))
                .or_default()
                .push(record.clone());
            doc.busy_slots.push(record);
        }
        doc
    }

    pub fn is_empty(&self) -> bool {
        self.busy_slots.is_empty() && self.personal_calendar.values().all(Vec::is_empty)
    }

    /// Pretty JSON with two-space indentation and unescaped UTF-8.
    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, StorageError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Validate the document and return its tasks in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Inconsistent`] when a bucket key is not a date,
    /// a bucketed task starts on a different date than its key, the buckets and
    /// `busy_slots` disagree, or a task does not end after it starts.
    ///
    /// Each date is compared as a multiset. Identical tasks cannot be told
    /// apart, so a bucket and `busy_slots` may list them in different orders.
    pub fn into_drafts(self) -> Result<Vec<TaskDraft>, StorageError> {
        let mut buckets: BTreeMap<NaiveDate, Vec<TaskRecord>> = BTreeMap::new();
        for (key, records) in self.personal_calendar {
            let date: NaiveDate = key.parse().map_err(|_| {
                StorageError::Inconsistent(format!("bucket key '{key}' is not a YYYY-MM-DD date"))
            })?;
            if let Some(stray) = records.iter().find(|r| r.start.date() != date) {
                return Err(StorageError::Inconsistent(format!(
                    "task '{}' starting {} is filed under {key}",
                    stray.title, stray.start
                )));
            }
            if !records.is_empty() {
                buckets.insert(date, records);
            }
        }

        let records = if self.busy_slots.is_empty() && !buckets.is_empty() {
            warn!(
                dates = buckets.len(),
                "busy_slots missing; rebuilding task order from date buckets"
            );
            buckets.into_values().flatten().collect()
        } else {
            let mut regrouped = group_by_date(&self.busy_slots);
            regrouped.values_mut().for_each(|v| v.sort());
            buckets.values_mut().for_each(|v| v.sort());
            if regrouped != buckets {
                return Err(StorageError::Inconsistent(
                    "personal_calendar and busy_slots list different tasks".to_string(),
                ));
            }
            self.busy_slots
        };

        if let Some(bad) = records.iter().find(|r| r.start >= r.end) {
            return Err(StorageError::Inconsistent(format!(
                "task '{}' ends at {} before it starts at {}",
                bad.title, bad.end, bad.start
            )));
        }

        Ok(records.into_iter().map(TaskDraft::from).collect())
    }
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn group_by_date(records: &[TaskRecord]) -> BTreeMap<NaiveDate, Vec<TaskRecord>> {
    let mut grouped: BTreeMap<NaiveDate, Vec<TaskRecord>> = BTreeMap::new();
    for r in records {
        grouped.entry(r.start.date()).or_default().push(r.clone());
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
  "personal_calendar": {
    "2026-03-02": [
      {"start": "2026-03-02T13:00:00", "end": "2026-03-02T14:00:00", "title": "B"},
      {"start": "2026-03-02T10:00:00", "end": "2026-03-02T11:00:00", "title": "A"}
    ],
    "2026-03-03": [
      {"start": "2026-03-03T08:00:00", "end": "2026-03-03T09:30:00", "title": "晨跑"}
    ]
  },
  "busy_slots": [
    {"start": "2026-03-02T13:00:00", "end": "2026-03-02T14:00:00", "title": "B"},
    {"start": "2026-03-03T08:00:00", "end": "2026-03-03T09:30:00", "title": "晨跑"},
    {"start": "2026-03-02T10:00:00", "end": "2026-03-02T11:00:00", "title": "A"}
  ]
}"#;

    #[test]
    fn busy_slots_order_wins_on_import() {
        let drafts = CalendarDocument::from_json(SAMPLE)
            .unwrap()
            .into_drafts()
            .unwrap();
        let titles: Vec<&str> = drafts.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["B", "晨跑", "A"]);
    }

    #[test]
    fn missing_busy_slots_rebuilds_from_buckets() {
        let mut doc = CalendarDocument::from_json(SAMPLE).unwrap();
        doc.busy_slots.clear();
        let titles: Vec<String> = doc
            .into_drafts()
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["B", "A", "晨跑"]);
    }

    #[test]
    fn disagreeing_views_are_inconsistent() {
        let mut doc = CalendarDocument::from_json(SAMPLE).unwrap();
        doc.busy_slots.pop();
        assert!(matches!(
            doc.into_drafts(),
            Err(StorageError::Inconsistent(_))
        ));
    }

    #[test]
    fn duplicate_tasks_may_be_listed_in_either_order() {
        // X, Y, X added, then bucket index 2 deleted: the bucket keeps [X, Y]
        // while busy_slots lost its first X.
        let json = r#"{
            "personal_calendar": {
                "2026-03-02": [
                    {"start": "2026-03-02T10:00:00", "end": "2026-03-02T11:00:00", "title": "X"},
                    {"start": "2026-03-02T13:00:00", "end": "2026-03-02T14:00:00", "title": "Y"}
                ]
            },
            "busy_slots": [
                {"start": "2026-03-02T13:00:00", "end": "2026-03-02T14:00:00", "title": "Y"},
                {"start": "2026-03-02T10:00:00", "end": "2026-03-02T11:00:00", "title": "X"}
            ]
        }"#;
        let titles: Vec<String> = CalendarDocument::from_json(json)
            .unwrap()
            .into_drafts()
            .unwrap()
            .into_iter()
            .map(|d| d.title)
            .collect();
        assert_eq!(titles, vec!["Y", "X"]);
    }

    #[test]
    fn same_count_different_tasks_is_inconsistent() {
        let mut doc = CalendarDocument::from_json(SAMPLE).unwrap();
        doc.busy_slots[0].title = "renamed".to_string();
        assert!(matches!(
            doc.into_drafts(),
            Err(StorageError::Inconsistent(_))
        ));
    }

    #[test]
    fn task_filed_under_wrong_date_is_inconsistent() {
        let json = r#"{
            "personal_calendar": {
                "2026-03-05": [{"start": "2026-03-02T10:00:00", "end": "2026-03-02T11:00:00", "title": "A"}]
            },
            "busy_slots": [{"start": "2026-03-02T10:00:00", "end": "2026-03-02T11:00:00", "title": "A"}]
        }"#;
        let err = CalendarDocument::from_json(json)
            .unwrap()
            .into_drafts()
            .unwrap_err();
        assert!(err.to_string().contains("filed under 2026-03-05"));
    }

    #[test]
    fn bad_bucket_key_is_inconsistent() {
        let json = r#"{"personal_calendar": {"March 2nd": []}, "busy_slots": []}"#;
        let err = CalendarDocument::from_json(json)
            .unwrap()
            .into_drafts()
            .unwrap_err();
        assert!(err.to_string().contains("March 2nd"));
    }

    #[test]
    fn inverted_task_is_rejected() {
        let json = r#"{
            "personal_calendar": {},
            "busy_slots": [{"start": "2026-03-02T11:00:00", "end": "2026-03-02T10:00:00", "title": "A"}]
        }"#;
        let mut doc = CalendarDocument::from_json(json).unwrap();
        doc.personal_calendar.insert(
            "2026-03-02".to_string(),
            doc.busy_slots.clone(),
        );
        assert!(matches!(
            doc.into_drafts(),
            Err(StorageError::Inconsistent(_))
        ));
    }

    #[test]
    fn malformed_json_is_corrupt() {
        assert!(matches!(
            CalendarDocument::from_json("{ not json"),
            Err(StorageError::Corrupt(_))
        ));
    }

    #[test]
    fn empty_object_is_an_empty_document() {
        let doc = CalendarDocument::from_json("{}").unwrap();
        assert!(doc.is_empty());
        assert!(doc.into_drafts().unwrap().is_empty());
    }

    #[test]
    fn json_keeps_non_ascii_titles_verbatim() {
        let doc = CalendarDocument::from_json(SAMPLE).unwrap();
        let json = doc.to_json().unwrap();
        assert!(json.contains("晨跑"));
        assert!(json.contains("\n  \"personal_calendar\""));
    }
}
