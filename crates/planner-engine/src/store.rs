//! TaskStore — the single authoritative task list with write-through persistence.
//!
//! Tasks are kept in one insertion-ordered `Vec`. The per-date grouping and
//! the flat "all tasks" view are both derived from it, so they cannot drift
//! apart. Every mutation rewrites the whole document through the storage
//! collaborator before returning.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::error::Result;
use crate::model::{Task, TaskDraft, TaskId};
use crate::record::CalendarDocument;
use crate::storage::Storage;

/// What [`TaskStore::load_all`] found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing was persisted yet; the store is unchanged.
    NoPriorState,
    /// The store was replaced by the persisted tasks.
    Restored { tasks: usize },
}

#[derive(Debug)]
pub struct TaskStore<S> {
    storage: S,
    tasks: Vec<Task>,
    next_id: u64,
}

impl<S: Storage> TaskStore<S> {
    /// An empty store backed by `storage`. Nothing is read until [`load_all`](Self::load_all).
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            tasks: Vec::new(),
            next_id: 1,
        }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// All tasks across all dates, in insertion order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// The bucket for `date`: tasks starting on it, in insertion order.
    pub fn tasks_on(&self, date: NaiveDate) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(move |t| t.date() == date)
    }

    pub fn task_at(&self, date: NaiveDate, index: usize) -> Option<&Task> {
        self.tasks_on(date).nth(index)
    }

    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.tasks_on(date).next().is_some()
    }

    /// Dates that have at least one task, ascending.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.tasks
            .iter()
            .map(Task::date)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Validate and append a task, then persist the whole store.
    ///
    /// Overlapping tasks are accepted as-is.
    ///
    /// # Errors
    ///
    /// [`EngineError::InvalidRange`](crate::EngineError::InvalidRange) when the
    /// draft does not end after it starts (nothing is stored). A storage error
    /// after the task was appended leaves it in memory and reports the failure.
    pub fn add_task(&mut self, draft: TaskDraft) -> Result<TaskId> {
        draft.validate()?;
        let id = self.push(draft);
        debug!(%id, "added task");
        self.save_all()?;
        Ok(id)
    }

    /// Delete the `index`-th task of `date`'s bucket.
    ///
    /// Returns `Ok(None)` without touching storage when the date has no tasks
    /// or the index is out of range.
    pub fn delete_task(&mut self, date: NaiveDate, index: usize) -> Result<Option<Task>> {
        let position = self
            .tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.date() == date)
            .nth(index)
            .map(|(pos, _)| pos);

        match position {
            Some(pos) => self.remove_at(pos).map(Some),
            None => Ok(None),
        }
    }

    /// Delete a task by identifier. `Ok(None)` if no such task exists.
    pub fn delete_by_id(&mut self, id: TaskId) -> Result<Option<Task>> {
        match self.tasks.iter().position(|t| t.id == id) {
            Some(pos) => self.remove_at(pos).map(Some),
            None => Ok(None),
        }
    }

    /// Replace the in-memory tasks with the persisted ones.
    ///
    /// On any error the store keeps whatever it held before the call.
    pub fn load_all(&mut self) -> Result<LoadOutcome> {
        let Some(doc) = self.storage.load()? else {
            return Ok(LoadOutcome::NoPriorState);
        };

        let drafts = doc.into_drafts()?;
        self.tasks.clear();
        for draft in drafts {
            self.push(draft);
        }

        debug!(tasks = self.tasks.len(), "restored calendar");
        Ok(LoadOutcome::Restored {
            tasks: self.tasks.len(),
        })
    }

    /// Rewrite the persisted document from the current tasks.
    pub fn save_all(&mut self) -> Result<()> {
        let doc = CalendarDocument::from_tasks(&self.tasks);
        if let Err(e) = self.storage.save(&doc) {
            warn!(error = %e, "failed to persist calendar");
            return Err(e.into());
        }
        Ok(())
    }

    fn push(&mut self, draft: TaskDraft) -> TaskId {
        let id = TaskId(self.next_id);
        self.next_id += 1;
        self.tasks.push(Task {
            id,
            start: draft.start,
            end: draft.end,
            title: draft.title,
        });
        id
    }

    fn remove_at(&mut self, pos: usize) -> Result<Task> {
        let removed = self.tasks.remove(pos);
        debug!(id = %removed.id, "deleted task");
        self.save_all()?;
        Ok(removed)
    }
}
