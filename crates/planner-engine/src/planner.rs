//! The planner context: day window, gap policy, and task store in one value
//! constructed at startup and handed to every operation.

use chrono::NaiveDate;

use crate::availability::{compute_free_windows, GapPolicy};
use crate::error::Result;
use crate::model::{DayWindow, FreeInterval, Task, TaskDraft, TaskId};
use crate::storage::Storage;
use crate::store::{LoadOutcome, TaskStore};

/// One row of the calendar listing. `index` is the task's position in its
/// date bucket, the handle used by [`Planner::delete_task`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AgendaEntry {
    pub date: NaiveDate,
    pub index: usize,
    pub task: Task,
}

#[derive(Debug)]
pub struct Planner<S> {
    window: DayWindow,
    policy: GapPolicy,
    store: TaskStore<S>,
}

impl<S: Storage> Planner<S> {
    pub fn new(window: DayWindow, store: TaskStore<S>) -> Self {
        Self {
            window,
            policy: GapPolicy::default(),
            store,
        }
    }

    /// Construct a planner over `storage` and load whatever it holds.
    ///
    /// # Errors
    ///
    /// Corrupt or unreadable state is returned, never swallowed; the caller
    /// decides whether to continue with an empty calendar.
    pub fn open(window: DayWindow, storage: S) -> Result<(Self, LoadOutcome)> {
        let mut store = TaskStore::new(storage);
        let outcome = store.load_all()?;
        Ok((Self::new(window, store), outcome))
    }

    pub fn with_policy(mut self, policy: GapPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn window(&self) -> DayWindow {
        self.window
    }

    pub fn policy(&self) -> GapPolicy {
        self.policy
    }

    pub fn store(&self) -> &TaskStore<S> {
        &self.store
    }

    pub fn has_tasks(&self) -> bool {
        !self.store.is_empty()
    }

    pub fn has_date(&self, date: NaiveDate) -> bool {
        self.store.has_date(date)
    }

    pub fn add_task(&mut self, draft: TaskDraft) -> Result<TaskId> {
        self.store.add_task(draft)
    }

    pub fn delete_task(&mut self, date: NaiveDate, index: usize) -> Result<Option<Task>> {
        self.store.delete_task(date, index)
    }

    /// Tasks of each day in `[start, start + days)`, indexed per date bucket.
    pub fn agenda(&self, start: NaiveDate, days: u32) -> Vec<AgendaEntry> {
        start
            .iter_days()
            .take(days as usize)
            .flat_map(|date| {
                self.store
                    .tasks_on(date)
                    .enumerate()
                    .map(move |(index, task)| AgendaEntry {
                        date,
                        index,
                        task: task.clone(),
                    })
            })
            .collect()
    }

    /// Free windows over `[start, start + days)`.
    pub fn free_windows(&self, start: NaiveDate, days: u32) -> Vec<FreeInterval> {
        compute_free_windows(self.store.tasks(), self.window, start, days, self.policy)
    }
}
