//! # planner-engine
//!
//! A single user's personal task calendar and the free time it leaves.
//!
//! Tasks are time-blocked intervals kept in one insertion-ordered list and
//! persisted as a JSON document on every change. The availability engine
//! walks a horizon of days and reports the gaps the tasks leave inside the
//! configured wake/sleep envelope.
//!
//! ## Modules
//!
//! - [`model`] — `Task`, `TaskDraft`, `DayWindow`, `FreeInterval`
//! - [`availability`] — busy tasks + day window → free windows
//! - [`store`] — `TaskStore`: add, delete, load, save
//! - [`record`] — the persisted document layout
//! - [`storage`] — file and in-memory storage collaborators
//! - [`planner`] — `Planner`, the context object tying them together
//! - [`error`] — Error types

pub mod availability;
pub mod error;
pub mod model;
pub mod planner;
pub mod record;
pub mod storage;
pub mod store;

pub use availability::{compute_free_windows, GapPolicy, DEFAULT_HORIZON_DAYS};
pub use error::{EngineError, StorageError};
pub use model::{DayWindow, FreeInterval, Task, TaskDraft, TaskId};
pub use planner::{AgendaEntry, Planner};
pub use record::{CalendarDocument, TaskRecord};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use store::{LoadOutcome, TaskStore};
