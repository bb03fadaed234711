//! Storage collaborators for the calendar document.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::StorageError;
use crate::record::CalendarDocument;

/// Durable home of the calendar document.
///
/// Every save is a full rewrite of the document; there is no incremental
/// append and no partial-write recovery.
pub trait Storage {
    /// Read the persisted document. `Ok(None)` means there is no prior state.
    fn load(&self) -> Result<Option<CalendarDocument>, StorageError>;

    /// Replace the persisted document.
    fn save(&mut self, doc: &CalendarDocument) -> Result<(), StorageError>;
}

/// Stores the document as pretty-printed JSON in a single file.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<CalendarDocument>, StorageError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no calendar file yet");
                return Ok(None);
            }
            Err(e) => return Err(self.io_error(e)),
        };

        let doc = CalendarDocument::from_json(&text)?;
        debug!(
            path = %self.path.display(),
            tasks = doc.busy_slots.len(),
            "read calendar file"
        );
        Ok(Some(doc))
    }

    fn save(&mut self, doc: &CalendarDocument) -> Result<(), StorageError> {
        let json = doc.to_json()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;
        debug!(
            path = %self.path.display(),
            tasks = doc.busy_slots.len(),
            "wrote calendar file"
        );
        Ok(())
    }
}

/// Keeps the document in memory. Counts writes so callers can observe
/// write-through behaviour.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    doc: Option<CalendarDocument>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing document, as if it had been persisted earlier.
    pub fn with_document(doc: CalendarDocument) -> Self {
        Self {
            doc: Some(doc),
            saves: 0,
        }
    }

    pub fn document(&self) -> Option<&CalendarDocument> {
        self.doc.as_ref()
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<CalendarDocument>, StorageError> {
        Ok(self.doc.clone())
    }

    fn save(&mut self, doc: &CalendarDocument) -> Result<(), StorageError> {
        self.doc = Some(doc.clone());
        self.saves += 1;
        Ok(())
    }
}
