//! State log destinations

use parking_lot::Mutex;
use shared::RestaurantSnapshot;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use super::format::TraceFormat;
use crate::core::error::TraceError;

/// Where snapshots go after every state transition
pub trait TraceSink: Send + Sync {
    fn append(&self, snapshot: &RestaurantSnapshot) -> Result<(), TraceError>;
}

/// Append-only state log file shared by all roles
pub struct FileSink {
    format: TraceFormat,
    file: Mutex<File>,
}

impl FileSink {
    /// Truncates the file and writes the column header
    ///
    /// The returned sink appends like every other writer of the same file.
    pub fn create(
        path: &Path,
        format: TraceFormat,
        n_groups: usize,
        n_tables: usize,
    ) -> Result<Self, TraceError> {
        let mut file = File::create(path).map_err(|source| TraceError::Open {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(header) = format.header(n_groups, n_tables) {
            file.write_all(header.as_bytes())?;
        }
        drop(file);
        Self::open(path, format)
    }

    /// Opens an existing (or new) log for appending
    pub fn open(path: &Path, format: TraceFormat) -> Result<Self, TraceError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|source| TraceError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        Ok(Self {
            format,
            file: Mutex::new(file),
        })
    }
}

impl TraceSink for FileSink {
    fn append(&self, snapshot: &RestaurantSnapshot) -> Result<(), TraceError> {
        let line = self.format.line(snapshot)?;
        let mut file = self.file.lock();
        file.write_all(line.as_bytes())?;
        file.flush()?;
        Ok(())
    }
}

/// In-memory log, used by tests to check invariants on every snapshot
#[derive(Clone, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<RestaurantSnapshot>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<RestaurantSnapshot> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

impl TraceSink for MemorySink {
    fn append(&self, snapshot: &RestaurantSnapshot) -> Result<(), TraceError> {
        self.entries.lock().push(snapshot.clone());
        Ok(())
    }
}
