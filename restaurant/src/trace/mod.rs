//! 状态日志
//!
//! Every role calls [`StateLog::save`] from inside its critical section
//! after changing the shared state, so the log is a totally ordered
//! sequence of quiescent snapshots.

pub mod format;
pub mod sink;

use std::path::Path;
use std::sync::Arc;

pub use format::TraceFormat;
pub use sink::{FileSink, MemorySink, TraceSink};

use crate::core::error::TraceError;
use crate::state::RestaurantState;

#[derive(Clone)]
pub struct StateLog {
    sink: Arc<dyn TraceSink>,
}

impl StateLog {
    pub fn new(sink: Arc<dyn TraceSink>) -> Self {
        Self { sink }
    }

    /// Setup step: fresh log file with its header
    pub fn create(
        path: &Path,
        format: TraceFormat,
        n_groups: usize,
        n_tables: usize,
    ) -> Result<Self, TraceError> {
        Ok(Self::new(Arc::new(FileSink::create(
            path, format, n_groups, n_tables,
        )?)))
    }

    /// Role attach: append to the log created by the setup step
    pub fn open(path: &Path, format: TraceFormat) -> Result<Self, TraceError> {
        Ok(Self::new(Arc::new(FileSink::open(path, format)?)))
    }

    pub fn memory(sink: &MemorySink) -> Self {
        Self::new(Arc::new(sink.clone()))
    }

    pub fn save(&self, state: &RestaurantState) -> Result<(), TraceError> {
        let snapshot = state.snapshot();
        tracing::trace!(
            chef = %snapshot.roles.chef,
            waiter = %snapshot.roles.waiter,
            receptionist = %snapshot.roles.receptionist,
            groups_waiting = snapshot.groups_waiting,
            "State saved"
        );
        self.sink.append(&snapshot)
    }
}
