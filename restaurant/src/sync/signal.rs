//! Counting rendezvous signal
//!
//! A thin wrapper over [`tokio::sync::Semaphore`] with System V style
//! `down`/`up` operations. Permits are never handed back: `down` consumes
//! one, `up` creates one, so an `up` that happens before the matching
//! `down` is remembered instead of lost.

use crate::core::error::SyncError;
use tokio::sync::Semaphore;

#[derive(Debug)]
pub struct Signal {
    name: String,
    sem: Semaphore,
}

impl Signal {
    pub fn new(name: impl Into<String>, initial: usize) -> Self {
        Self {
            name: name.into(),
            sem: Semaphore::new(initial),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Blocks until a permit is available and consumes it
    pub async fn down(&self) -> Result<(), SyncError> {
        let permit = self.sem.acquire().await.map_err(|_| SyncError::Closed {
            signal: self.name.clone(),
        })?;
        permit.forget();
        Ok(())
    }

    /// Adds one permit, waking a blocked `down` if there is one
    pub fn up(&self) -> Result<(), SyncError> {
        if self.sem.is_closed() {
            return Err(SyncError::Closed {
                signal: self.name.clone(),
            });
        }
        if self.sem.available_permits() >= Semaphore::MAX_PERMITS {
            return Err(SyncError::Overflow {
                signal: self.name.clone(),
            });
        }
        self.sem.add_permits(1);
        Ok(())
    }

    /// Accumulated permits not yet consumed
    pub fn value(&self) -> usize {
        self.sem.available_permits()
    }

    /// Fails every pending and future `down`/`up`
    pub fn close(&self) {
        self.sem.close();
    }

    pub fn is_closed(&self) -> bool {
        self.sem.is_closed()
    }
}
