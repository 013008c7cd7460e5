//! Restaurant instance: shared state + mutex + signal set

use shared::RestaurantSnapshot;
use tokio::sync::{Mutex, MutexGuard};

use super::shared_state::{Layout, RestaurantState};
use crate::core::error::ConfigError;
use crate::sync::SemaphoreSet;

/// 餐厅实例
///
/// Roles never hold the state directly: [`Restaurant::lock`] is the only way
/// in, and the guard must be dropped before waiting on any [`Signal`].
///
/// [`Signal`]: crate::sync::Signal
#[derive(Debug)]
pub struct Restaurant {
    key: u32,
    layout: Layout,
    state: Mutex<RestaurantState>,
    signals: SemaphoreSet,
}

impl Restaurant {
    pub fn new(key: u32, layout: Layout) -> Result<Self, ConfigError> {
        layout.validate()?;
        Ok(Self {
            key,
            layout,
            state: Mutex::new(RestaurantState::new(layout)),
            signals: SemaphoreSet::new(layout.n_groups, layout.n_tables),
        })
    }

    pub fn key(&self) -> u32 {
        self.key
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn n_groups(&self) -> usize {
        self.layout.n_groups
    }

    pub fn signals(&self) -> &SemaphoreSet {
        &self.signals
    }

    /// Enters the critical section
    pub async fn lock(&self) -> MutexGuard<'_, RestaurantState> {
        self.state.lock().await
    }

    pub async fn snapshot(&self) -> RestaurantSnapshot {
        self.state.lock().await.snapshot()
    }

    /// Tears down the signal set; every blocked role fails with `Closed`
    pub fn destroy(&self) {
        self.signals.destroy();
    }
}
