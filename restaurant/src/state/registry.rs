//! 实例注册表
//!
//! Maps an access key to a live restaurant, the in-process counterpart of
//! attaching to a shared memory segment and a semaphore set by key.

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::{Arc, LazyLock};

use super::restaurant::Restaurant;
use super::shared_state::Layout;
use crate::core::error::ConfigError;

static GLOBAL: LazyLock<Registry> = LazyLock::new(Registry::new);

/// Cheap to clone; clones share the same key space
#[derive(Debug, Clone, Default)]
pub struct Registry {
    segments: Arc<DashMap<u32, Arc<Restaurant>>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry used by the binary
    pub fn global() -> Registry {
        GLOBAL.clone()
    }

    /// Creates the shared state and signal set under `key`
    pub fn create(&self, key: u32, layout: Layout) -> Result<Arc<Restaurant>, ConfigError> {
        match self.segments.entry(key) {
            Entry::Occupied(_) => Err(ConfigError::KeyInUse(key)),
            Entry::Vacant(slot) => {
                let restaurant = Arc::new(Restaurant::new(key, layout)?);
                slot.insert(restaurant.clone());
                tracing::debug!(
                    key = %format_args!("{key:#x}"),
                    n_groups = layout.n_groups,
                    n_tables = layout.n_tables,
                    "Restaurant created"
                );
                Ok(restaurant)
            }
        }
    }

    /// Attaches to an existing restaurant
    pub fn connect(&self, key: u32) -> Result<Arc<Restaurant>, ConfigError> {
        self.segments
            .get(&key)
            .map(|r| r.value().clone())
            .ok_or(ConfigError::Unreachable(key))
    }

    /// Unregisters the restaurant and destroys its signal set
    pub fn destroy(&self, key: u32) -> Option<Arc<Restaurant>> {
        let (_, restaurant) = self.segments.remove(&key)?;
        restaurant.destroy();
        Some(restaurant)
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
