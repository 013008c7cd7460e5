//! Dining Table Model

use serde::{Deserialize, Serialize};
use std::fmt;

use super::group::GroupId;

/// Number of tables in the dining room (桌台数量)
pub const TABLE_COUNT: usize = 2;

/// Dining table identifier (0..TABLE_COUNT-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(usize);

impl TableId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 桌台占用状态
///
/// Derived from the per-group assignment array; a table never has an owner
/// of its own in the shared state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TableOccupancy {
    #[default]
    Free,
    HeldBy(GroupId),
}

impl TableOccupancy {
    pub fn holder(&self) -> Option<GroupId> {
        match self {
            TableOccupancy::Free => None,
            TableOccupancy::HeldBy(group) => Some(*group),
        }
    }
}
