//! Point-in-time copy of the shared restaurant state
//!
//! Taken inside a critical section and handed to the state log, so every
//! snapshot is a quiescent view: no role is halfway through an update.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::dining_table::{TableId, TableOccupancy};
use super::group::{GroupId, GroupState};
use super::role::RoleStatus;

/// 餐厅状态快照
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestaurantSnapshot {
    pub roles: RoleStatus,
    pub n_tables: usize,
    pub groups: Vec<GroupState>,
    pub assigned_table: Vec<Option<TableId>>,
    pub groups_waiting: usize,
}

impl RestaurantSnapshot {
    pub fn n_groups(&self) -> usize {
        self.groups.len()
    }

    /// Groups currently sitting at a table (seated or eating)
    pub fn seated_count(&self) -> usize {
        self.groups.iter().filter(|g| g.is_seated()).count()
    }

    /// Groups whose logical state is WAITING
    pub fn waiting_count(&self) -> usize {
        self.groups
            .iter()
            .filter(|g| **g == GroupState::Waiting)
            .count()
    }

    /// No table id appears twice in the assignment array
    pub fn is_assignment_injective(&self) -> bool {
        let mut seen = HashSet::new();
        self.assigned_table
            .iter()
            .flatten()
            .all(|table| seen.insert(*table))
    }

    pub fn table_of(&self, group: GroupId) -> Option<TableId> {
        self.assigned_table.get(group.index()).copied().flatten()
    }

    pub fn state_of(&self, group: GroupId) -> Option<GroupState> {
        self.groups.get(group.index()).copied()
    }

    /// Occupancy per table, derived from the assignment array
    pub fn table_occupancy(&self) -> Vec<TableOccupancy> {
        let mut tables = vec![TableOccupancy::Free; self.n_tables];
        for (index, table) in self.assigned_table.iter().enumerate() {
            if let Some(table) = table
                && let Some(slot) = tables.get_mut(table.index())
            {
                *slot = TableOccupancy::HeldBy(GroupId::new(index));
            }
        }
        tables
    }

    /// Checks every invariant a quiescent snapshot must satisfy
    pub fn check_invariants(&self) -> Result<(), String> {
        if !self.is_assignment_injective() {
            return Err(format!(
                "table assigned to more than one group: {:?}",
                self.assigned_table
            ));
        }
        if self.seated_count() > self.n_tables {
            return Err(format!(
                "{} groups seated at {} tables",
                self.seated_count(),
                self.n_tables
            ));
        }
        if self.groups_waiting != self.waiting_count() {
            return Err(format!(
                "groups_waiting = {} but {} groups are waiting",
                self.groups_waiting,
                self.waiting_count()
            ));
        }
        if let Some(table) = self
            .assigned_table
            .iter()
            .flatten()
            .find(|t| t.index() >= self.n_tables)
        {
            return Err(format!("assignment to unknown table {}", table));
        }
        Ok(())
    }
}
