//! 共享餐厅状态
//!
//! The one structure every role reads and mutates. It only ever lives
//! behind the mutex in [`super::Restaurant`]; nothing in here blocks.

use shared::{
    GroupId, GroupState, MAX_GROUPS, Request, RestaurantSnapshot, RoleStatus, TABLE_COUNT, TableId,
};

use crate::core::error::{ConfigError, ProtocolError};

/// Sizes fixed at setup time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub n_groups: usize,
    pub n_tables: usize,
}

impl Layout {
    pub fn new(n_groups: usize) -> Self {
        Self {
            n_groups,
            n_tables: TABLE_COUNT,
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.n_groups == 0 || self.n_groups > MAX_GROUPS {
            return Err(ConfigError::InvalidGroupCount {
                count: self.n_groups,
                max: MAX_GROUPS,
            });
        }
        if self.n_tables == 0 || self.n_tables > TABLE_COUNT {
            return Err(ConfigError::InvalidTableCount {
                count: self.n_tables,
                max: TABLE_COUNT,
            });
        }
        Ok(())
    }
}

/// One single-slot request channel
#[derive(Debug, Default)]
struct Slot {
    pending: Option<Request>,
}

impl Slot {
    fn put(&mut self, channel: &'static str, request: Request) -> Result<(), ProtocolError> {
        if let Some(pending) = self.pending {
            return Err(ProtocolError::SlotOccupied { channel, pending });
        }
        self.pending = Some(request);
        Ok(())
    }

    fn take(&mut self, channel: &'static str) -> Result<Request, ProtocolError> {
        self.pending.take().ok_or(ProtocolError::EmptySlot { channel })
    }
}

#[derive(Debug)]
pub struct RestaurantState {
    n_tables: usize,
    assigned_table: Vec<Option<TableId>>,
    group_state: Vec<GroupState>,
    groups_waiting: usize,
    /// Role activity, for the state log only
    pub status: RoleStatus,
    receptionist_slot: Slot,
    waiter_slot: Slot,
    chef_slot: Slot,
}

impl RestaurantState {
    pub fn new(layout: Layout) -> Self {
        Self {
            n_tables: layout.n_tables,
            assigned_table: vec![None; layout.n_groups],
            group_state: vec![GroupState::Arriving; layout.n_groups],
            groups_waiting: 0,
            status: RoleStatus::default(),
            receptionist_slot: Slot::default(),
            waiter_slot: Slot::default(),
            chef_slot: Slot::default(),
        }
    }

    pub fn n_groups(&self) -> usize {
        self.group_state.len()
    }

    pub fn n_tables(&self) -> usize {
        self.n_tables
    }

    fn group_index(&self, group: GroupId) -> Result<usize, ProtocolError> {
        if group.index() < self.group_state.len() {
            Ok(group.index())
        } else {
            Err(ProtocolError::UnknownGroup(group))
        }
    }

    fn check_table(&self, table: TableId) -> Result<(), ProtocolError> {
        if table.index() < self.n_tables {
            Ok(())
        } else {
            Err(ProtocolError::UnknownTable(table))
        }
    }

    // ========== Groups ==========

    pub fn group_state(&self, group: GroupId) -> Result<GroupState, ProtocolError> {
        Ok(self.group_state[self.group_index(group)?])
    }

    pub fn set_group_state(&mut self, group: GroupId, state: GroupState) -> Result<(), ProtocolError> {
        let index = self.group_index(group)?;
        self.group_state[index] = state;
        Ok(())
    }

    pub fn groups_waiting(&self) -> usize {
        self.groups_waiting
    }

    /// Moves a group into the waiting room
    pub fn enqueue_waiting(&mut self, group: GroupId) -> Result<(), ProtocolError> {
        self.set_group_state(group, GroupState::Waiting)?;
        self.groups_waiting += 1;
        Ok(())
    }

    /// Takes a group out of the waiting room and seats it at `table`
    pub fn promote_waiting(&mut self, group: GroupId, table: TableId) -> Result<(), ProtocolError> {
        if self.group_state(group)? != GroupState::Waiting {
            return Err(ProtocolError::NotWaiting(group));
        }
        let remaining = self
            .groups_waiting
            .checked_sub(1)
            .ok_or_else(|| {
                ProtocolError::Inconsistent(format!(
                    "group {group} waiting but the waiting counter is 0"
                ))
            })?;
        self.assign_table(group, table)?;
        self.set_group_state(group, GroupState::Seated)?;
        self.groups_waiting = remaining;
        Ok(())
    }

    // ========== Tables ==========

    pub fn assigned_table(&self, group: GroupId) -> Result<Option<TableId>, ProtocolError> {
        Ok(self.assigned_table[self.group_index(group)?])
    }

    /// The table a group must be sitting at
    pub fn table_of(&self, group: GroupId) -> Result<TableId, ProtocolError> {
        self.assigned_table(group)?
            .ok_or(ProtocolError::NoTableAssigned(group))
    }

    pub fn table_holder(&self, table: TableId) -> Result<Option<GroupId>, ProtocolError> {
        self.check_table(table)?;
        Ok(self
            .assigned_table
            .iter()
            .position(|t| *t == Some(table))
            .map(GroupId::new))
    }

    /// Free tables in ascending id order
    pub fn free_tables(&self) -> impl Iterator<Item = TableId> + '_ {
        (0..self.n_tables)
            .map(TableId::new)
            .filter(|t| !self.assigned_table.contains(&Some(*t)))
    }

    pub fn assign_table(&mut self, group: GroupId, table: TableId) -> Result<(), ProtocolError> {
        let index = self.group_index(group)?;
        self.check_table(table)?;
        if let Some(holder) = self.table_holder(table)? {
            return Err(ProtocolError::TableOccupied { table, holder });
        }
        self.assigned_table[index] = Some(table);
        Ok(())
    }

    /// Clears the assignment of a group and returns the table it held
    pub fn release_table(&mut self, group: GroupId) -> Result<TableId, ProtocolError> {
        let index = self.group_index(group)?;
        self.assigned_table[index]
            .take()
            .ok_or(ProtocolError::NoTableAssigned(group))
    }

    // ========== Request slots ==========

    pub fn post_receptionist_request(&mut self, request: Request) -> Result<(), ProtocolError> {
        self.group_index(request.group)?;
        self.receptionist_slot.put("receptionist", request)
    }

    pub fn take_receptionist_request(&mut self) -> Result<Request, ProtocolError> {
        self.receptionist_slot.take("receptionist")
    }

    pub fn post_waiter_request(&mut self, request: Request) -> Result<(), ProtocolError> {
        self.group_index(request.group)?;
        self.waiter_slot.put("waiter", request)
    }

    pub fn take_waiter_request(&mut self) -> Result<Request, ProtocolError> {
        self.waiter_slot.take("waiter")
    }

    pub fn post_chef_request(&mut self, request: Request) -> Result<(), ProtocolError> {
        self.group_index(request.group)?;
        self.chef_slot.put("chef", request)
    }

    pub fn take_chef_request(&mut self) -> Result<Request, ProtocolError> {
        self.chef_slot.take("chef")
    }

    pub fn snapshot(&self) -> RestaurantSnapshot {
        RestaurantSnapshot {
            roles: self.status,
            n_tables: self.n_tables,
            groups: self.group_state.clone(),
            assigned_table: self.assigned_table.clone(),
            groups_waiting: self.groups_waiting,
        }
    }
}
