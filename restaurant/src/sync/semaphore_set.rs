//! 信号量集合
//!
//! All rendezvous signals of one restaurant instance. Request channels come
//! in pairs (request + slot available). "Proceed to table" exists once per
//! group and the table-scoped signals once per table, so a post only wakes
//! the group it is meant for.

use shared::{GroupId, TableId};

use super::signal::Signal;
use crate::core::error::ProtocolError;

#[derive(Debug)]
pub struct SemaphoreSet {
    /// Group → receptionist: a request sits in the receptionist slot
    pub receptionist_request: Signal,
    /// Receptionist → groups: the receptionist slot may be written (initially 1)
    pub receptionist_request_possible: Signal,
    /// Group/chef → waiter: a request sits in the waiter slot
    pub waiter_request: Signal,
    /// Waiter → groups/chef: the waiter slot may be written (initially 1)
    pub waiter_request_possible: Signal,
    /// Waiter → chef: an order sits in the chef slot
    pub wait_order: Signal,
    /// Chef → waiter: the order was taken from the chef slot
    pub order_received: Signal,
    /// Receptionist → group: proceed to the assigned table (one per group)
    wait_for_table: Vec<Signal>,
    /// Waiter → group: food is on the table (one per table)
    food_arrived: Vec<Signal>,
    /// Receptionist → group: payment taken, table vacated (one per table)
    table_done: Vec<Signal>,
}

impl SemaphoreSet {
    pub fn new(n_groups: usize, n_tables: usize) -> Self {
        Self {
            receptionist_request: Signal::new("receptionist_request", 0),
            receptionist_request_possible: Signal::new("receptionist_request_possible", 1),
            waiter_request: Signal::new("waiter_request", 0),
            waiter_request_possible: Signal::new("waiter_request_possible", 1),
            wait_order: Signal::new("wait_order", 0),
            order_received: Signal::new("order_received", 0),
            wait_for_table: (0..n_groups)
                .map(|g| Signal::new(format!("wait_for_table[{g}]"), 0))
                .collect(),
            food_arrived: (0..n_tables)
                .map(|t| Signal::new(format!("food_arrived[{t}]"), 0))
                .collect(),
            table_done: (0..n_tables)
                .map(|t| Signal::new(format!("table_done[{t}]"), 0))
                .collect(),
        }
    }

    pub fn wait_for_table(&self, group: GroupId) -> Result<&Signal, ProtocolError> {
        self.wait_for_table
            .get(group.index())
            .ok_or(ProtocolError::UnknownGroup(group))
    }

    pub fn food_arrived(&self, table: TableId) -> Result<&Signal, ProtocolError> {
        self.food_arrived
            .get(table.index())
            .ok_or(ProtocolError::UnknownTable(table))
    }

    pub fn table_done(&self, table: TableId) -> Result<&Signal, ProtocolError> {
        self.table_done
            .get(table.index())
            .ok_or(ProtocolError::UnknownTable(table))
    }

    fn all(&self) -> impl Iterator<Item = &Signal> {
        [
            &self.receptionist_request,
            &self.receptionist_request_possible,
            &self.waiter_request,
            &self.waiter_request_possible,
            &self.wait_order,
            &self.order_received,
        ]
        .into_iter()
        .chain(self.wait_for_table.iter())
        .chain(self.food_arrived.iter())
        .chain(self.table_done.iter())
    }

    /// Closes every signal; blocked roles wake up with `SyncError::Closed`
    pub fn destroy(&self) {
        for signal in self.all() {
            signal.close();
        }
        tracing::debug!("Semaphore set destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.receptionist_request.is_closed()
    }
}
