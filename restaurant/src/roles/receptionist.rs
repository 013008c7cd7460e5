//! 前台接待
//!
//! Owns the table-assignment policy and the waiting room. The only role
//! that writes table assignments and the only one that posts the
//! "proceed to table" and "table vacated" signals.

use shared::{GroupId, GroupState, ReceptionistStatus, Request, RequestKind, TableId};
use std::sync::Arc;

use crate::core::error::{ProtocolError, RestaurantResult};
use crate::state::{Restaurant, RestaurantState};
use crate::trace::StateLog;

/// Receptionist's private view of each group
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupRecord {
    /// Has not asked for a table yet
    ToArrive,
    /// In the waiting room
    Wait,
    /// Holds a table
    AtTable,
    /// Paid and left
    Done,
}

pub struct Receptionist {
    restaurant: Arc<Restaurant>,
    log: StateLog,
    group_record: Vec<GroupRecord>,
}

impl Receptionist {
    pub fn new(restaurant: Arc<Restaurant>, log: StateLog) -> Self {
        let group_record = vec![GroupRecord::ToArrive; restaurant.n_groups()];
        Self {
            restaurant,
            log,
            group_record,
        }
    }

    pub fn records(&self) -> &[GroupRecord] {
        &self.group_record
    }

    /// Serves exactly two requests per group (table + bill), then returns
    pub async fn run(mut self) -> RestaurantResult<usize> {
        let total = 2 * self.restaurant.n_groups();
        tracing::info!(requests = total, "Receptionist started");

        let mut handled = 0;
        while handled < total {
            let request = self.wait_for_group().await?;
            match request.kind {
                RequestKind::TableReq => self.provide_table_or_waiting_room(request.group).await?,
                RequestKind::BillReq => self.receive_payment(request.group).await?,
                _ => {
                    return Err(ProtocolError::UnexpectedRequest {
                        role: "receptionist",
                        request,
                    }
                    .into());
                }
            }
            handled += 1;
        }

        tracing::info!(handled, "Receptionist finished");
        Ok(handled)
    }

    /// Blocks until a group posts a request, then frees the slot
    pub async fn wait_for_group(&mut self) -> RestaurantResult<Request> {
        let signals = self.restaurant.signals();
        {
            let mut state = self.restaurant.lock().await;
            state.status.receptionist = ReceptionistStatus::WaitForRequest;
            self.log.save(&state)?;
        }

        signals.receptionist_request.down().await?;

        let request = {
            let mut state = self.restaurant.lock().await;
            state.take_receptionist_request()?
        };
        signals.receptionist_request_possible.up()?;

        tracing::debug!(%request, "Receptionist received request");
        Ok(request)
    }

    /// First-fit by ascending table id; `None` means the group must wait
    pub fn decide_table_or_wait(state: &RestaurantState, group: GroupId) -> Option<TableId> {
        let table = state.free_tables().next();
        tracing::trace!(%group, table = ?table, "Table decision");
        table
    }

    /// Lowest-id group in the waiting room
    fn decide_next_group(&self) -> Option<GroupId> {
        self.group_record
            .iter()
            .position(|r| *r == GroupRecord::Wait)
            .map(GroupId::new)
    }

    fn record_index(&self, group: GroupId) -> Result<usize, ProtocolError> {
        if group.index() < self.group_record.len() {
            Ok(group.index())
        } else {
            Err(ProtocolError::UnknownGroup(group))
        }
    }

    /// Seats the group at a free table or sends it to the waiting room
    pub async fn provide_table_or_waiting_room(&mut self, group: GroupId) -> RestaurantResult<()> {
        let index = self.record_index(group)?;

        let seated = {
            let mut state = self.restaurant.lock().await;
            state.status.receptionist = ReceptionistStatus::AssignTable;

            let seated = if self.group_record[index] == GroupRecord::ToArrive {
                match Self::decide_table_or_wait(&state, group) {
                    Some(table) => {
                        state.assign_table(group, table)?;
                        state.set_group_state(group, GroupState::Seated)?;
                        self.group_record[index] = GroupRecord::AtTable;
                        Some(table)
                    }
                    None => {
                        state.enqueue_waiting(group)?;
                        self.group_record[index] = GroupRecord::Wait;
                        None
                    }
                }
            } else {
                tracing::warn!(
                    %group,
                    record = ?self.group_record[index],
                    "Table request from a group that already checked in"
                );
                None
            };

            self.log.save(&state)?;
            seated
        };

        match seated {
            Some(table) => {
                self.restaurant.signals().wait_for_table(group)?.up()?;
                tracing::info!(%group, %table, "Group seated");
            }
            None if self.group_record[index] == GroupRecord::Wait => {
                tracing::info!(%group, "Group sent to the waiting room");
            }
            None => {}
        }
        Ok(())
    }

    /// Frees the payer's table and promotes the next waiting group onto it
    pub async fn receive_payment(&mut self, group: GroupId) -> RestaurantResult<()> {
        let index = self.record_index(group)?;

        let (vacated, promoted) = {
            let mut state = self.restaurant.lock().await;
            state.status.receptionist = ReceptionistStatus::ReceivePayment;

            let vacated = state.release_table(group)?;
            state.set_group_state(group, GroupState::Done)?;
            self.group_record[index] = GroupRecord::Done;
            self.log.save(&state)?;

            let mut promoted = None;
            if state.groups_waiting() > 0 {
                state.status.receptionist = ReceptionistStatus::AssignTable;
                if let Some(next) = self.decide_next_group() {
                    state.promote_waiting(next, vacated)?;
                    self.group_record[next.index()] = GroupRecord::AtTable;
                    promoted = Some(next);
                }
                self.log.save(&state)?;
            }
            (vacated, promoted)
        };

        let signals = self.restaurant.signals();
        signals.table_done(vacated)?.up()?;
        tracing::info!(%group, table = %vacated, "Payment received, table vacated");

        if let Some(next) = promoted {
            signals.wait_for_table(next)?.up()?;
            tracing::info!(group = %next, table = %vacated, "Waiting group promoted");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Layout;
    use crate::trace::MemorySink;

    fn setup(n_groups: usize) -> (Arc<Restaurant>, Receptionist, MemorySink) {
        let restaurant = Arc::new(Restaurant::new(1, Layout::new(n_groups)).unwrap());
        let sink = MemorySink::new();
        let receptionist = Receptionist::new(restaurant.clone(), StateLog::memory(&sink));
        (restaurant, receptionist, sink)
    }

    #[tokio::test]
    async fn test_first_fit_ascending() {
        let (restaurant, mut receptionist, _) = setup(2);
        receptionist
            .provide_table_or_waiting_room(GroupId::new(1))
            .await
            .unwrap();
        receptionist
            .provide_table_or_waiting_room(GroupId::new(0))
            .await
            .unwrap();

        let snapshot = restaurant.snapshot().await;
        assert_eq!(snapshot.table_of(GroupId::new(1)), Some(TableId::new(0)));
        assert_eq!(snapshot.table_of(GroupId::new(0)), Some(TableId::new(1)));
        assert_eq!(
            restaurant
                .signals()
                .wait_for_table(GroupId::new(1))
                .unwrap()
                .value(),
            1
        );
    }

    #[tokio::test]
    async fn test_three_groups_two_tables() {
        let (restaurant, mut receptionist, sink) = setup(3);
        for g in 0..3 {
            receptionist
                .provide_table_or_waiting_room(GroupId::new(g))
                .await
                .unwrap();
        }

        let snapshot = restaurant.snapshot().await;
        assert_eq!(snapshot.table_of(GroupId::new(0)), Some(TableId::new(0)));
        assert_eq!(snapshot.table_of(GroupId::new(1)), Some(TableId::new(1)));
        assert_eq!(snapshot.table_of(GroupId::new(2)), None);
        assert_eq!(snapshot.state_of(GroupId::new(2)), Some(GroupState::Waiting));
        assert_eq!(snapshot.groups_waiting, 1);
        assert_eq!(receptionist.records()[2], GroupRecord::Wait);
        let signals = restaurant.signals();
        assert_eq!(signals.wait_for_table(GroupId::new(2)).unwrap().value(), 0);

        receptionist.receive_payment(GroupId::new(0)).await.unwrap();

        let snapshot = restaurant.snapshot().await;
        assert_eq!(snapshot.table_of(GroupId::new(0)), None);
        assert_eq!(snapshot.state_of(GroupId::new(0)), Some(GroupState::Done));
        assert_eq!(snapshot.table_of(GroupId::new(2)), Some(TableId::new(0)));
        assert_eq!(snapshot.state_of(GroupId::new(2)), Some(GroupState::Seated));
        assert_eq!(snapshot.groups_waiting, 0);
        assert_eq!(receptionist.records()[0], GroupRecord::Done);
        assert_eq!(receptionist.records()[2], GroupRecord::AtTable);
        assert_eq!(signals.table_done(TableId::new(0)).unwrap().value(), 1);
        assert_eq!(signals.wait_for_table(GroupId::new(2)).unwrap().value(), 1);

        for entry in sink.entries() {
            entry.check_invariants().unwrap();
        }
    }

    #[tokio::test]
    async fn test_promotion_picks_lowest_waiting_id() {
        let (restaurant, mut receptionist, _) = setup(5);
        // 0 and 1 take the tables, then 4 and 2 queue up in that order
        for g in [0, 1, 4, 2] {
            receptionist
                .provide_table_or_waiting_room(GroupId::new(g))
                .await
                .unwrap();
        }
        assert_eq!(restaurant.snapshot().await.groups_waiting, 2);

        receptionist.receive_payment(GroupId::new(1)).await.unwrap();

        let snapshot = restaurant.snapshot().await;
        assert_eq!(snapshot.table_of(GroupId::new(2)), Some(TableId::new(1)));
        assert_eq!(snapshot.state_of(GroupId::new(4)), Some(GroupState::Waiting));
        assert_eq!(snapshot.groups_waiting, 1);
    }

    #[tokio::test]
    async fn test_payment_without_table_is_rejected() {
        let (restaurant, mut receptionist, _) = setup(2);
        let err = receptionist
            .receive_payment(GroupId::new(1))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            crate::core::error::RestaurantError::Protocol(ProtocolError::NoTableAssigned(_))
        ));
        let signals = restaurant.signals();
        assert_eq!(signals.table_done(TableId::new(0)).unwrap().value(), 0);
        assert_eq!(signals.table_done(TableId::new(1)).unwrap().value(), 0);
    }

    #[tokio::test]
    async fn test_repeated_table_request_is_ignored() {
        let (restaurant, mut receptionist, _) = setup(2);
        let group = GroupId::new(0);
        receptionist.provide_table_or_waiting_room(group).await.unwrap();
        receptionist.provide_table_or_waiting_room(group).await.unwrap();

        let snapshot = restaurant.snapshot().await;
        assert_eq!(snapshot.table_of(group), Some(TableId::new(0)));
        assert_eq!(snapshot.table_occupancy()[1].holder(), None);
        assert_eq!(restaurant.signals().wait_for_table(group).unwrap().value(), 1);
    }

    #[tokio::test]
    async fn test_wait_for_group_takes_slot_and_reopens_it() {
        let (restaurant, mut receptionist, _) = setup(1);
        let signals = restaurant.signals();

        signals.receptionist_request_possible.down().await.unwrap();
        restaurant
            .lock()
            .await
            .post_receptionist_request(Request::table(GroupId::new(0)))
            .unwrap();
        signals.receptionist_request.up().unwrap();

        let request = receptionist.wait_for_group().await.unwrap();
        assert_eq!(request, Request::table(GroupId::new(0)));
        assert_eq!(signals.receptionist_request_possible.value(), 1);
        assert_eq!(
            restaurant.snapshot().await.roles.receptionist,
            ReceptionistStatus::WaitForRequest
        );
    }

    #[tokio::test]
    async fn test_unexpected_request_is_fatal() {
        let (restaurant, receptionist, _) = setup(1);
        let signals = restaurant.signals();
        restaurant
            .lock()
            .await
            .post_receptionist_request(Request::food(GroupId::new(0)))
            .unwrap();
        signals.receptionist_request.up().unwrap();

        let err = receptionist.run().await.unwrap_err();
        assert!(matches!(
            err,
            crate::core::error::RestaurantError::Protocol(ProtocolError::UnexpectedRequest {
                role: "receptionist",
                ..
            })
        ));
    }
}
