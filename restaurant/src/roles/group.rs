//! 客人组客户端
//!
//! The client side of the protocol. Groups are not service roles: they post
//! requests and block on the signal that answers them.

use serde::Serialize;
use shared::{GroupId, GroupState, Request, TableId};
use std::sync::Arc;

use crate::core::error::RestaurantResult;
use crate::delay::{DelaySource, pause};
use crate::state::Restaurant;
use crate::trace::StateLog;

/// Outcome of one group's visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GroupReport {
    pub group: GroupId,
    pub table: TableId,
}

pub struct GroupClient {
    id: GroupId,
    restaurant: Arc<Restaurant>,
    log: StateLog,
    delays: Arc<dyn DelaySource>,
}

impl GroupClient {
    pub fn new(
        id: GroupId,
        restaurant: Arc<Restaurant>,
        log: StateLog,
        delays: Arc<dyn DelaySource>,
    ) -> Self {
        Self {
            id,
            restaurant,
            log,
            delays,
        }
    }

    /// Full visit: arrive, get a table, order, eat, pay, leave
    pub async fn run(self) -> RestaurantResult<GroupReport> {
        self.go_to_restaurant().await?;
        let table = self.check_in_at_reception().await?;
        self.order_food().await?;
        self.wait_food().await?;
        self.eat().await;
        self.check_out_at_reception().await?;

        tracing::debug!(group = %self.id, %table, "Group left");
        Ok(GroupReport {
            group: self.id,
            table,
        })
    }

    pub async fn go_to_restaurant(&self) -> RestaurantResult<()> {
        {
            let mut state = self.restaurant.lock().await;
            state.set_group_state(self.id, GroupState::Arriving)?;
            self.log.save(&state)?;
        }
        pause(self.delays.arrival()).await;
        Ok(())
    }

    /// Posts TABLEREQ and blocks until the receptionist seats this group
    pub async fn check_in_at_reception(&self) -> RestaurantResult<TableId> {
        let signals = self.restaurant.signals();
        {
            let mut state = self.restaurant.lock().await;
            state.set_group_state(self.id, GroupState::AtReception)?;
            self.log.save(&state)?;
        }

        signals.receptionist_request_possible.down().await?;
        {
            let mut state = self.restaurant.lock().await;
            state.post_receptionist_request(Request::table(self.id))?;
        }
        signals.receptionist_request.up()?;

        signals.wait_for_table(self.id)?.down().await?;

        let table = self.restaurant.lock().await.table_of(self.id)?;
        tracing::debug!(group = %self.id, %table, "Group at table");
        Ok(table)
    }

    /// Posts FOODREQ on the waiter channel
    pub async fn order_food(&self) -> RestaurantResult<()> {
        let signals = self.restaurant.signals();
        signals.waiter_request_possible.down().await?;
        {
            let mut state = self.restaurant.lock().await;
            state.post_waiter_request(Request::food(self.id))?;
        }
        signals.waiter_request.up()?;
        Ok(())
    }

    /// Blocks until the waiter brings food to this group's table
    pub async fn wait_food(&self) -> RestaurantResult<()> {
        let table = self.restaurant.lock().await.table_of(self.id)?;
        self.restaurant.signals().food_arrived(table)?.down().await?;

        let mut state = self.restaurant.lock().await;
        state.set_group_state(self.id, GroupState::Eating)?;
        self.log.save(&state)?;
        Ok(())
    }

    pub async fn eat(&self) {
        pause(self.delays.eat()).await;
    }

    /// Posts BILLREQ and blocks until the table is vacated
    pub async fn check_out_at_reception(&self) -> RestaurantResult<()> {
        let signals = self.restaurant.signals();
        let table = self.restaurant.lock().await.table_of(self.id)?;

        signals.receptionist_request_possible.down().await?;
        {
            let mut state = self.restaurant.lock().await;
            state.post_receptionist_request(Request::bill(self.id))?;
        }
        signals.receptionist_request.up()?;

        signals.table_done(table)?.down().await?;
        Ok(())
    }
}
