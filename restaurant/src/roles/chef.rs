//! 厨师
//!
//! Takes one order at a time from the chef slot, cooks it, and reports it
//! ready on the waiter channel.

use shared::{ChefStatus, GroupId, RequestKind, Request};
use std::sync::Arc;

use crate::core::error::{ProtocolError, RestaurantResult};
use crate::delay::{DelaySource, pause};
use crate::state::Restaurant;
use crate::trace::StateLog;

pub struct Chef {
    restaurant: Arc<Restaurant>,
    log: StateLog,
    delays: Arc<dyn DelaySource>,
    /// Group whose order is on the stove
    last_group: Option<GroupId>,
}

impl Chef {
    pub fn new(restaurant: Arc<Restaurant>, log: StateLog, delays: Arc<dyn DelaySource>) -> Self {
        Self {
            restaurant,
            log,
            delays,
            last_group: None,
        }
    }

    /// Cooks exactly one order per group, then returns
    pub async fn run(mut self) -> RestaurantResult<usize> {
        let total = self.restaurant.n_groups();
        tracing::info!(orders = total, "Chef started");

        for _ in 0..total {
            self.wait_for_order().await?;
            self.process_order().await?;
        }

        tracing::info!(cooked = total, "Chef finished");
        Ok(total)
    }

    /// Takes the pending order and acknowledges it to the waiter
    pub async fn wait_for_order(&mut self) -> RestaurantResult<GroupId> {
        let signals = self.restaurant.signals();
        {
            let mut state = self.restaurant.lock().await;
            state.status.chef = ChefStatus::WaitForOrder;
            self.log.save(&state)?;
        }

        signals.wait_order.down().await?;

        let group = {
            let mut state = self.restaurant.lock().await;
            let order = state.take_chef_request()?;
            if order.kind != RequestKind::FoodReq {
                return Err(ProtocolError::UnexpectedRequest {
                    role: "chef",
                    request: order,
                }
                .into());
            }
            state.status.chef = ChefStatus::Cook;
            self.log.save(&state)?;
            order.group
        };
        self.last_group = Some(group);
        signals.order_received.up()?;

        tracing::debug!(%group, "Chef took order");
        Ok(group)
    }

    /// Cooks the recorded order and posts FOODREADY for it
    pub async fn process_order(&mut self) -> RestaurantResult<()> {
        let group = self
            .last_group
            .take()
            .ok_or(ProtocolError::EmptySlot { channel: "chef" })?;

        pause(self.delays.cook()).await;

        let signals = self.restaurant.signals();
        signals.waiter_request_possible.down().await?;
        {
            let mut state = self.restaurant.lock().await;
            state.post_waiter_request(Request::food_ready(group))?;
            state.status.chef = ChefStatus::Rest;
            self.log.save(&state)?;
        }
        signals.waiter_request.up()?;

        tracing::info!(%group, "Food ready");
        Ok(())
    }
}
