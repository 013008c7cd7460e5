//! 服务员
//!
//! Relays food requests from groups to the chef and cooked food from the
//! chef to the table. The waiter channel multiplexes both directions; the
//! request kind tells them apart.

use shared::{GroupId, Request, RequestKind, WaiterStatus};
use std::sync::Arc;

use crate::core::error::{ProtocolError, RestaurantResult};
use crate::state::Restaurant;
use crate::trace::StateLog;

pub struct Waiter {
    restaurant: Arc<Restaurant>,
    log: StateLog,
}

impl Waiter {
    pub fn new(restaurant: Arc<Restaurant>, log: StateLog) -> Self {
        Self { restaurant, log }
    }

    /// Serves exactly two requests per group (order + delivery), then returns
    pub async fn run(self) -> RestaurantResult<usize> {
        let total = 2 * self.restaurant.n_groups();
        tracing::info!(requests = total, "Waiter started");

        let mut handled = 0;
        while handled < total {
            let request = self.wait_for_client_or_chef().await?;
            match request.kind {
                RequestKind::FoodReq => self.inform_chef(request.group).await?,
                RequestKind::FoodReady => self.take_food_to_table(request.group).await?,
                _ => {
                    return Err(ProtocolError::UnexpectedRequest {
                        role: "waiter",
                        request,
                    }
                    .into());
                }
            }
            handled += 1;
        }

        tracing::info!(handled, "Waiter finished");
        Ok(handled)
    }

    pub async fn wait_for_client_or_chef(&self) -> RestaurantResult<Request> {
        let signals = self.restaurant.signals();
        {
            let mut state = self.restaurant.lock().await;
            state.status.waiter = WaiterStatus::WaitForRequest;
            self.log.save(&state)?;
        }

        signals.waiter_request.down().await?;

        let request = {
            let mut state = self.restaurant.lock().await;
            state.take_waiter_request()?
        };
        signals.waiter_request_possible.up()?;

        tracing::debug!(%request, "Waiter received request");
        Ok(request)
    }

    /// Hands the order to the chef and waits until the chef has taken it
    pub async fn inform_chef(&self, group: GroupId) -> RestaurantResult<()> {
        {
            let mut state = self.restaurant.lock().await;
            state.status.waiter = WaiterStatus::InformChef;
            state.post_chef_request(Request::food(group))?;
            self.log.save(&state)?;
        }

        let signals = self.restaurant.signals();
        signals.wait_order.up()?;
        // the chef slot may only be reused once the chef acknowledges
        signals.order_received.down().await?;

        tracing::debug!(%group, "Order handed to chef");
        Ok(())
    }

    pub async fn take_food_to_table(&self, group: GroupId) -> RestaurantResult<()> {
        let table = {
            let mut state = self.restaurant.lock().await;
            state.status.waiter = WaiterStatus::TakeToTable;
            let table = state.table_of(group)?;
            self.log.save(&state)?;
            table
        };

        self.restaurant.signals().food_arrived(table)?.up()?;
        tracing::info!(%group, %table, "Food served");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::RestaurantError;
    use crate::state::Layout;
    use crate::trace::MemorySink;
    use shared::TableId;
    use std::time::Duration;

    fn setup(n_groups: usize) -> (Arc<Restaurant>, Waiter) {
        let restaurant = Arc::new(Restaurant::new(1, Layout::new(n_groups)).unwrap());
        let waiter = Waiter::new(restaurant.clone(), StateLog::memory(&MemorySink::new()));
        (restaurant, waiter)
    }

    #[tokio::test]
    async fn test_take_food_signals_the_right_table() {
        let (restaurant, waiter) = setup(2);
        restaurant
            .lock()
            .await
            .assign_table(GroupId::new(1), TableId::new(1))
            .unwrap();

        waiter.take_food_to_table(GroupId::new(1)).await.unwrap();

        let signals = restaurant.signals();
        assert_eq!(signals.food_arrived(TableId::new(1)).unwrap().value(), 1);
        assert_eq!(signals.food_arrived(TableId::new(0)).unwrap().value(), 0);
    }

    #[tokio::test]
    async fn test_food_for_unseated_group_is_rejected() {
        let (_, waiter) = setup(2);
        let err = waiter.take_food_to_table(GroupId::new(0)).await.unwrap_err();
        assert!(matches!(
            err,
            RestaurantError::Protocol(ProtocolError::NoTableAssigned(_))
        ));
    }

    #[tokio::test]
    async fn test_inform_chef_waits_for_acknowledgement() {
        let (restaurant, waiter) = setup(1);
        let handle = tokio::spawn(async move { waiter.inform_chef(GroupId::new(0)).await });

        let signals = restaurant.signals();
        signals.wait_order.down().await.unwrap();
        let order = restaurant.lock().await.take_chef_request().unwrap();
        assert_eq!(order, Request::food(GroupId::new(0)));

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!handle.is_finished(), "waiter must block until acknowledged");

        signals.order_received.up().unwrap();
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("waiter should resume after acknowledgement")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn test_inform_chef_releases_lock_before_waiting() {
        let (restaurant, waiter) = setup(1);
        let _handle = tokio::spawn(async move { waiter.inform_chef(GroupId::new(0)).await });

        restaurant.signals().wait_order.down().await.unwrap();
        // the waiter is now blocked on the acknowledgement; the state must be reachable
        let status = tokio::time::timeout(Duration::from_secs(1), restaurant.lock())
            .await
            .expect("lock must not be held while waiting")
            .status
            .waiter;
        assert_eq!(status, WaiterStatus::InformChef);
    }

    #[tokio::test]
    async fn test_table_request_is_not_served_by_waiter() {
        let (restaurant, waiter) = setup(1);
        restaurant
            .lock()
            .await
            .post_waiter_request(Request::table(GroupId::new(0)))
            .unwrap();
        restaurant.signals().waiter_request.up().unwrap();

        let err = waiter.run().await.unwrap_err();
        assert!(matches!(
            err,
            RestaurantError::Protocol(ProtocolError::UnexpectedRequest { role: "waiter", .. })
        ));
    }
}
