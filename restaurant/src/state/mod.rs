//! 共享状态 - shared restaurant state, the instance handle and the key registry

pub mod registry;
pub mod restaurant;
pub mod shared_state;

pub use registry::Registry;
pub use restaurant::Restaurant;
pub use shared_state::{Layout, RestaurantState};
