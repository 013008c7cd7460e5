//! Restaurant data model

pub mod dining_table;
pub mod group;
pub mod request;
pub mod role;
pub mod snapshot;

pub use dining_table::{TABLE_COUNT, TableId, TableOccupancy};
pub use group::{GroupId, GroupState, MAX_GROUPS};
pub use request::{Request, RequestKind};
pub use role::{ChefStatus, ReceptionistStatus, RoleStatus, WaiterStatus};
pub use snapshot::RestaurantSnapshot;
