//! Shared types for the restaurant simulation
//!
//! Identifiers, request messages, role/group states and the state snapshot
//! exchanged between the service roles, the group clients and the state log.

pub mod models;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use models::{
    ChefStatus, GroupId, GroupState, MAX_GROUPS, ReceptionistStatus, Request, RequestKind,
    RestaurantSnapshot, RoleStatus, TABLE_COUNT, TableId, TableOccupancy, WaiterStatus,
};
