//! Service role status fields
//!
//! Purely informational: the roles publish these inside their critical
//! sections so the state log can show what each of them is doing.

use serde::{Deserialize, Serialize};
use std::fmt;

/// 厨师状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChefStatus {
    #[default]
    WaitForOrder,
    Cook,
    Rest,
}

/// 服务员状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaiterStatus {
    #[default]
    WaitForRequest,
    InformChef,
    TakeToTable,
}

/// 前台接待状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceptionistStatus {
    #[default]
    WaitForRequest,
    AssignTable,
    ReceivePayment,
}

impl ChefStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ChefStatus::WaitForOrder => "WFO",
            ChefStatus::Cook => "COO",
            ChefStatus::Rest => "RST",
        }
    }
}

impl WaiterStatus {
    pub fn code(&self) -> &'static str {
        match self {
            WaiterStatus::WaitForRequest => "WFR",
            WaiterStatus::InformChef => "INF",
            WaiterStatus::TakeToTable => "TTT",
        }
    }
}

impl ReceptionistStatus {
    pub fn code(&self) -> &'static str {
        match self {
            ReceptionistStatus::WaitForRequest => "WFR",
            ReceptionistStatus::AssignTable => "ATB",
            ReceptionistStatus::ReceivePayment => "RPY",
        }
    }
}

impl fmt::Display for ChefStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for WaiterStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl fmt::Display for ReceptionistStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Status block of the three service roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoleStatus {
    pub chef: ChefStatus,
    pub waiter: WaiterStatus,
    pub receptionist: ReceptionistStatus,
}
