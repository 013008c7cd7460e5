//! Request messages carried by the single-slot channels

use serde::{Deserialize, Serialize};
use std::fmt;

use super::group::GroupId;

/// 请求类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestKind {
    /// Group asks the receptionist for a table
    TableReq,
    /// Group asks the receptionist for the bill
    BillReq,
    /// Group asks the waiter for food; also the waiter's order to the chef
    FoodReq,
    /// Chef tells the waiter an order is cooked
    FoodReady,
}

impl fmt::Display for RequestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestKind::TableReq => write!(f, "TABLEREQ"),
            RequestKind::BillReq => write!(f, "BILLREQ"),
            RequestKind::FoodReq => write!(f, "FOODREQ"),
            RequestKind::FoodReady => write!(f, "FOODREADY"),
        }
    }
}

/// A tagged request written into one of the shared request slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Request {
    pub kind: RequestKind,
    pub group: GroupId,
}

impl Request {
    pub fn new(kind: RequestKind, group: GroupId) -> Self {
        Self { kind, group }
    }

    pub fn table(group: GroupId) -> Self {
        Self::new(RequestKind::TableReq, group)
    }

    pub fn bill(group: GroupId) -> Self {
        Self::new(RequestKind::BillReq, group)
    }

    pub fn food(group: GroupId) -> Self {
        Self::new(RequestKind::FoodReq, group)
    }

    pub fn food_ready(group: GroupId) -> Self {
        Self::new(RequestKind::FoodReady, group)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(group={})", self.kind, self.group)
    }
}
