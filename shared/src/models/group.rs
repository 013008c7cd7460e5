//! Client group model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound on the number of groups a restaurant instance is sized for
pub const MAX_GROUPS: usize = 16;

/// Group identifier (0..nGroups-1)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(usize);

impl GroupId {
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 客人组的逻辑状态
///
/// Written by the group itself (arrival, check-in, eating) and by the
/// receptionist (waiting, seated, done).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GroupState {
    /// 前往餐厅
    #[default]
    Arriving,
    /// 在前台等待安排
    AtReception,
    /// 在等候区
    Waiting,
    /// 已入座
    Seated,
    /// 用餐中
    Eating,
    /// 已结账离开
    Done,
}

impl GroupState {
    /// Whether the group currently occupies a table
    pub fn is_seated(&self) -> bool {
        matches!(self, GroupState::Seated | GroupState::Eating)
    }

    /// Three-letter code used by the text state log
    pub fn code(&self) -> &'static str {
        match self {
            GroupState::Arriving => "ARR",
            GroupState::AtReception => "REC",
            GroupState::Waiting => "WAI",
            GroupState::Seated => "SEA",
            GroupState::Eating => "EAT",
            GroupState::Done => "DON",
        }
    }
}

impl fmt::Display for GroupState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupState::Arriving => write!(f, "arriving"),
            GroupState::AtReception => write!(f, "at_reception"),
            GroupState::Waiting => write!(f, "waiting"),
            GroupState::Seated => write!(f, "seated"),
            GroupState::Eating => write!(f, "eating"),
            GroupState::Done => write!(f, "done"),
        }
    }
}
