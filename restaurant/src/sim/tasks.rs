//! 模拟任务管理
//!
//! Every role and every group runs as its own task. A task that fails or
//! panics tears the restaurant down, so the peers blocked on it fail with
//! `Closed` instead of waiting forever.

use futures::FutureExt;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use tokio::task::JoinSet;

use crate::core::error::{RestaurantError, RestaurantResult};
use crate::roles::{GroupReport, RoleReport};
use crate::state::Restaurant;

/// 任务类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskKind {
    /// 服务角色 (chef / waiter / receptionist)
    Role,
    /// 客人组
    Group,
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskKind::Role => write!(f, "Role"),
            TaskKind::Group => write!(f, "Group"),
        }
    }
}

/// What a finished task hands back
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskOutcome {
    Role(RoleReport),
    Group(GroupReport),
}

/// Reports of every task that completed
#[derive(Debug, Default)]
pub struct Outcomes {
    pub roles: Vec<RoleReport>,
    pub groups: Vec<GroupReport>,
}

type Finished = (String, TaskKind, RestaurantResult<TaskOutcome>);

/// 模拟任务集合
pub struct SimTasks {
    set: JoinSet<Finished>,
}

impl SimTasks {
    pub fn new() -> Self {
        Self {
            set: JoinSet::new(),
        }
    }

    /// 注册并启动一个任务
    ///
    /// Panics are caught and turned into [`RestaurantError::RolePanicked`].
    pub fn spawn<F>(&mut self, name: String, kind: TaskKind, future: F)
    where
        F: Future<Output = RestaurantResult<TaskOutcome>> + Send + 'static,
    {
        tracing::debug!(task = %name, kind = %kind, "Spawning task");
        self.set.spawn(async move {
            let result = match AssertUnwindSafe(future).catch_unwind().await {
                Ok(result) => result,
                Err(panic_info) => {
                    let message = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        (*s).to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    tracing::error!(task = %name, kind = %kind, panic = %message, "Task panicked");
                    Err(RestaurantError::RolePanicked {
                        role: name.clone(),
                        message,
                    })
                }
            };
            (name, kind, result)
        });
    }

    pub fn len(&self) -> usize {
        self.set.len()
    }

    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Waits for every task
    ///
    /// On the first failure the restaurant is destroyed. The error returned
    /// is the root cause, not one of the `Closed` failures it triggered.
    pub async fn join(mut self, restaurant: &Restaurant) -> RestaurantResult<Outcomes> {
        let mut outcomes = Outcomes::default();
        let mut root_cause: Option<RestaurantError> = None;

        while let Some(joined) = self.set.join_next().await {
            let (name, kind, result) = match joined {
                Ok(finished) => finished,
                Err(e) => (
                    "unknown".to_string(),
                    TaskKind::Role,
                    Err(RestaurantError::RolePanicked {
                        role: "unknown".to_string(),
                        message: e.to_string(),
                    }),
                ),
            };

            match result {
                Ok(TaskOutcome::Role(report)) => outcomes.roles.push(report),
                Ok(TaskOutcome::Group(report)) => outcomes.groups.push(report),
                Err(e) => {
                    if !restaurant.signals().is_destroyed() {
                        tracing::error!(task = %name, kind = %kind, error = %e, "Task failed, tearing down");
                        restaurant.destroy();
                    }
                    let replace = match &root_cause {
                        None => true,
                        Some(previous) => previous.is_closed_signal() && !e.is_closed_signal(),
                    };
                    if replace {
                        root_cause = Some(e);
                    }
                }
            }
        }

        if let Some(e) = root_cause {
            return Err(e);
        }

        outcomes.roles.sort_by_key(|r| r.role as u8);
        outcomes.groups.sort_by_key(|g| g.group.index());
        Ok(outcomes)
    }
}

impl Default for SimTasks {
    fn default() -> Self {
        Self::new()
    }
}
