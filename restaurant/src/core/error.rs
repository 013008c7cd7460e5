//! 错误定义
//!
//! | 分类 | 类型 | 处理 |
//! |------|------|------|
//! | 启动参数/配置 | [`ConfigError`] | 进入角色逻辑前终止 |
//! | 同步原语失败 | [`SyncError`] | 立即终止，不重试 |
//! | 协议不变量 | [`ProtocolError`] | 编程错误，终止 |
//! | 状态日志 | [`TraceError`] | 终止 |
//!
//! Every variant is fatal for the role that hits it. There is no recovery
//! path and no restart.

use shared::{GroupId, Request, TableId};
use std::path::PathBuf;
use thiserror::Error;

/// Launch parameter and setup errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Environment variable {name} has an invalid value: {value:?}")]
    InvalidEnv { name: &'static str, value: String },

    #[error("Error on the access key communication: {0:?}")]
    InvalidKey(String),

    #[error("Log file name too long ({len} > {max} bytes)")]
    LogNameTooLong { len: usize, max: usize },

    #[error("Log file name is empty")]
    EmptyLogName,

    #[error("Invalid number of groups: {count} (expected 1..={max})")]
    InvalidGroupCount { count: usize, max: usize },

    #[error("Invalid number of tables: {count} (expected 1..={max})")]
    InvalidTableCount { count: usize, max: usize },

    #[error("No restaurant registered under key {0:#x}")]
    Unreachable(u32),

    #[error("A restaurant is already registered under key {0:#x}")]
    KeyInUse(u32),

    #[error("Cannot open diagnostics file {path}: {source}")]
    Diagnostics {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Rendezvous primitive failures
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Signal {signal} was closed")]
    Closed { signal: String },

    #[error("Signal {signal} would exceed its permit limit")]
    Overflow { signal: String },
}

/// Violations of the request/acknowledge protocol
#[derive(Debug, Error)]
pub enum ProtocolError {
    #[error("Woken on {channel} channel but its slot is empty")]
    EmptySlot { channel: &'static str },

    #[error("{channel} slot still holds an unconsumed {pending}")]
    SlotOccupied {
        channel: &'static str,
        pending: Request,
    },

    #[error("{role} cannot serve {request}")]
    UnexpectedRequest {
        role: &'static str,
        request: Request,
    },

    #[error("Unknown group: {0}")]
    UnknownGroup(GroupId),

    #[error("Unknown table: {0}")]
    UnknownTable(TableId),

    #[error("Group {0} has no table assigned")]
    NoTableAssigned(GroupId),

    #[error("Table {table} is already held by group {holder}")]
    TableOccupied { table: TableId, holder: GroupId },

    #[error("Group {0} is not in the waiting room")]
    NotWaiting(GroupId),

    #[error("Inconsistent restaurant state: {0}")]
    Inconsistent(String),
}

/// State log failures
#[derive(Debug, Error)]
pub enum TraceError {
    #[error("Cannot open state log {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot write state log: {0}")]
    Write(#[from] std::io::Error),

    #[error("Cannot encode snapshot: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Top-level error of a role or of the simulation
#[derive(Debug, Error)]
pub enum RestaurantError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Synchronization error: {0}")]
    Sync(#[from] SyncError),

    #[error("Protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("State log error: {0}")]
    Trace(#[from] TraceError),

    #[error("Role {role} panicked: {message}")]
    RolePanicked { role: String, message: String },
}

impl RestaurantError {
    /// Secondary failure caused by the teardown of the signal set
    pub fn is_closed_signal(&self) -> bool {
        matches!(self, RestaurantError::Sync(SyncError::Closed { .. }))
    }
}

pub type RestaurantResult<T> = Result<T, RestaurantError>;
