//! 核心模块 - 配置和错误定义
//!
//! # 模块结构
//!
//! - [`Config`] - 模拟配置
//! - [`LaunchParams`] - 角色启动参数
//! - [`RestaurantError`] - 统一错误

pub mod config;
pub mod error;

pub use config::{Config, LaunchParams, ValidatedLaunch, parse_key};
pub use error::{
    ConfigError, ProtocolError, RestaurantError, RestaurantResult, SyncError, TraceError,
};
