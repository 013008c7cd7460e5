//! 角色模块
//!
//! # 模块结构
//!
//! - [`Receptionist`] - 分配餐桌、收款
//! - [`Waiter`] - 点单转交厨师、上菜
//! - [`Chef`] - 烹饪
//! - [`GroupClient`] - 客人组 (请求方)
//! - [`launch`] - 按启动参数运行一个服务角色

pub mod chef;
pub mod group;
pub mod launch;
pub mod receptionist;
pub mod waiter;

pub use chef::Chef;
pub use group::{GroupClient, GroupReport};
pub use launch::{RoleKind, RoleReport, launch};
pub use receptionist::{GroupRecord, Receptionist};
pub use waiter::Waiter;
