//! Semaphore Restaurant - 信号量餐厅同步模拟
//!
//! # 架构概述
//!
//! 三个服务角色 (前台、服务员、厨师) 与 N 个客人组并发运行，
//! 通过一把互斥锁保护的共享状态和一组计数信号完成请求/应答：
//!
//! - **共享状态** (`state`): 餐桌分配、客人组状态、单槽请求通道
//! - **同步原语** (`sync`): 基于 `tokio::sync::Semaphore` 的计数信号
//! - **角色** (`roles`): 前台、服务员、厨师和客人组客户端
//! - **状态日志** (`trace`): 每次状态变化后的一行快照
//! - **模拟编排** (`sim`): 创建、启动、等待、销毁
//!
//! # 模块结构
//!
//! ```text
//! restaurant/src/
//! ├── core/          # 配置、启动参数、错误
//! ├── state/         # 共享状态、餐厅实例、注册表
//! ├── sync/          # 信号与信号集
//! ├── roles/         # 前台 / 服务员 / 厨师 / 客人组
//! ├── trace/         # 状态日志格式与输出
//! ├── sim/           # 模拟编排与任务管理
//! ├── utils/         # 日志、诊断输出
//! ├── cli.rs         # 命令行参数
//! └── delay.rs       # 随机延迟
//! ```

pub mod cli;
pub mod core;
pub mod delay;
pub mod roles;
pub mod sim;
pub mod state;
pub mod sync;
pub mod trace;
pub mod utils;

// Re-export 公共类型
pub use cli::Cli;
pub use core::{Config, LaunchParams, RestaurantError, RestaurantResult};
pub use roles::{Chef, GroupClient, Receptionist, RoleKind, Waiter, launch};
pub use sim::{Simulation, SimulationReport};
pub use state::{Layout, Registry, Restaurant};
pub use trace::{StateLog, TraceFormat};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置环境 (日志输出)
pub fn setup_environment(config: &Config) {
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());
}

pub fn print_banner() {
    println!(
        r#"
    ____            __                              __
   / __ \___  _____/ /_____ ___  ___________ _____  / /_
  / /_/ / _ \/ ___/ __/ __ `/ / / / ___/ __ `/ __ \/ __/
 / _, _/  __(__  ) /_/ /_/ / /_/ / /  / /_/ / / / / /_
/_/ |_|\___/____/\__/\__,_/\__,_/_/   \__,_/_/ /_/\__/
    "#
    );
}
