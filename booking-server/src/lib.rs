//! Booking Server - 聊天预约服务
//!
//! # 架构概述
//!
//! - **Availability Engine** (`availability`): 每周时间表 + 已有预约 → 工作日与时段
//! - **Booking Service** (`booking`): 创建/取消/确认/改期，时段唯一性由存储层保证
//! - **Conversation Engine** (`conversation`): 每个用户一个状态机，处理时段冲突恢复
//! - **Directory** (`directory`): 客户、服务项目、时间表配置
//! - **HTTP API** (`api`): axum 路由
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、服务器、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── availability/  # 可用时段计算
//! ├── booking/       # 预约服务
//! ├── conversation/  # 对话状态机
//! ├── directory/     # 客户/服务/时间表
//! ├── store/         # 存储接口 (内存 / SQLite)
//! ├── db/            # SQLite 连接池与仓储
//! └── utils/         # 错误、日志、时间、校验
//! ```

pub mod api;
pub mod availability;
pub mod booking;
pub mod clock;
pub mod conversation;
pub mod core;
pub mod db;
pub mod directory;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use availability::AvailabilityEngine;
pub use booking::BookingService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use conversation::{ConversationEngine, EngineSettings};
pub use core::{Config, Server, ServerState};
pub use directory::DirectoryService;
pub use utils::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::init_logger_with_file;

/// 设置运行环境: 加载 .env 并初始化日志
pub fn setup_environment() -> Config {
    dotenv::dotenv().ok();
    let config = Config::from_env();
    init_logger_with_file(
        Some(&config.log_level),
        Some(config.log_json),
        config.log_dir.as_deref(),
    );
    config
}
