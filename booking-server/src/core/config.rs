use chrono_tz::Tz;
use std::time::Duration;

use crate::conversation::EngineSettings;
use crate::utils::time::parse_timezone;

/// 默认业务时区
pub const DEFAULT_TIMEZONE: Tz = chrono_tz::America::Sao_Paulo;

/// 服务器配置 - 预约服务的所有配置项
///
/// # 环境变量
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | HTTP_PORT | 3001 | HTTP 服务端口 |
/// | DATABASE_PATH | booking.db | SQLite 文件 (`:memory:` 可用) |
/// | ENVIRONMENT | development | 运行环境 |
/// | PROVIDER_ID | 1 | 聊天预约的服务提供者 |
/// | PROVIDER_NAME | Barbearia | 启动时确保存在的提供者名称 |
/// | PROVIDER_TIMEZONE | America/Sao_Paulo | 业务时区 (IANA) |
/// | BOOKING_HORIZON_DAYS | 30 | 可预约天数范围 |
/// | MAX_OFFERED_DAYS | 8 | 对话中列出的日期数 |
/// | SESSION_IDLE_TIMEOUT_SECS | 1800 | 会话空闲淘汰阈值 |
/// | SESSION_SWEEP_INTERVAL_SECS | 60 | 淘汰扫描周期 |
/// | EXTERNAL_CALL_TIMEOUT_MS | 5000 | 单次外部调用超时 |
/// | LOG_LEVEL | info | 日志级别 (RUST_LOG 优先) |
/// | LOG_DIR | - | 设置后按天滚动写文件 |
/// | LOG_JSON | false | JSON 格式日志 |
///
/// # 示例
///
/// ```ignore
/// HTTP_PORT=8080 PROVIDER_TIMEZONE=Europe/Lisbon cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP API 服务端口
    pub http_port: u16,
    /// SQLite 数据库路径
    pub database_path: String,
    /// 运行环境: development | staging | production
    pub environment: String,
    pub provider_id: i64,
    pub provider_name: String,
    /// 业务时区
    pub timezone: Tz,
    pub booking_horizon_days: u32,
    pub max_offered_days: usize,
    pub session_idle_timeout_secs: u64,
    pub session_sweep_interval_secs: u64,
    pub external_call_timeout_ms: u64,
    pub log_level: String,
    pub log_dir: Option<String>,
    pub log_json: bool,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置或无法解析，使用默认值
    pub fn from_env() -> Self {
        let timezone = std::env::var("PROVIDER_TIMEZONE")
            .map(|name| parse_timezone(&name, DEFAULT_TIMEZONE))
            .unwrap_or(DEFAULT_TIMEZONE);

        Self {
            http_port: env_or("HTTP_PORT", 3001),
            database_path: std::env::var("DATABASE_PATH").unwrap_or_else(|_| "booking.db".into()),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            provider_id: env_or("PROVIDER_ID", 1),
            provider_name: std::env::var("PROVIDER_NAME").unwrap_or_else(|_| "Barbearia".into()),
            timezone,
            booking_horizon_days: env_or("BOOKING_HORIZON_DAYS", 30),
            max_offered_days: env_or("MAX_OFFERED_DAYS", 8),
            session_idle_timeout_secs: env_or("SESSION_IDLE_TIMEOUT_SECS", 1800),
            session_sweep_interval_secs: env_or("SESSION_SWEEP_INTERVAL_SECS", 60),
            external_call_timeout_ms: env_or("EXTERNAL_CALL_TIMEOUT_MS", 5000),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".into()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|d| !d.is_empty()),
            log_json: env_or("LOG_JSON", false),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(database_path: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.database_path = database_path.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn session_idle_timeout(&self) -> Duration {
        Duration::from_secs(self.session_idle_timeout_secs)
    }

    pub fn session_sweep_interval(&self) -> Duration {
        Duration::from_secs(self.session_sweep_interval_secs.max(1))
    }

    /// 对话引擎参数
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            provider_id: self.provider_id,
            horizon_days: self.booking_horizon_days,
            max_offered_days: self.max_offered_days,
            call_timeout: Duration::from_millis(self.external_call_timeout_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
