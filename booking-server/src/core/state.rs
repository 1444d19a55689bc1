use std::sync::Arc;

use crate::availability::AvailabilityEngine;
use crate::booking::BookingService;
use crate::clock::{Clock, SystemClock};
use crate::conversation::{ConversationEngine, InMemorySessionStore, SessionStore};
use crate::core::Config;
use crate::core::tasks::BackgroundTasks;
use crate::db::DbService;
use crate::directory::DirectoryService;
use crate::store::{BookingStore, DirectoryStore, MemoryStore, ScheduleStore, SqliteStore};
use crate::utils::AppResult;

/// Storage backends behind the engines
#[derive(Debug, Clone)]
pub struct Stores {
    pub schedule: Arc<dyn ScheduleStore>,
    pub bookings: Arc<dyn BookingStore>,
    pub directory: Arc<dyn DirectoryStore>,
}

impl Stores {
    /// Process-local stores (tests, demos)
    pub fn memory() -> Self {
        let store = Arc::new(MemoryStore::new());
        Self {
            schedule: store.clone(),
            bookings: store.clone(),
            directory: store,
        }
    }

    pub fn sqlite(db: &DbService) -> Self {
        let store = Arc::new(SqliteStore::new(db.pool.clone()));
        Self {
            schedule: store.clone(),
            bookings: store.clone(),
            directory: store,
        }
    }
}

/// 服务器状态 - 持有所有服务的单例引用
///
/// 使用 Arc 实现浅拷贝，所有权成本极低。
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | availability | 工作日与时段计算 |
/// | bookings | 预约创建/取消/确认 |
/// | directory | 客户、服务项目、时间表 |
/// | conversation | 聊天状态机 |
/// | sessions | 会话存储 |
#[derive(Clone, Debug)]
pub struct ServerState {
    pub config: Config,
    pub availability: Arc<AvailabilityEngine>,
    pub bookings: Arc<BookingService>,
    pub directory: Arc<DirectoryService>,
    pub conversation: Arc<ConversationEngine>,
    pub sessions: Arc<dyn SessionStore>,
    pub clock: Arc<dyn Clock>,
}

impl ServerState {
    /// Wire the engines over the given stores and clock
    pub fn build(config: Config, stores: Stores, clock: Arc<dyn Clock>) -> Self {
        let availability = Arc::new(AvailabilityEngine::new(
            stores.schedule.clone(),
            stores.bookings.clone(),
            clock.clone(),
            config.timezone,
        ));
        let bookings = Arc::new(BookingService::new(
            stores.bookings.clone(),
            stores.directory.clone(),
            clock.clone(),
            config.timezone,
        ));
        let directory = Arc::new(DirectoryService::new(
            stores.directory.clone(),
            stores.schedule.clone(),
        ));
        let sessions: Arc<dyn SessionStore> = Arc::new(InMemorySessionStore::new());
        let conversation = Arc::new(ConversationEngine::new(
            availability.clone(),
            bookings.clone(),
            directory.clone(),
            sessions.clone(),
            config.engine_settings(),
        ));

        Self {
            config,
            availability,
            bookings,
            directory,
            conversation,
            sessions,
            clock,
        }
    }

    /// 初始化服务器状态
    ///
    /// 1. 打开 SQLite 并执行迁移
    /// 2. 组装服务
    /// 3. 确保配置的服务提供者存在
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_path).await?;
        let state = Self::build(config.clone(), Stores::sqlite(&db), Arc::new(SystemClock));
        state.ensure_provider().await?;
        Ok(state)
    }

    /// In-memory state for tests
    pub async fn in_memory(config: Config, clock: Arc<dyn Clock>) -> AppResult<Self> {
        let state = Self::build(config, Stores::memory(), clock);
        state.ensure_provider().await?;
        Ok(state)
    }

    async fn ensure_provider(&self) -> AppResult<()> {
        let provider = self
            .directory
            .ensure_provider(self.config.provider_id, &self.config.provider_name)
            .await?;
        tracing::info!(
            provider_id = provider.id,
            timezone = %self.config.timezone,
            "Provider ready"
        );
        Ok(())
    }

    /// 启动后台任务 (会话空闲淘汰)
    pub fn start_background_tasks(&self) -> BackgroundTasks {
        let mut tasks = BackgroundTasks::new();

        let sessions = self.sessions.clone();
        let max_idle = self.config.session_idle_timeout();
        tasks.spawn_periodic(
            "session_sweeper",
            self.config.session_sweep_interval(),
            move || {
                let sessions = sessions.clone();
                async move {
                    let evicted = sessions.evict_idle(max_idle).await;
                    if evicted > 0 {
                        tracing::debug!(evicted, "Evicted idle sessions");
                    }
                }
            },
        );

        tracing::info!("Background tasks registered: {}", tasks.len());
        tasks
    }
}
