//! 服务状态 - 存储、设置与生命周期管理器的装配

use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;

use crate::booking::{BookingStorage, ReservationManager, SettingsProvider};
use crate::core::{Config, Result, ServerError};
use crate::history::{HistoryRecord, HistoryService, HistoryStorage};
use crate::notify::{Notification, NotificationService};
use crate::utils::time::{Clock, SystemClock};

/// 后台 worker 的通道接收端（只能被取走一次）
#[derive(Default)]
struct PendingReceivers {
    notifications: Option<mpsc::Receiver<Notification>>,
    history: Option<mpsc::Receiver<HistoryRecord>>,
}

/// 服务状态
///
/// Clone 成本低（内部都是 Arc / 通道句柄）。
#[derive(Clone)]
pub struct ServerState {
    pub config: Config,
    pub storage: BookingStorage,
    pub history_storage: HistoryStorage,
    pub manager: ReservationManager,
    pub clock: Arc<dyn Clock>,
    receivers: Arc<Mutex<PendingReceivers>>,
}

impl std::fmt::Debug for ServerState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerState")
            .field("work_dir", &self.config.work_dir)
            .field("manager", &self.manager)
            .finish_non_exhaustive()
    }
}

impl ServerState {
    /// 初始化服务状态
    ///
    /// 按顺序初始化：
    /// 1. 工作目录
    /// 2. 数据库 (work_dir/booking.redb)
    /// 3. 餐厅设置（缺失时导入 SETTINGS_FILE 或默认值）
    /// 4. 通知 / 历史通道与 ReservationManager
    pub fn initialize(config: &Config) -> Result<Self> {
        config.ensure_work_dir()?;
        let tz = config.timezone()?;

        let db_path = config.database_path();
        let storage = BookingStorage::open(&db_path)?;
        tracing::info!(path = %db_path.display(), "Booking database opened");

        Self::with_storage(config, storage, Arc::new(SystemClock::new(tz)))
    }

    /// 使用已打开的存储与指定时钟装配（测试、回放）
    pub fn with_storage(
        config: &Config,
        storage: BookingStorage,
        clock: Arc<dyn Clock>,
    ) -> Result<Self> {
        let settings = SettingsProvider::new(storage.clone(), config.restaurant_id.clone());
        settings.seed_if_missing(config.settings_file.as_deref().map(Path::new))?;
        // 启动时校验一次，非法设置直接拒绝启动
        settings.get().map_err(|e| {
            ServerError::Config(format!("Invalid restaurant settings: {}", e.message))
        })?;

        let history_storage = HistoryStorage::new(storage.database())?;
        let (notifications, notify_rx) = NotificationService::new(config.notify_buffer);
        let (history, history_rx) = HistoryService::new(history_storage.clone(), config.history_buffer);

        let manager = ReservationManager::new(
            storage.clone(),
            settings,
            clock.clone(),
            notifications,
            history,
        );

        Ok(Self {
            config: config.clone(),
            storage,
            history_storage,
            manager,
            clock,
            receivers: Arc::new(Mutex::new(PendingReceivers {
                notifications: Some(notify_rx),
                history: Some(history_rx),
            })),
        })
    }

    pub fn manager(&self) -> &ReservationManager {
        &self.manager
    }

    /// 取走通知接收端（第二次调用返回 None）
    pub fn take_notification_receiver(&self) -> Option<mpsc::Receiver<Notification>> {
        self.receivers.lock().notifications.take()
    }

    /// 取走历史接收端（第二次调用返回 None）
    pub fn take_history_receiver(&self) -> Option<mpsc::Receiver<HistoryRecord>> {
        self.receivers.lock().history.take()
    }
}
