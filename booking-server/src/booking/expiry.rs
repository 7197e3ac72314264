//! 候位过期调度器
//!
//! 启动时先补扫一次（停机期间错过的日切），之后每天本地 00:01
//! 把日期已过的 WAITING 候位标记为 EXPIRED。

use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use super::manager::ReservationManager;
use crate::utils::time::{Clock, duration_until_next_sweep};

pub struct WaitlistExpiryScheduler {
    manager: ReservationManager,
    clock: Arc<dyn Clock>,
    shutdown: CancellationToken,
}

impl WaitlistExpiryScheduler {
    pub fn new(
        manager: ReservationManager,
        clock: Arc<dyn Clock>,
        shutdown: CancellationToken,
    ) -> Self {
        Self {
            manager,
            clock,
            shutdown,
        }
    }

    /// 主循环（直到 shutdown）
    pub async fn run(self) {
        tracing::info!("Waitlist expiry scheduler started");

        // 1. 启动补扫
        self.sweep();

        // 2. 每日定时
        self.periodic_loop().await;

        tracing::info!("Waitlist expiry scheduler stopped");
    }

    async fn periodic_loop(&self) {
        loop {
            let sleep_duration = duration_until_next_sweep(self.clock.now_local());
            tracing::debug!(
                "Next waitlist sweep in {} minutes",
                sleep_duration.as_secs() / 60
            );

            tokio::select! {
                _ = self.shutdown.cancelled() => {
                    tracing::info!("Waitlist expiry scheduler received shutdown signal");
                    return;
                }
                _ = tokio::time::sleep(sleep_duration) => {}
            }

            self.sweep();
        }
    }

    fn sweep(&self) -> usize {
        match self.manager.expire_old_entries() {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Waitlist expiry sweep failed");
                0
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::settings::SettingsProvider;
    use crate::booking::storage::BookingStorage;
    use crate::booking::test_support::{at, waiting};
    use crate::history::{HistoryService, HistoryStorage};
    use crate::notify::NotificationService;
    use crate::utils::time::FixedClock;
    use shared::models::{RestaurantSettings, WaitlistStatus};

    fn manager_at(clock: Arc<FixedClock>) -> ReservationManager {
        let storage = BookingStorage::open_in_memory().unwrap();
        let settings = SettingsProvider::new(storage.clone(), "default");
        settings.put(RestaurantSettings::default()).unwrap();
        let (notifications, _) = NotificationService::new(8);
        let history_storage = HistoryStorage::new(storage.database()).unwrap();
        let (history, _) = HistoryService::new(history_storage, 8);
        ReservationManager::new(storage, settings, clock, notifications, history)
    }

    fn seed(manager: &ReservationManager, entries: &[shared::models::WaitlistEntry]) {
        let storage = manager.storage();
        let txn = storage.begin_write().unwrap();
        for e in entries {
            storage.store_waitlist_entry_txn(&txn, e).unwrap();
        }
        txn.commit().unwrap();
    }

    #[tokio::test]
    async fn test_startup_sweep_then_shutdown() {
        let clock = Arc::new(FixedClock::new(at("2025-12-10", "09:00")));
        let manager = manager_at(clock.clone());
        seed(
            &manager,
            &[
                waiting(1, "2025-12-09", "20:00", 2, 1),
                waiting(2, "2025-12-10", "20:00", 2, 2),
            ],
        );

        let shutdown = CancellationToken::new();
        shutdown.cancel();
        WaitlistExpiryScheduler::new(manager.clone(), clock, shutdown)
            .run()
            .await;

        assert_eq!(
            manager.get_waitlist_entry(1).unwrap().status,
            WaitlistStatus::Expired
        );
        // 今天的候位不受影响
        assert_eq!(
            manager.get_waitlist_entry(2).unwrap().status,
            WaitlistStatus::Waiting
        );
    }

    #[tokio::test]
    async fn test_sweep_is_idempotent() {
        let clock = Arc::new(FixedClock::new(at("2025-12-12", "00:01")));
        let manager = manager_at(clock.clone());
        seed(&manager, &[waiting(1, "2025-12-11", "19:00", 4, 1)]);

        let scheduler =
            WaitlistExpiryScheduler::new(manager.clone(), clock, CancellationToken::new());
        assert_eq!(scheduler.sweep(), 1);
        assert_eq!(scheduler.sweep(), 0);
    }
}
