use super::*;
use crate::booking::test_support::{at, date, reservation, slot, time, waiting};
use crate::history::HistoryStorage;
use crate::utils::time::FixedClock;
use shared::error::ErrorCode;
use shared::models::OperatingHours;
use tokio::sync::mpsc;

mod test_create;
mod test_waitlist;

struct Harness {
    manager: ReservationManager,
    clock: Arc<FixedClock>,
    notifications: mpsc::Receiver<Notification>,
    history: mpsc::Receiver<HistoryRecord>,
}

impl Harness {
    fn drain_notifications(&mut self) -> Vec<Notification> {
        let mut out = Vec::new();
        while let Ok(n) = self.notifications.try_recv() {
            out.push(n);
        }
        out
    }

    fn drain_history(&mut self) -> Vec<HistoryRecord> {
        let mut out = Vec::new();
        while let Ok(r) = self.history.try_recv() {
            out.push(r);
        }
        out
    }

    /// 绕过评估直接写入（构造测试前置状态）
    fn seed_reservation(&self, r: &Reservation) {
        let storage = self.manager.storage();
        let txn = storage.begin_write().unwrap();
        storage.store_reservation_txn(&txn, r).unwrap();
        txn.commit().unwrap();
    }

    fn seed_waiting(&self, e: &WaitlistEntry) {
        let storage = self.manager.storage();
        let txn = storage.begin_write().unwrap();
        storage.store_waitlist_entry_txn(&txn, e).unwrap();
        txn.commit().unwrap();
    }
}

/// 每天 12:00-23:00 营业，其余取默认值
fn open_every_day() -> RestaurantSettings {
    RestaurantSettings {
        operating_hours: (0..7)
            .map(|d| OperatingHours::open(d, time("12:00"), time("23:00")))
            .collect(),
        ..RestaurantSettings::default()
    }
}

/// 派对人数规则全部放宽，只看容量
fn capacity_only() -> RestaurantSettings {
    RestaurantSettings {
        auto_accept_max_party_size: 20,
        require_deposit_min_party_size: 21,
        large_party_min_size: 21,
        ..open_every_day()
    }
}

/// 时钟固定在 2025-12-10 (Wed) 12:00
fn harness_with(settings: RestaurantSettings) -> Harness {
    let storage = BookingStorage::open_in_memory().unwrap();
    let provider = SettingsProvider::new(storage.clone(), "default");
    provider.put(settings).unwrap();

    let clock = Arc::new(FixedClock::new(at("2025-12-10", "12:00")));
    let (notifications, notify_rx) = NotificationService::new(64);
    let history_storage = HistoryStorage::new(storage.database()).unwrap();
    let (history, history_rx) = HistoryService::new(history_storage, 64);

    let manager = ReservationManager::new(storage, provider, clock.clone(), notifications, history);
    Harness {
        manager,
        clock,
        notifications: notify_rx,
        history: history_rx,
    }
}

fn harness() -> Harness {
    harness_with(open_every_day())
}

fn request(name: &str, d: &str, t: &str, party_size: u32) -> ReservationCreate {
    ReservationCreate {
        guest_name: name.to_string(),
        guest_email: Some(format!("{}@example.com", name.to_lowercase())),
        guest_phone: None,
        date: d.to_string(),
        time: t.to_string(),
        party_size,
        source: None,
        notes: None,
    }
}

fn create_reservation(h: &Harness, name: &str, d: &str, t: &str, party_size: u32) -> Reservation {
    match h.manager.create(request(name, d, t, party_size), HistoryActor::Guest).unwrap() {
        CreateOutcome::Reservation { reservation, .. } => reservation,
        other => panic!("expected a reservation, got {:?}", other.decision()),
    }
}

fn app_code(err: ManagerError) -> ErrorCode {
    AppError::from(err).code
}
