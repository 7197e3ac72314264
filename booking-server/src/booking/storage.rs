//! redb-based storage for reservations, waitlist entries and settings
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `reservations` | `id` | `Reservation` (JSON) | Reservation records |
//! | `reservations_by_date` | `(date, id)` | `()` | Per-day index |
//! | `cancel_tokens` | `token` | `id` | Guest self-service lookup |
//! | `waitlist` | `id` | `WaitlistEntry` (JSON) | Waitlist records |
//! | `waitlist_by_date` | `(date, id)` | `()` | Per-day index |
//! | `waiting` | `(date, id)` | `()` | WAITING entries only |
//! | `settings` | `restaurant_id` | `RestaurantSettings` (JSON) | Settings singleton |
//! | `counters` | name | `u64` | Id sequences |
//!
//! # Concurrency
//!
//! redb 同一时间只允许一个写事务。准入评估、候位转正都在同一个写事务里
//! 完成「读快照 → 决策 → 写入」，两个并发请求不可能基于同一份快照各自确认。
//!
//! `_txn` 后缀的方法在调用方提供的写事务中执行；其余方法各自开启只读事务。

use chrono::NaiveDate;
use redb::{
    AccessGuard, Database, ReadableDatabase, ReadableTable, ReadableTableMetadata,
    TableDefinition, WriteTransaction,
};
use serde::de::DeserializeOwned;
use shared::models::{Reservation, RestaurantSettings, Slot, WaitlistEntry, WaitlistStatus};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

const RESERVATIONS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("reservations");

const RESERVATIONS_BY_DATE_TABLE: TableDefinition<(&str, i64), ()> =
    TableDefinition::new("reservations_by_date");

const CANCEL_TOKENS_TABLE: TableDefinition<&str, i64> = TableDefinition::new("cancel_tokens");

const WAITLIST_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("waitlist");

const WAITLIST_BY_DATE_TABLE: TableDefinition<(&str, i64), ()> =
    TableDefinition::new("waitlist_by_date");

/// Only WAITING entries; removed on promotion / expiry
const WAITING_TABLE: TableDefinition<(&str, i64), ()> = TableDefinition::new("waiting");

const SETTINGS_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("settings");

const COUNTERS_TABLE: TableDefinition<&str, u64> = TableDefinition::new("counters");

pub const RESERVATION_SEQ: &str = "reservation_id";
pub const WAITLIST_SEQ: &str = "waitlist_id";

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

fn decode<T: DeserializeOwned>(guard: Option<AccessGuard<'_, &'static [u8]>>) -> StorageResult<Option<T>> {
    match guard {
        Some(g) => Ok(Some(serde_json::from_slice(g.value())?)),
        None => Ok(None),
    }
}

fn collect_ids(range: redb::Range<'_, (&'static str, i64), ()>) -> StorageResult<Vec<i64>> {
    let mut ids = Vec::new();
    for result in range {
        let (key, _) = result?;
        ids.push(key.value().1);
    }
    Ok(ids)
}

fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Booking storage backed by redb
#[derive(Clone)]
pub struct BookingStorage {
    db: Arc<Database>,
}

impl BookingStorage {
    /// Open or create the database at the given path
    ///
    /// redb 默认 `Durability::Immediate`：`commit()` 返回即已落盘。
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Open an in-memory database (tests / ephemeral runs)
    pub fn open_in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(RESERVATIONS_TABLE)?;
            let _ = write_txn.open_table(RESERVATIONS_BY_DATE_TABLE)?;
            let _ = write_txn.open_table(CANCEL_TOKENS_TABLE)?;
            let _ = write_txn.open_table(WAITLIST_TABLE)?;
            let _ = write_txn.open_table(WAITLIST_BY_DATE_TABLE)?;
            let _ = write_txn.open_table(WAITING_TABLE)?;
            let _ = write_txn.open_table(SETTINGS_TABLE)?;
            let _ = write_txn.open_table(COUNTERS_TABLE)?;
        }
        write_txn.commit()?;

        Ok(Self { db: Arc::new(db) })
    }

    /// Shared handle (history storage lives in the same file)
    pub fn database(&self) -> Arc<Database> {
        self.db.clone()
    }

    /// Begin a write transaction
    pub fn begin_write(&self) -> StorageResult<WriteTransaction> {
        Ok(self.db.begin_write()?)
    }

    // ========== Counters ==========

    /// Increment and return the named sequence
    pub fn next_id_txn(&self, txn: &WriteTransaction, name: &str) -> StorageResult<i64> {
        let mut table = txn.open_table(COUNTERS_TABLE)?;
        let current = table.get(name)?.map(|g| g.value()).unwrap_or(0);
        let next = current + 1;
        table.insert(name, next)?;
        Ok(next as i64)
    }

    // ========== Settings ==========

    pub fn get_settings(&self, restaurant_id: &str) -> StorageResult<Option<RestaurantSettings>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(SETTINGS_TABLE)?;
        decode(table.get(restaurant_id)?)
    }

    pub fn get_settings_txn(
        &self,
        txn: &WriteTransaction,
        restaurant_id: &str,
    ) -> StorageResult<Option<RestaurantSettings>> {
        let table = txn.open_table(SETTINGS_TABLE)?;
        decode(table.get(restaurant_id)?)
    }

    pub fn put_settings_txn(
        &self,
        txn: &WriteTransaction,
        settings: &RestaurantSettings,
    ) -> StorageResult<()> {
        let mut table = txn.open_table(SETTINGS_TABLE)?;
        let value = serde_json::to_vec(settings)?;
        table.insert(settings.restaurant_id.as_str(), value.as_slice())?;
        Ok(())
    }

    // ========== Reservations ==========

    /// Insert or replace a reservation, keeping both indexes in sync
    pub fn store_reservation_txn(
        &self,
        txn: &WriteTransaction,
        reservation: &Reservation,
    ) -> StorageResult<()> {
        let previous: Option<Reservation> = {
            let mut table = txn.open_table(RESERVATIONS_TABLE)?;
            let previous = decode(table.get(reservation.id)?)?;
            let value = serde_json::to_vec(reservation)?;
            table.insert(reservation.id, value.as_slice())?;
            previous
        };

        let mut by_date = txn.open_table(RESERVATIONS_BY_DATE_TABLE)?;
        if let Some(prev) = previous.as_ref().filter(|p| p.date != reservation.date) {
            by_date.remove((date_key(prev.date).as_str(), prev.id))?;
        }
        by_date.insert((date_key(reservation.date).as_str(), reservation.id), ())?;

        let mut tokens = txn.open_table(CANCEL_TOKENS_TABLE)?;
        tokens.insert(reservation.cancel_token.as_str(), reservation.id)?;
        Ok(())
    }

    pub fn get_reservation_txn(
        &self,
        txn: &WriteTransaction,
        id: i64,
    ) -> StorageResult<Option<Reservation>> {
        let table = txn.open_table(RESERVATIONS_TABLE)?;
        decode(table.get(id)?)
    }

    pub fn get_reservation(&self, id: i64) -> StorageResult<Option<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;
        decode(table.get(id)?)
    }

    pub fn token_exists_txn(&self, txn: &WriteTransaction, token: &str) -> StorageResult<bool> {
        let table = txn.open_table(CANCEL_TOKENS_TABLE)?;
        Ok(table.get(token)?.is_some())
    }

    pub fn get_reservation_by_token_txn(
        &self,
        txn: &WriteTransaction,
        token: &str,
    ) -> StorageResult<Option<Reservation>> {
        let id = {
            let tokens = txn.open_table(CANCEL_TOKENS_TABLE)?;
            tokens.get(token)?.map(|g| g.value())
        };
        match id {
            Some(id) => self.get_reservation_txn(txn, id),
            None => Ok(None),
        }
    }

    pub fn get_reservation_by_token(&self, token: &str) -> StorageResult<Option<Reservation>> {
        let read_txn = self.db.begin_read()?;
        let tokens = read_txn.open_table(CANCEL_TOKENS_TABLE)?;
        let Some(id) = tokens.get(token)?.map(|g| g.value()) else {
            return Ok(None);
        };
        let table = read_txn.open_table(RESERVATIONS_TABLE)?;
        decode(table.get(id)?)
    }

    /// All reservations on `date`, any status, ordered by (time, id)
    pub fn find_by_date_txn(
        &self,
        txn: &WriteTransaction,
        date: NaiveDate,
    ) -> StorageResult<Vec<Reservation>> {
        let key = date_key(date);
        let ids = {
            let index = txn.open_table(RESERVATIONS_BY_DATE_TABLE)?;
            collect_ids(index.range((key.as_str(), i64::MIN)..=(key.as_str(), i64::MAX))?)?
        };

        let table = txn.open_table(RESERVATIONS_TABLE)?;
        let mut reservations = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(r) = decode::<Reservation>(table.get(id)?)? {
                reservations.push(r);
            }
        }
        reservations.sort_by_key(|r| (r.time, r.id));
        Ok(reservations)
    }

    /// CONFIRMED reservations on `date` (capacity snapshot input)
    pub fn find_confirmed_by_date_txn(
        &self,
        txn: &WriteTransaction,
        date: NaiveDate,
    ) -> StorageResult<Vec<Reservation>> {
        let mut reservations = self.find_by_date_txn(txn, date)?;
        reservations.retain(Reservation::holds_capacity);
        Ok(reservations)
    }

    pub fn list_reservations_by_date(&self, date: NaiveDate) -> StorageResult<Vec<Reservation>> {
        let key = date_key(date);
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(RESERVATIONS_BY_DATE_TABLE)?;
        let ids = collect_ids(index.range((key.as_str(), i64::MIN)..=(key.as_str(), i64::MAX))?)?;

        let table = read_txn.open_table(RESERVATIONS_TABLE)?;
        let mut reservations = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(r) = decode::<Reservation>(table.get(id)?)? {
                reservations.push(r);
            }
        }
        reservations.sort_by_key(|r| (r.time, r.id));
        Ok(reservations)
    }

    // ========== Waitlist ==========

    /// Insert or replace a waitlist entry; the `waiting` index follows its status
    pub fn store_waitlist_entry_txn(
        &self,
        txn: &WriteTransaction,
        entry: &WaitlistEntry,
    ) -> StorageResult<()> {
        {
            let mut table = txn.open_table(WAITLIST_TABLE)?;
            let value = serde_json::to_vec(entry)?;
            table.insert(entry.id, value.as_slice())?;
        }

        let key = date_key(entry.date);
        let mut by_date = txn.open_table(WAITLIST_BY_DATE_TABLE)?;
        by_date.insert((key.as_str(), entry.id), ())?;

        let mut waiting = txn.open_table(WAITING_TABLE)?;
        if entry.status == WaitlistStatus::Waiting {
            waiting.insert((key.as_str(), entry.id), ())?;
        } else {
            waiting.remove((key.as_str(), entry.id))?;
        }
        Ok(())
    }

    pub fn get_waitlist_entry(&self, id: i64) -> StorageResult<Option<WaitlistEntry>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WAITLIST_TABLE)?;
        decode(table.get(id)?)
    }

    fn load_waitlist_txn(
        &self,
        txn: &WriteTransaction,
        ids: Vec<i64>,
    ) -> StorageResult<Vec<WaitlistEntry>> {
        let table = txn.open_table(WAITLIST_TABLE)?;
        let mut entries = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(e) = decode::<WaitlistEntry>(table.get(id)?)? {
                entries.push(e);
            }
        }
        entries.sort_by_key(|e| (e.created_at, e.id));
        Ok(entries)
    }

    /// WAITING entries for exactly `slot`, FIFO ordered by (created_at, id)
    pub fn find_waiting_txn(
        &self,
        txn: &WriteTransaction,
        slot: Slot,
    ) -> StorageResult<Vec<WaitlistEntry>> {
        let key = date_key(slot.date);
        let ids = {
            let waiting = txn.open_table(WAITING_TABLE)?;
            collect_ids(waiting.range((key.as_str(), i64::MIN)..=(key.as_str(), i64::MAX))?)?
        };
        let mut entries = self.load_waitlist_txn(txn, ids)?;
        entries.retain(|e| e.is_waiting() && e.slot() == slot);
        Ok(entries)
    }

    /// WAITING entries dated strictly before `date`
    pub fn find_waiting_before_txn(
        &self,
        txn: &WriteTransaction,
        date: NaiveDate,
    ) -> StorageResult<Vec<WaitlistEntry>> {
        let key = date_key(date);
        let ids = {
            let waiting = txn.open_table(WAITING_TABLE)?;
            collect_ids(waiting.range(..(key.as_str(), i64::MIN))?)?
        };
        let mut entries = self.load_waitlist_txn(txn, ids)?;
        entries.retain(|e| e.is_waiting() && e.date < date);
        Ok(entries)
    }

    /// Waitlist entries (any status), optionally restricted to one date
    pub fn list_waitlist(&self, date: Option<NaiveDate>) -> StorageResult<Vec<WaitlistEntry>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(WAITLIST_TABLE)?;

        let mut entries = Vec::new();
        match date {
            Some(date) => {
                let key = date_key(date);
                let index = read_txn.open_table(WAITLIST_BY_DATE_TABLE)?;
                let ids =
                    collect_ids(index.range((key.as_str(), i64::MIN)..=(key.as_str(), i64::MAX))?)?;
                for id in ids {
                    if let Some(e) = decode::<WaitlistEntry>(table.get(id)?)? {
                        entries.push(e);
                    }
                }
            }
            None => {
                for result in table.iter()? {
                    let (_key, value) = result?;
                    entries.push(serde_json::from_slice::<WaitlistEntry>(value.value())?);
                }
            }
        }

        entries.sort_by_key(|e| (e.date, e.time, e.created_at, e.id));
        Ok(entries)
    }

    // ========== Statistics ==========

    pub fn get_stats(&self) -> StorageResult<StorageStats> {
        let read_txn = self.db.begin_read()?;
        let reservations = read_txn.open_table(RESERVATIONS_TABLE)?;
        let waitlist = read_txn.open_table(WAITLIST_TABLE)?;
        let waiting = read_txn.open_table(WAITING_TABLE)?;

        Ok(StorageStats {
            reservation_count: reservations.len()?,
            waitlist_count: waitlist.len()?,
            waiting_count: waiting.len()?,
        })
    }
}

/// Storage statistics
#[derive(Debug, Clone)]
pub struct StorageStats {
    pub reservation_count: u64,
    pub waitlist_count: u64,
    pub waiting_count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::test_support::{date, reservation, slot, waiting};
    use shared::models::ReservationStatus;

    #[test]
    fn test_counters_increment() {
        let storage = BookingStorage::open_in_memory().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_id_txn(&txn, RESERVATION_SEQ).unwrap(), 1);
        assert_eq!(storage.next_id_txn(&txn, RESERVATION_SEQ).unwrap(), 2);
        assert_eq!(storage.next_id_txn(&txn, WAITLIST_SEQ).unwrap(), 1);
        txn.commit().unwrap();

        let txn = storage.begin_write().unwrap();
        assert_eq!(storage.next_id_txn(&txn, RESERVATION_SEQ).unwrap(), 3);
    }

    #[test]
    fn test_reservation_roundtrip_and_token_lookup() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let r = reservation(1, "2025-12-15", "19:00", 4, ReservationStatus::Confirmed);

        let txn = storage.begin_write().unwrap();
        storage.store_reservation_txn(&txn, &r).unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.get_reservation(1).unwrap(), Some(r.clone()));
        assert_eq!(storage.get_reservation_by_token("token-1").unwrap(), Some(r));
        assert_eq!(storage.get_reservation_by_token("nope").unwrap(), None);
        assert_eq!(storage.get_reservation(2).unwrap(), None);
    }

    #[test]
    fn test_date_index_moves_with_reservation() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let mut r = reservation(1, "2025-12-15", "19:00", 4, ReservationStatus::Pending);

        let txn = storage.begin_write().unwrap();
        storage.store_reservation_txn(&txn, &r).unwrap();
        txn.commit().unwrap();

        r.date = date("2025-12-16");
        let txn = storage.begin_write().unwrap();
        storage.store_reservation_txn(&txn, &r).unwrap();
        txn.commit().unwrap();

        assert!(storage.list_reservations_by_date(date("2025-12-15")).unwrap().is_empty());
        assert_eq!(storage.list_reservations_by_date(date("2025-12-16")).unwrap(), vec![r]);
    }

    #[test]
    fn test_confirmed_filter_and_ordering() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        for r in [
            reservation(1, "2025-12-15", "20:00", 2, ReservationStatus::Confirmed),
            reservation(2, "2025-12-15", "19:00", 2, ReservationStatus::Confirmed),
            reservation(3, "2025-12-15", "19:00", 2, ReservationStatus::Pending),
            reservation(4, "2025-12-16", "19:00", 2, ReservationStatus::Confirmed),
        ] {
            storage.store_reservation_txn(&txn, &r).unwrap();
        }

        let confirmed = storage.find_confirmed_by_date_txn(&txn, date("2025-12-15")).unwrap();
        let ids: Vec<i64> = confirmed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![2, 1]);

        let all = storage.find_by_date_txn(&txn, date("2025-12-15")).unwrap();
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_waiting_index_follows_status() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let a = waiting(1, "2025-12-15", "19:00", 2, 2_000);
        let b = waiting(2, "2025-12-15", "19:00", 2, 1_000);
        let other_time = waiting(3, "2025-12-15", "20:00", 2, 500);

        let txn = storage.begin_write().unwrap();
        for e in [&a, &b, &other_time] {
            storage.store_waitlist_entry_txn(&txn, e).unwrap();
        }
        let found = storage.find_waiting_txn(&txn, slot("2025-12-15", "19:00")).unwrap();
        let ids: Vec<i64> = found.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![2, 1]);

        let mut promoted = b.clone();
        promoted.status = WaitlistStatus::Promoted;
        storage.store_waitlist_entry_txn(&txn, &promoted).unwrap();
        let found = storage.find_waiting_txn(&txn, slot("2025-12-15", "19:00")).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, 1);
        txn.commit().unwrap();

        // 非 WAITING 条目仍可列出
        assert_eq!(storage.list_waitlist(Some(date("2025-12-15"))).unwrap().len(), 3);
        assert_eq!(storage.get_stats().unwrap().waiting_count, 2);
    }

    #[test]
    fn test_waiting_before_date() {
        let storage = BookingStorage::open_in_memory().unwrap();
        let txn = storage.begin_write().unwrap();
        for e in [
            waiting(1, "2025-12-09", "19:00", 2, 1),
            waiting(2, "2025-12-10", "19:00", 2, 2),
            waiting(3, "2025-11-30", "19:00", 2, 3),
        ] {
            storage.store_waitlist_entry_txn(&txn, &e).unwrap();
        }
        let stale = storage.find_waiting_before_txn(&txn, date("2025-12-10")).unwrap();
        let ids: Vec<i64> = stale.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_settings_roundtrip() {
        let storage = BookingStorage::open_in_memory().unwrap();
        assert!(storage.get_settings("default").unwrap().is_none());

        let settings = RestaurantSettings::default();
        let txn = storage.begin_write().unwrap();
        storage.put_settings_txn(&txn, &settings).unwrap();
        txn.commit().unwrap();

        assert_eq!(storage.get_settings("default").unwrap(), Some(settings));
    }
}
