//! History storage (redb, append-only)
//!
//! | Table | Key | Value |
//! |-------|-----|-------|
//! | `history` | `seq` | `HistoryEntry` (JSON) |
//! | `history_by_reservation` | `(reservation_id, seq)` | `()` |
//! | `history_by_waitlist` | `(entry_id, seq)` | `()` |

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use std::sync::Arc;

use super::types::{HistoryEntry, HistoryRecord};
use crate::booking::storage::StorageResult;

const HISTORY_TABLE: TableDefinition<u64, &[u8]> = TableDefinition::new("history");

const HISTORY_BY_RESERVATION_TABLE: TableDefinition<(i64, u64), ()> =
    TableDefinition::new("history_by_reservation");

const HISTORY_BY_WAITLIST_TABLE: TableDefinition<(i64, u64), ()> =
    TableDefinition::new("history_by_waitlist");

#[derive(Clone)]
pub struct HistoryStorage {
    db: Arc<Database>,
}

impl HistoryStorage {
    /// 与预订数据共用同一个 redb 文件
    pub fn new(db: Arc<Database>) -> StorageResult<Self> {
        let txn = db.begin_write()?;
        {
            let _ = txn.open_table(HISTORY_TABLE)?;
            let _ = txn.open_table(HISTORY_BY_RESERVATION_TABLE)?;
            let _ = txn.open_table(HISTORY_BY_WAITLIST_TABLE)?;
        }
        txn.commit()?;
        Ok(Self { db })
    }

    /// 追加一条记录，返回分配了序号的条目
    pub fn append(&self, record: HistoryRecord, timestamp: i64) -> StorageResult<HistoryEntry> {
        let txn = self.db.begin_write()?;
        let entry = {
            let mut table = txn.open_table(HISTORY_TABLE)?;
            let id = table.last()?.map(|(k, _)| k.value()).unwrap_or(0) + 1;
            let entry = HistoryEntry::from_record(id, timestamp, record);
            let value = serde_json::to_vec(&entry)?;
            table.insert(id, value.as_slice())?;
            entry
        };
        if let Some(reservation_id) = entry.reservation_id {
            let mut index = txn.open_table(HISTORY_BY_RESERVATION_TABLE)?;
            index.insert((reservation_id, entry.id), ())?;
        }
        if let Some(entry_id) = entry.waitlist_entry_id {
            let mut index = txn.open_table(HISTORY_BY_WAITLIST_TABLE)?;
            index.insert((entry_id, entry.id), ())?;
        }
        txn.commit()?;
        Ok(entry)
    }

    fn load(
        &self,
        index: TableDefinition<(i64, u64), ()>,
        owner_id: i64,
    ) -> StorageResult<Vec<HistoryEntry>> {
        let read_txn = self.db.begin_read()?;
        let index = read_txn.open_table(index)?;
        let table = read_txn.open_table(HISTORY_TABLE)?;

        let mut entries = Vec::new();
        for result in index.range((owner_id, 0u64)..=(owner_id, u64::MAX))? {
            let (key, _) = result?;
            let seq = key.value().1;
            if let Some(value) = table.get(seq)? {
                entries.push(serde_json::from_slice::<HistoryEntry>(value.value())?);
            }
        }
        Ok(entries)
    }

    /// 某预订的全部历史，按发生顺序
    pub fn query_reservation(&self, reservation_id: i64) -> StorageResult<Vec<HistoryEntry>> {
        self.load(HISTORY_BY_RESERVATION_TABLE, reservation_id)
    }

    /// 某候位条目的全部历史，按发生顺序
    pub fn query_waitlist_entry(&self, entry_id: i64) -> StorageResult<Vec<HistoryEntry>> {
        self.load(HISTORY_BY_WAITLIST_TABLE, entry_id)
    }

    /// 最近 `limit` 条，新的在前
    pub fn recent(&self, limit: usize) -> StorageResult<Vec<HistoryEntry>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(HISTORY_TABLE)?;

        let mut entries = Vec::with_capacity(limit);
        for result in table.iter()?.rev().take(limit) {
            let (_key, value) = result?;
            entries.push(serde_json::from_slice::<HistoryEntry>(value.value())?);
        }
        Ok(entries)
    }
}
