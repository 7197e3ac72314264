//! 历史记录服务
//!
//! 写入通过 mpsc 通道交给 [`HistoryWorker`](super::HistoryWorker)；
//! 查询直接读 storage。

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::storage::HistoryStorage;
use super::types::{HistoryEntry, HistoryRecord};
use crate::booking::storage::StorageResult;

#[derive(Clone)]
pub struct HistoryService {
    storage: HistoryStorage,
    tx: mpsc::Sender<HistoryRecord>,
}

impl std::fmt::Debug for HistoryService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HistoryService")
            .field("capacity", &self.tx.capacity())
            .finish_non_exhaustive()
    }
}

impl HistoryService {
    pub fn new(storage: HistoryStorage, buffer_size: usize) -> (Self, mpsc::Receiver<HistoryRecord>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (Self { storage, tx }, rx)
    }

    /// 非阻塞写入；通道满或已关闭时丢弃并告警
    pub fn log(&self, record: HistoryRecord) {
        match self.tx.try_send(record) {
            Ok(()) => {}
            Err(TrySendError::Full(record)) => {
                tracing::warn!(
                    reservation_id = ?record.reservation_id,
                    waitlist_entry_id = ?record.waitlist_entry_id,
                    change_type = %record.change_type,
                    "History channel full, entry dropped"
                );
            }
            Err(TrySendError::Closed(record)) => {
                tracing::warn!(
                    reservation_id = ?record.reservation_id,
                    change_type = %record.change_type,
                    "History channel closed, entry dropped"
                );
            }
        }
    }

    pub fn query_reservation(&self, reservation_id: i64) -> StorageResult<Vec<HistoryEntry>> {
        self.storage.query_reservation(reservation_id)
    }

    pub fn query_waitlist_entry(&self, entry_id: i64) -> StorageResult<Vec<HistoryEntry>> {
        self.storage.query_waitlist_entry(entry_id)
    }

    pub fn recent(&self, limit: usize) -> StorageResult<Vec<HistoryEntry>> {
        self.storage.recent(limit)
    }
}
