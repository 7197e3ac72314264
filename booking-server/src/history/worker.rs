//! 历史记录后台 Worker
//!
//! 从 mpsc 通道消费 HistoryRecord，写入 redb。通道关闭时退出。

use tokio::sync::mpsc;

use super::storage::HistoryStorage;
use super::types::HistoryRecord;

pub struct HistoryWorker {
    storage: HistoryStorage,
}

impl HistoryWorker {
    pub fn new(storage: HistoryStorage) -> Self {
        Self { storage }
    }

    /// 运行 worker（直到通道关闭）
    pub async fn run(self, mut rx: mpsc::Receiver<HistoryRecord>) {
        tracing::info!("History worker started");

        while let Some(record) = rx.recv().await {
            match self.storage.append(record, shared::util::now_millis()) {
                Ok(entry) => {
                    tracing::debug!(
                        history_id = entry.id,
                        change_type = %entry.change_type,
                        reservation_id = ?entry.reservation_id,
                        "History entry recorded"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "Failed to write history entry");
                }
            }
        }

        tracing::info!("History channel closed, worker stopping");
    }
}
