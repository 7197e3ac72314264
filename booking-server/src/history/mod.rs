//! 预订变更历史
//!
//! ```text
//! ReservationManager (commit 之后)
//!   └─ HistoryService::log() → mpsc → HistoryWorker → redb (history 表)
//! ```
//!
//! 只追加，不参与任何决策。通道满或关闭时记录 warn 并丢弃，
//! 不影响触发它的状态变更。

pub mod service;
pub mod storage;
pub mod types;
pub mod worker;

pub use service::HistoryService;
pub use storage::HistoryStorage;
pub use types::{ChangeType, HistoryActor, HistoryEntry, HistoryRecord};
pub use worker::HistoryWorker;
