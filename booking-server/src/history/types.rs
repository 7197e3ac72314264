//! 历史记录类型

use serde::{Deserialize, Serialize};
use std::fmt;

/// 谁触发了变更
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryActor {
    Guest,
    Staff,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ChangeType {
    Created,
    Confirmed,
    Updated,
    StatusChanged,
    Cancelled,
    Waitlisted,
    Promoted,
    Expired,
}

impl fmt::Display for ChangeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ChangeType::Created => "created",
            ChangeType::Confirmed => "confirmed",
            ChangeType::Updated => "updated",
            ChangeType::StatusChanged => "status_changed",
            ChangeType::Cancelled => "cancelled",
            ChangeType::Waitlisted => "waitlisted",
            ChangeType::Promoted => "promoted",
            ChangeType::Expired => "expired",
        };
        f.write_str(s)
    }
}

/// 发送到 HistoryService 的记录请求
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub reservation_id: Option<i64>,
    pub waitlist_entry_id: Option<i64>,
    pub actor: HistoryActor,
    pub change_type: ChangeType,
    pub before: Option<serde_json::Value>,
    pub after: Option<serde_json::Value>,
    pub note: Option<String>,
}

impl HistoryRecord {
    pub fn reservation(reservation_id: i64, actor: HistoryActor, change_type: ChangeType) -> Self {
        Self {
            reservation_id: Some(reservation_id),
            waitlist_entry_id: None,
            actor,
            change_type,
            before: None,
            after: None,
            note: None,
        }
    }

    pub fn waitlist(entry_id: i64, actor: HistoryActor, change_type: ChangeType) -> Self {
        Self {
            reservation_id: None,
            waitlist_entry_id: Some(entry_id),
            actor,
            change_type,
            before: None,
            after: None,
            note: None,
        }
    }

    pub fn with_before<T: Serialize>(mut self, before: &T) -> Self {
        self.before = serde_json::to_value(before).ok();
        self
    }

    pub fn with_after<T: Serialize>(mut self, after: &T) -> Self {
        self.after = serde_json::to_value(after).ok();
        self
    }

    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// 已持久化的历史记录
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    /// 单调递增序号
    pub id: u64,
    /// Unix millis
    pub timestamp: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waitlist_entry_id: Option<i64>,
    pub actor: HistoryActor,
    pub change_type: ChangeType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub before: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub after: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl HistoryEntry {
    pub fn from_record(id: u64, timestamp: i64, record: HistoryRecord) -> Self {
        Self {
            id,
            timestamp,
            reservation_id: record.reservation_id,
            waitlist_entry_id: record.waitlist_entry_id,
            actor: record.actor,
            change_type: record.change_type,
            before: record.before,
            after: record.after,
            note: record.note,
        }
    }
}
