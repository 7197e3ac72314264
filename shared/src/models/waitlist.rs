//! Waitlist Model (候位)

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::serde_helpers::hhmm;
use super::slot::Slot;

/// Waitlist entry status - PROMOTED / EXPIRED 为终态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitlistStatus {
    Waiting,
    Promoted,
    Expired,
}

impl WaitlistStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Waiting)
    }
}

/// Waitlist entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    pub id: i64,
    pub guest_name: String,
    /// 无邮箱也可转正，但无法通知
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub party_size: u32,
    pub status: WaitlistStatus,
    pub notes: Option<String>,
    /// 转正后生成的预订 ID
    pub linked_reservation_id: Option<i64>,
    /// FIFO 排序依据
    pub created_at: i64,
    pub promoted_at: Option<i64>,
    pub updated_at: i64,
}

impl WaitlistEntry {
    pub fn slot(&self) -> Slot {
        Slot::new(self.date, self.time)
    }

    pub fn is_waiting(&self) -> bool {
        self.status == WaitlistStatus::Waiting
    }
}
