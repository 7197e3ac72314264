//! Waitlist promotion
//!
//! 某精确时段释放座位后，按 FIFO 挑选第一个放得下的候位。
//! 放不下的较早候位被跳过但保持 WAITING，以后的释放仍会先检查它。

use serde::Serialize;
use shared::models::{Reservation, WaitlistEntry};

/// 一次转正尝试的结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromotionOutcome {
    pub promoted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation: Option<Reservation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waitlist_entry: Option<WaitlistEntry>,
}

impl PromotionOutcome {
    pub fn none() -> Self {
        Self {
            promoted: false,
            reservation: None,
            waitlist_entry: None,
        }
    }

    pub fn promoted(reservation: Reservation, entry: WaitlistEntry) -> Self {
        Self {
            promoted: true,
            reservation: Some(reservation),
            waitlist_entry: Some(entry),
        }
    }
}

/// 可用人数；已超额时为 0
pub fn available_covers(current_covers: u32, max_covers: u32) -> u32 {
    max_covers.saturating_sub(current_covers)
}

/// 选出第一个能放下的 WAITING 候位
///
/// 顺序为 `(created_at, id)` 升序，与入参顺序无关。
pub fn select_candidate(
    waiting: &[WaitlistEntry],
    current_covers: u32,
    max_covers: u32,
) -> Option<&WaitlistEntry> {
    let available = available_covers(current_covers, max_covers);
    if available == 0 {
        return None;
    }

    let mut ordered: Vec<&WaitlistEntry> = waiting.iter().filter(|e| e.is_waiting()).collect();
    ordered.sort_by_key(|e| (e.created_at, e.id));
    ordered.into_iter().find(|e| e.party_size <= available)
}
