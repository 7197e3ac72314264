//! 通知类型

use serde::{Deserialize, Serialize};
use shared::models::{Reservation, WaitlistEntry};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Confirmation,
    Pending,
    Waitlisted,
    Promoted,
    Updated,
    Cancelled,
}

/// 模板渲染所需的数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    pub guest_name: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    pub party_size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reservation_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub waitlist_entry_id: Option<i64>,
    /// 客人自助修改/取消链接凭证
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub kind: NotificationKind,
    pub recipient: String,
    pub payload: NotificationPayload,
}

impl Notification {
    /// 没有邮箱的客人不发送（返回 `None`）
    pub fn for_reservation(
        kind: NotificationKind,
        reservation: &Reservation,
        reason: Option<String>,
    ) -> Option<Self> {
        let recipient = reservation.guest_email.clone()?;
        let slot = reservation.slot();
        Some(Self {
            kind,
            recipient,
            payload: NotificationPayload {
                guest_name: reservation.guest_name.clone(),
                date: slot.date_key(),
                time: slot.time_key(),
                party_size: reservation.party_size,
                reservation_id: Some(reservation.id),
                waitlist_entry_id: None,
                cancel_token: Some(reservation.cancel_token.clone()),
                reason,
            },
        })
    }

    pub fn for_waitlist(entry: &WaitlistEntry, reason: Option<String>) -> Option<Self> {
        let recipient = entry.guest_email.clone()?;
        let slot = entry.slot();
        Some(Self {
            kind: NotificationKind::Waitlisted,
            recipient,
            payload: NotificationPayload {
                guest_name: entry.guest_name.clone(),
                date: slot.date_key(),
                time: slot.time_key(),
                party_size: entry.party_size,
                reservation_id: None,
                waitlist_entry_id: Some(entry.id),
                cancel_token: None,
                reason,
            },
        })
    }

    pub fn for_promotion(entry: &WaitlistEntry, reservation: &Reservation) -> Option<Self> {
        let mut notification =
            Self::for_reservation(NotificationKind::Promoted, reservation, None)?;
        notification.payload.waitlist_entry_id = Some(entry.id);
        Some(notification)
    }

    pub fn subject(&self) -> &'static str {
        match self.kind {
            NotificationKind::Confirmation => "Your reservation is confirmed",
            NotificationKind::Pending => "We received your reservation request",
            NotificationKind::Waitlisted => "You are on the waitlist",
            NotificationKind::Promoted => "Good news: a table opened up",
            NotificationKind::Updated => "Your reservation was updated",
            NotificationKind::Cancelled => "Your reservation was cancelled",
        }
    }
}
