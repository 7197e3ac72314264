//! 客人通知
//!
//! ```text
//! ReservationManager (commit 之后)
//!   └─ NotificationService::notify() → mpsc → NotificationWorker → dyn Notifier
//! ```
//!
//! 通知是 fire-and-forget：发送失败只记录日志，绝不回滚或阻塞状态变更。

pub mod service;
pub mod types;
pub mod worker;

pub use service::NotificationService;
pub use types::{Notification, NotificationKind, NotificationPayload};
pub use worker::NotificationWorker;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    #[error("Delivery failed: {0}")]
    Delivery(String),
}

/// 通知投递（邮件、短信等由外部实现）
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError>;
}

/// 默认实现：写日志
#[derive(Debug, Default, Clone)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        let recipient = notification.recipient.trim();
        if recipient.is_empty() || !recipient.contains('@') {
            return Err(NotifyError::InvalidRecipient(notification.recipient.clone()));
        }
        tracing::info!(
            kind = ?notification.kind,
            recipient = %notification.recipient,
            subject = %notification.subject(),
            reservation_id = ?notification.payload.reservation_id,
            waitlist_entry_id = ?notification.payload.waitlist_entry_id,
            "Guest notification"
        );
        Ok(())
    }
}
