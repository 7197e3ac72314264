//! 通知服务（非阻塞入队）

use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

use super::types::Notification;

#[derive(Debug, Clone)]
pub struct NotificationService {
    tx: mpsc::Sender<Notification>,
}

impl NotificationService {
    pub fn new(buffer_size: usize) -> (Self, mpsc::Receiver<Notification>) {
        let (tx, rx) = mpsc::channel(buffer_size);
        (Self { tx }, rx)
    }

    /// 入队；`None`（客人无邮箱）直接忽略
    pub fn notify(&self, notification: Option<Notification>) {
        let Some(notification) = notification else {
            return;
        };
        match self.tx.try_send(notification) {
            Ok(()) => {}
            Err(TrySendError::Full(n)) => {
                tracing::warn!(kind = ?n.kind, recipient = %n.recipient, "Notification channel full, message dropped");
            }
            Err(TrySendError::Closed(n)) => {
                tracing::warn!(kind = ?n.kind, recipient = %n.recipient, "Notification channel closed, message dropped");
            }
        }
    }
}
