//! 通知后台 Worker

use std::sync::Arc;
use tokio::sync::mpsc;

use super::Notifier;
use super::types::Notification;

pub struct NotificationWorker {
    notifier: Arc<dyn Notifier>,
}

impl NotificationWorker {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self { notifier }
    }

    /// 运行 worker（直到通道关闭）；投递失败只记录
    pub async fn run(self, mut rx: mpsc::Receiver<Notification>) {
        tracing::info!("Notification worker started");

        while let Some(notification) = rx.recv().await {
            if let Err(e) = self.notifier.send(&notification).await {
                tracing::warn!(
                    kind = ?notification.kind,
                    recipient = %notification.recipient,
                    error = %e,
                    "Failed to deliver notification"
                );
            }
        }

        tracing::info!("Notification channel closed, worker stopping");
    }
}
