//! Server Implementation
//!
//! 启动后台任务，等待退出信号，然后按顺序关闭。

use std::future::Future;
use std::sync::Arc;

use crate::booking::WaitlistExpiryScheduler;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::core::{Config, Result, ServerState};
use crate::history::HistoryWorker;
use crate::notify::{LogNotifier, NotificationWorker, Notifier};

pub struct Server {
    config: Config,
    state: Option<ServerState>,
    notifier: Arc<dyn Notifier>,
}

impl Server {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            state: None,
            notifier: Arc::new(LogNotifier),
        }
    }

    /// Create server with existing state
    pub fn with_state(config: Config, state: ServerState) -> Self {
        Self {
            config,
            state: Some(state),
            notifier: Arc::new(LogNotifier),
        }
    }

    /// 替换通知投递实现（默认写日志）
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// 运行直到 Ctrl+C
    pub async fn run(self) -> Result<()> {
        self.run_until(async {
            let _ = tokio::signal::ctrl_c().await;
            tracing::info!("Shutting down...");
        })
        .await
    }

    /// 运行直到 `shutdown` 完成
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()>,
    {
        let state = match self.state {
            Some(s) => s,
            None => ServerState::initialize(&self.config)?,
        };

        let tasks = start_background_tasks(&state, self.notifier);

        match state.storage.get_stats() {
            Ok(stats) => tracing::info!(
                reservations = stats.reservation_count,
                waitlist = stats.waitlist_count,
                waiting = stats.waiting_count,
                "🦀 Booking server ready"
            ),
            Err(e) => tracing::warn!(error = %e, "Failed to read storage stats"),
        }

        shutdown.await;

        // 释放所有 Sender，worker 才能在排空通道后退出
        drop(state);
        tasks.shutdown().await;
        Ok(())
    }
}

/// 注册后台任务：通知投递、历史写入、候位过期
fn start_background_tasks(state: &ServerState, notifier: Arc<dyn Notifier>) -> BackgroundTasks {
    let mut tasks = BackgroundTasks::new();

    if let Some(rx) = state.take_notification_receiver() {
        let worker = NotificationWorker::new(notifier);
        tasks.spawn("notification_worker", TaskKind::Worker, worker.run(rx));
    }

    if let Some(rx) = state.take_history_receiver() {
        let worker = HistoryWorker::new(state.history_storage.clone());
        tasks.spawn("history_worker", TaskKind::Worker, worker.run(rx));
    }

    let scheduler = WaitlistExpiryScheduler::new(
        state.manager.clone(),
        state.clock.clone(),
        tasks.shutdown_token(),
    );
    tasks.spawn("waitlist_expiry", TaskKind::Periodic, scheduler.run());

    tasks.log_summary();
    tasks
}
