//! Crab Booking Server - 餐厅预订准入控制引擎
//!
//! # 架构概述
//!
//! - **预订** (`booking`): 容量计算、规则评估、候位转正、生命周期
//! - **历史** (`history`): 追加式变更记录
//! - **通知** (`notify`): 客人通知（fire-and-forget）
//! - **核心** (`core`): 配置、状态、后台任务
//!
//! # 模块结构
//!
//! ```text
//! booking-server/src/
//! ├── core/          # 配置、状态、后台任务
//! ├── booking/       # 准入控制与生命周期
//! ├── history/       # 变更历史
//! ├── notify/        # 客人通知
//! └── utils/         # 时间、校验、日志
//! ```

use anyhow::Context;

pub mod booking;
pub mod core;
pub mod history;
pub mod notify;
pub mod utils;

// Re-export 公共类型
pub use booking::{
    BookingStorage, CreateOutcome, Decision, Evaluation, ReservationManager, SettingsProvider,
};
pub use core::{Config, Server, ServerState};
pub use utils::{AppError, AppResult, ErrorCode};

// Re-export logger functions
pub use utils::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

/// 日志文件保留天数
const LOG_RETENTION_DAYS: u64 = 14;

/// 设置运行环境：加载 .env，初始化日志
pub fn setup_environment() -> anyhow::Result<Config> {
    // .env 不存在不是错误
    let _ = dotenv::dotenv();

    let config = Config::from_env();
    config
        .ensure_work_dir()
        .with_context(|| format!("Failed to create work dir {}", config.work_dir))?;
    init_logger_with_file(Some(&config.log_level), config.log_dir.as_deref());

    if let Some(dir) = &config.log_dir
        && let Err(e) = cleanup_old_logs(dir, LOG_RETENTION_DAYS)
    {
        tracing::warn!(error = %e, "Failed to clean up old logs");
    }

    Ok(config)
}

pub fn print_banner() {
    println!(
        r#"
   ______           __
  / ____/________ _/ /_
 / /   / ___/ __ `/ __ \
/ /___/ /  / /_/ / /_/ /
\____/_/   \__,_/_.___/
    ____              __   _
   / __ )____  ____  / /__(_)___  ____ _
  / __  / __ \/ __ \/ //_/ / __ \/ __ `/
 / /_/ / /_/ / /_/ / ,< / / / / / /_/ /
/_____/\____/\____/_/|_/_/_/ /_/\__, /
                               /____/
    "#
    );
}
