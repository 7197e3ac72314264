//! 核心模块 - 配置、状态、后台任务
//!
//! # 模块结构
//!
//! - [`Config`] - 服务配置
//! - [`ServerState`] - 服务状态
//! - [`Server`] - 进程生命周期
//! - [`ServerError`] - 启动错误

pub mod config;
pub mod error;
pub mod server;
pub mod state;
pub mod tasks;

pub use config::Config;
pub use error::{Result, ServerError};
pub use server::Server;
pub use state::ServerState;
pub use tasks::{BackgroundTasks, TaskKind};
