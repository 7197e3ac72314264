//! 工具模块 - 通用工具函数和类型
//!
//! # 内容
//!
//! - [`AppError`] - 应用错误类型 (from shared::error)
//! - [`time`] - 餐厅本地时间、时钟
//! - [`validation`] - 输入校验与联系方式规范化
//! - 日志初始化

pub mod logger;
pub mod time;
pub mod validation;

pub use shared::error::{AppError, AppResult, ErrorCode};
