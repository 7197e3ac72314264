use thiserror::Error;

use crate::booking::StorageError;
use crate::utils::AppError;

/// 启动与运行期错误（业务错误见 [`AppError`]）
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("配置错误: {0}")]
    Config(String),

    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),

    #[error("存储错误: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    App(#[from] AppError),
}

pub type Result<T> = std::result::Result<T, ServerError>;
