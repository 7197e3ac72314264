use super::super::storage::StorageError;
use shared::error::{AppError, ErrorCode};
use shared::models::ReservationStatus;
use thiserror::Error;

/// Manager errors
#[derive(Debug, Error)]
pub enum ManagerError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// 校验失败 / 配置错误（已带错误码）
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Reservation not found: {0}")]
    ReservationNotFound(i64),

    #[error("No reservation matches this token")]
    TokenNotFound,

    #[error("Waitlist entry not found: {0}")]
    WaitlistEntryNotFound(i64),

    #[error("Reservation already cancelled: {0}")]
    AlreadyCancelled(i64),

    #[error("Invalid status transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: ReservationStatus,
        to: ReservationStatus,
    },

    #[error("Rejected: {0}")]
    Rejected(String),
}

/// 将存储错误转换为错误码
fn classify_storage_error(e: &StorageError) -> ErrorCode {
    if let StorageError::Serialization(_) = e {
        return ErrorCode::StorageCorrupted;
    }

    // redb 错误通过字符串匹配分类
    let err_str = e.to_string().to_lowercase();
    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    ErrorCode::DatabaseError
}

impl From<ManagerError> for AppError {
    fn from(err: ManagerError) -> Self {
        match err {
            ManagerError::Storage(e) => {
                let code = classify_storage_error(&e);
                tracing::error!(error = %e, error_code = ?code, "Storage error occurred");
                AppError::with_message(code, e.to_string())
            }
            ManagerError::App(e) => e,
            ManagerError::ReservationNotFound(id) => {
                AppError::new(ErrorCode::ReservationNotFound).with_detail("reservation_id", id)
            }
            ManagerError::TokenNotFound => AppError::new(ErrorCode::CancelTokenInvalid),
            ManagerError::WaitlistEntryNotFound(id) => {
                AppError::new(ErrorCode::WaitlistEntryNotFound).with_detail("waitlist_entry_id", id)
            }
            ManagerError::AlreadyCancelled(id) => {
                AppError::new(ErrorCode::ReservationAlreadyCancelled)
                    .with_detail("reservation_id", id)
            }
            ManagerError::InvalidTransition { from, to } => AppError::invalid_transition(format!(
                "Cannot change reservation status from {:?} to {:?}",
                from, to
            )),
            ManagerError::Rejected(reason) => {
                AppError::with_message(ErrorCode::BookingRejected, reason)
            }
        }
    }
}

impl ManagerError {
    /// 不存在类错误（与「存在但不允许」区分）
    pub fn is_not_found(&self) -> bool {
        match self {
            ManagerError::ReservationNotFound(_)
            | ManagerError::TokenNotFound
            | ManagerError::WaitlistEntryNotFound(_) => true,
            ManagerError::App(e) => e.is_not_found(),
            _ => false,
        }
    }
}

pub type ManagerResult<T> = Result<T, ManagerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_is_distinct_from_disallowed() {
        assert!(ManagerError::TokenNotFound.is_not_found());
        assert!(ManagerError::ReservationNotFound(3).is_not_found());
        assert!(!ManagerError::AlreadyCancelled(3).is_not_found());

        let app: AppError = ManagerError::AlreadyCancelled(3).into();
        assert_eq!(app.code, ErrorCode::ReservationAlreadyCancelled);
        assert!(!app.is_not_found());

        let app: AppError = ManagerError::TokenNotFound.into();
        assert!(app.is_not_found());
    }

    #[test]
    fn test_app_error_passes_through() {
        let err: ManagerError = AppError::invalid_format("Invalid date format: 15/12/2025").into();
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::InvalidFormat);
    }

    #[test]
    fn test_serialization_error_maps_to_corruption() {
        let json_err = serde_json::from_slice::<serde_json::Value>(b"{").unwrap_err();
        let app: AppError = ManagerError::Storage(StorageError::Serialization(json_err)).into();
        assert_eq!(app.code, ErrorCode::StorageCorrupted);
    }
}
