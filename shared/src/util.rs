/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// 生成客人自助操作凭证
///
/// 128 bit 随机 (UUID v4)，无连字符，不可猜测。
pub fn new_cancel_token() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
