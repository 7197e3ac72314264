//! 时间工具函数 - 餐厅本地民用时间
//!
//! 预订的日期与时间始终是餐厅本地的墙上时间 (`NaiveDate` + `NaiveTime`)，
//! 不携带时区，也从不经过服务器的 UTC 偏移换算。
//! 唯一需要时区的地方是"现在几点"：由 [`Clock`] 提供。

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use parking_lot::RwLock;

use super::{AppError, AppResult};

/// 解析日期字符串 (YYYY-MM-DD)
pub fn parse_date(date: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::invalid_format(format!("Invalid date format: {}", date)))
}

/// 解析时间字符串 (HH:MM)
pub fn parse_time(time: &str) -> AppResult<NaiveTime> {
    NaiveTime::parse_from_str(time.trim(), "%H:%M")
        .map_err(|_| AppError::invalid_format(format!("Invalid time format: {}", time)))
}

/// `to - from`，单位小时（可为负）
pub fn hours_between(from: NaiveDateTime, to: NaiveDateTime) -> f64 {
    (to - from).num_seconds() as f64 / 3600.0
}

/// 距离下一次本地 00:01 的时长（候位过期扫描用）
pub fn duration_until_next_sweep(now_local: NaiveDateTime) -> std::time::Duration {
    let next_day = now_local.date() + Duration::days(1);
    let target = next_day.and_time(NaiveTime::from_hms_opt(0, 1, 0).unwrap_or(NaiveTime::MIN));
    (target - now_local)
        .to_std()
        .unwrap_or(std::time::Duration::from_secs(60 * 60))
}

/// 餐厅本地时钟
pub trait Clock: Send + Sync {
    /// 当前餐厅本地时间
    fn now_local(&self) -> NaiveDateTime;

    /// 当前时间戳（Unix 毫秒），用于 created_at / updated_at
    fn now_millis(&self) -> i64;

    /// 餐厅本地"今天"
    fn today(&self) -> NaiveDate {
        self.now_local().date()
    }
}

/// 系统时钟：UTC 现在 → 业务时区
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    tz: Tz,
}

impl SystemClock {
    pub fn new(tz: Tz) -> Self {
        Self { tz }
    }
}

impl Clock for SystemClock {
    fn now_local(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.tz).naive_local()
    }

    fn now_millis(&self) -> i64 {
        shared::util::now_millis()
    }
}

/// 固定时钟（测试、回放）
#[derive(Debug)]
pub struct FixedClock {
    now: RwLock<NaiveDateTime>,
}

impl FixedClock {
    pub fn new(now: NaiveDateTime) -> Self {
        Self {
            now: RwLock::new(now),
        }
    }

    pub fn set(&self, now: NaiveDateTime) {
        *self.now.write() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.write();
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now_local(&self) -> NaiveDateTime {
        *self.now.read()
    }

    fn now_millis(&self) -> i64 {
        self.now.read().and_utc().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dt(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M").unwrap()
    }

    #[test]
    fn test_parse_date_and_time() {
        assert_eq!(
            parse_date("2025-12-15").unwrap(),
            NaiveDate::from_ymd_opt(2025, 12, 15).unwrap()
        );
        assert_eq!(
            parse_time("19:00").unwrap(),
            NaiveTime::from_hms_opt(19, 0, 0).unwrap()
        );
        assert!(parse_date("15/12/2025").is_err());
        assert!(parse_date("2025-02-30").is_err());
        assert!(parse_time("7pm").is_err());
        assert!(parse_time("24:00").is_err());
    }

    #[test]
    fn test_hours_between_is_wall_clock() {
        let now = dt("2025-12-14 19:00");
        let target = dt("2025-12-15 19:00");
        assert_eq!(hours_between(now, target), 24.0);
        assert_eq!(hours_between(target, now), -24.0);
        assert_eq!(hours_between(now, dt("2025-12-14 20:30")), 1.5);
    }

    #[test]
    fn test_duration_until_next_sweep() {
        let d = duration_until_next_sweep(dt("2025-12-14 23:00"));
        assert_eq!(d.as_secs(), 61 * 60);
        let d = duration_until_next_sweep(dt("2025-12-14 00:00"));
        assert_eq!(d.as_secs(), 24 * 3600 + 60);
    }

    #[test]
    fn test_fixed_clock_advance() {
        let clock = FixedClock::new(dt("2025-12-14 10:00"));
        clock.advance(Duration::days(2));
        assert_eq!(clock.now_local(), dt("2025-12-16 10:00"));
        assert_eq!(clock.today(), NaiveDate::from_ymd_opt(2025, 12, 16).unwrap());
    }
}
