//! Restaurant Settings Model (餐厅容量与业务规则配置)
//!
//! 单例配置，按 `restaurant_id` 存储。引擎每次操作读取一次，从不原地修改。

use std::collections::HashSet;

use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::serde_helpers::{hhmm, hhmm_option};
use crate::error::{AppError, AppResult, ErrorCode};

/// 各区域座位数，总和即总容量
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatingCapacity {
    pub dining_room_seats: u32,
    pub bar_seats: u32,
    pub outdoor_seats: u32,
}

impl SeatingCapacity {
    /// 各区域之和；溢出时返回 None
    pub fn checked_total(&self) -> Option<u32> {
        self.dining_room_seats
            .checked_add(self.bar_seats)?
            .checked_add(self.outdoor_seats)
    }

    /// 总座位数（溢出时饱和，`validate()` 会拒绝这种配置）
    pub fn total(&self) -> u32 {
        self.checked_total().unwrap_or(u32::MAX)
    }
}

impl Default for SeatingCapacity {
    fn default() -> Self {
        Self {
            dining_room_seats: 60,
            bar_seats: 12,
            outdoor_seats: 28,
        }
    }
}

/// 命名服务时段（午市、晚市）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServicePeriod {
    pub name: String,
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm")]
    pub end: NaiveTime,
}

/// 每周某一天的营业时间
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingHours {
    /// 0 = Sunday … 6 = Saturday
    pub day_of_week: u8,
    pub is_open: bool,
    #[serde(with = "hhmm")]
    pub open_time: NaiveTime,
    #[serde(with = "hhmm")]
    pub close_time: NaiveTime,
    #[serde(default)]
    pub service_periods: Vec<ServicePeriod>,
}

impl OperatingHours {
    pub fn open(day_of_week: u8, open_time: NaiveTime, close_time: NaiveTime) -> Self {
        Self {
            day_of_week,
            is_open: true,
            open_time,
            close_time,
            service_periods: Vec::new(),
        }
    }

    pub fn closed(day_of_week: u8) -> Self {
        Self {
            day_of_week,
            is_open: false,
            open_time: NaiveTime::MIN,
            close_time: NaiveTime::MIN,
            service_periods: Vec::new(),
        }
    }

    /// 查找包含该时间的服务时段名称
    pub fn service_period_at(&self, time: NaiveTime) -> Option<&str> {
        self.service_periods
            .iter()
            .find(|p| OpeningWindow::new(p.start, p.end).contains(time))
            .map(|p| p.name.as_str())
    }
}

/// 特殊日期覆盖（节假日闭店、特殊营业时间、特殊阈值）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpecialDate {
    pub date: NaiveDate,
    #[serde(default)]
    pub closed: bool,
    #[serde(default, with = "hhmm_option")]
    pub open_time: Option<NaiveTime>,
    #[serde(default, with = "hhmm_option")]
    pub close_time: Option<NaiveTime>,
    #[serde(default)]
    pub auto_pending_threshold: Option<f64>,
    #[serde(default)]
    pub auto_waitlist_threshold: Option<f64>,
    #[serde(default)]
    pub note: Option<String>,
}

/// 营业区间 `[open, close)`
///
/// `close <= open` 表示跨午夜营业；`open == close` 视为全天营业。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpeningWindow {
    pub open: NaiveTime,
    pub close: NaiveTime,
}

impl OpeningWindow {
    pub fn new(open: NaiveTime, close: NaiveTime) -> Self {
        Self { open, close }
    }

    pub fn contains(&self, time: NaiveTime) -> bool {
        if self.open < self.close {
            time >= self.open && time < self.close
        } else if self.open == self.close {
            true
        } else {
            time >= self.open || time < self.close
        }
    }
}

/// 某日解析后的营业状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayHours {
    Closed,
    Open(OpeningWindow),
}

/// 容量阈值（利用率比例，0..=1）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CapacityThresholds {
    pub auto_pending: f64,
    pub auto_waitlist: f64,
}

/// Restaurant settings (singleton per restaurant)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RestaurantSettings {
    pub restaurant_id: String,
    pub seating: SeatingCapacity,
    /// 同一翻台窗口内的预订数上限（按预订计，不按人数）
    pub max_reservations_per_slot: u32,
    /// 单一精确时段的人数上限（候位转正使用），缺省为总座位数
    pub max_covers_per_time_slot: Option<u32>,
    /// 翻台窗口半径（分钟）
    pub turnover_minutes: u32,
    pub min_hours_in_advance: u32,
    pub max_days_in_advance: u32,
    pub allow_same_day_booking: bool,
    /// 当天预订截止小时（餐厅本地时间，0..=24）
    pub same_day_cutoff_hour: u32,
    pub auto_accept_max_party_size: u32,
    pub require_deposit_min_party_size: u32,
    pub large_party_min_size: u32,
    pub large_party_needs_approval: bool,
    pub auto_waitlist_threshold: f64,
    pub auto_pending_threshold: f64,
    pub operating_hours: Vec<OperatingHours>,
    pub special_dates: Vec<SpecialDate>,
    pub updated_at: Option<i64>,
}

impl Default for RestaurantSettings {
    fn default() -> Self {
        let noon = NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN);
        let late = NaiveTime::from_hms_opt(23, 0, 0).unwrap_or(NaiveTime::MIN);
        let operating_hours = (0..7u8)
            .map(|day| {
                if day == 1 {
                    OperatingHours::closed(day)
                } else {
                    OperatingHours::open(day, noon, late)
                }
            })
            .collect();

        Self {
            restaurant_id: "default".to_string(),
            seating: SeatingCapacity::default(),
            max_reservations_per_slot: 10,
            max_covers_per_time_slot: None,
            turnover_minutes: 90,
            min_hours_in_advance: 2,
            max_days_in_advance: 60,
            allow_same_day_booking: true,
            same_day_cutoff_hour: 24,
            auto_accept_max_party_size: 6,
            require_deposit_min_party_size: 10,
            large_party_min_size: 8,
            large_party_needs_approval: true,
            auto_waitlist_threshold: 0.95,
            auto_pending_threshold: 0.85,
            operating_hours,
            special_dates: Vec::new(),
            updated_at: None,
        }
    }
}

impl RestaurantSettings {
    /// 总座位数
    pub fn total_capacity(&self) -> u32 {
        self.seating.total()
    }

    /// 单一精确时段的人数上限
    pub fn max_covers_per_slot(&self) -> u32 {
        self.max_covers_per_time_slot
            .unwrap_or_else(|| self.total_capacity())
    }

    pub fn special_date(&self, date: NaiveDate) -> Option<&SpecialDate> {
        self.special_dates.iter().find(|d| d.date == date)
    }

    pub fn weekday_hours(&self, date: NaiveDate) -> Option<&OperatingHours> {
        let dow = date.weekday().num_days_from_sunday() as u8;
        self.operating_hours.iter().find(|h| h.day_of_week == dow)
    }

    /// 解析某日营业时间：特殊日期优先于每周设置
    pub fn hours_for(&self, date: NaiveDate) -> DayHours {
        if let Some(special) = self.special_date(date) {
            if special.closed {
                return DayHours::Closed;
            }
            if let (Some(open), Some(close)) = (special.open_time, special.close_time) {
                return DayHours::Open(OpeningWindow::new(open, close));
            }
        }

        match self.weekday_hours(date) {
            Some(h) if h.is_open => DayHours::Open(OpeningWindow::new(h.open_time, h.close_time)),
            _ => DayHours::Closed,
        }
    }

    /// 解析某日容量阈值：特殊日期可单独覆盖
    pub fn thresholds_for(&self, date: NaiveDate) -> CapacityThresholds {
        let special = self.special_date(date);
        CapacityThresholds {
            auto_pending: special
                .and_then(|d| d.auto_pending_threshold)
                .unwrap_or(self.auto_pending_threshold),
            auto_waitlist: special
                .and_then(|d| d.auto_waitlist_threshold)
                .unwrap_or(self.auto_waitlist_threshold),
        }
    }

    /// 加载时校验，配置错误立即失败而不是产生无意义的利用率
    pub fn validate(&self) -> AppResult<()> {
        let Some(total) = self.seating.checked_total() else {
            return Err(AppError::settings_invalid(format!(
                "Total seating capacity overflows: {} + {} + {}",
                self.seating.dining_room_seats, self.seating.bar_seats, self.seating.outdoor_seats
            )));
        };
        if total == 0 {
            return Err(AppError::new(ErrorCode::ZeroCapacity));
        }
        if self.max_reservations_per_slot == 0 {
            return Err(AppError::settings_invalid(
                "max_reservations_per_slot must be greater than zero",
            ));
        }
        if self.max_covers_per_time_slot == Some(0) {
            return Err(AppError::settings_invalid(
                "max_covers_per_time_slot must be greater than zero",
            ));
        }
        if self.same_day_cutoff_hour > 24 {
            return Err(AppError::settings_invalid(
                "same_day_cutoff_hour must be between 0 and 24",
            ));
        }
        validate_thresholds(self.auto_pending_threshold, self.auto_waitlist_threshold, None)?;

        let mut days = HashSet::new();
        for hours in &self.operating_hours {
            if hours.day_of_week > 6 {
                return Err(AppError::settings_invalid(format!(
                    "day_of_week must be 0..=6, got {}",
                    hours.day_of_week
                )));
            }
            if !days.insert(hours.day_of_week) {
                return Err(AppError::settings_invalid(format!(
                    "duplicate operating hours for day_of_week {}",
                    hours.day_of_week
                )));
            }
        }

        let mut dates = HashSet::new();
        for special in &self.special_dates {
            if !dates.insert(special.date) {
                return Err(AppError::settings_invalid(format!(
                    "duplicate special date {}",
                    special.date
                )));
            }
            if special.open_time.is_some() != special.close_time.is_some() {
                return Err(AppError::settings_invalid(format!(
                    "special date {} must set both open_time and close_time",
                    special.date
                )));
            }
            let t = self.thresholds_for(special.date);
            validate_thresholds(t.auto_pending, t.auto_waitlist, Some(special.date))?;
        }

        Ok(())
    }
}

fn validate_thresholds(pending: f64, waitlist: f64, date: Option<NaiveDate>) -> AppResult<()> {
    let scope = date
        .map(|d| format!(" (special date {})", d))
        .unwrap_or_default();
    for (name, value) in [
        ("auto_pending_threshold", pending),
        ("auto_waitlist_threshold", waitlist),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(AppError::settings_invalid(format!(
                "{name} must be within [0, 1], got {value}{scope}"
            )));
        }
    }
    if waitlist < pending {
        return Err(AppError::settings_invalid(format!(
            "auto_waitlist_threshold ({waitlist}) must be >= auto_pending_threshold ({pending}){scope}"
        )));
    }
    Ok(())
}
