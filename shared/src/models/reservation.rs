//! Reservation Model (预订)

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

use super::serde_helpers::hhmm;
use super::slot::Slot;

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Cancelled,
    Seated,
    NoShow,
}

impl ReservationStatus {
    /// 终态：不再参与任何状态流转
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Seated | Self::NoShow)
    }

    /// 员工操作允许的状态流转
    ///
    /// ```text
    /// PENDING   → CONFIRMED | CANCELLED
    /// CONFIRMED → SEATED | NO_SHOW | CANCELLED
    /// ```
    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        use ReservationStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Seated)
                | (Confirmed, NoShow)
                | (Confirmed, Cancelled)
        )
    }
}

/// Where the reservation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationSource {
    #[default]
    Web,
    InHouse,
    Phone,
}

/// Reservation record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: i64,
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    /// 餐厅本地日期 (YYYY-MM-DD)
    pub date: NaiveDate,
    /// 餐厅本地时间 (HH:MM)
    #[serde(with = "hhmm")]
    pub time: NaiveTime,
    pub party_size: u32,
    pub status: ReservationStatus,
    #[serde(default)]
    pub source: ReservationSource,
    pub notes: Option<String>,
    /// 客人自助操作凭证，创建后不可变
    pub cancel_token: String,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Reservation {
    pub fn slot(&self) -> Slot {
        Slot::new(self.date, self.time)
    }

    /// 是否占用容量（仅 CONFIRMED 计入）
    pub fn holds_capacity(&self) -> bool {
        self.status == ReservationStatus::Confirmed
    }
}

/// Create reservation payload
///
/// 日期/时间保持原始字符串，由校验层解析。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationCreate {
    pub guest_name: String,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM
    pub time: String,
    pub party_size: u32,
    pub source: Option<ReservationSource>,
    pub notes: Option<String>,
}

/// Guest self-service update payload (via cancel token)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReservationUpdate {
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub guest_phone: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub party_size: Option<u32>,
    pub notes: Option<String>,
}

impl ReservationUpdate {
    pub fn is_empty(&self) -> bool {
        self.guest_name.is_none()
            && self.guest_email.is_none()
            && self.guest_phone.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.party_size.is_none()
            && self.notes.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Reservation {
        Reservation {
            id: 1,
            guest_name: "Ana".to_string(),
            guest_email: Some("ana@example.com".to_string()),
            guest_phone: None,
            date: NaiveDate::from_ymd_opt(2025, 12, 15).unwrap(),
            time: NaiveTime::from_hms_opt(19, 0, 0).unwrap(),
            party_size: 4,
            status: ReservationStatus::Confirmed,
            source: ReservationSource::Web,
            notes: None,
            cancel_token: "tok".to_string(),
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn test_date_time_survive_json_verbatim() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["date"], "2025-12-15");
        assert_eq!(json["time"], "19:00");
        assert_eq!(json["status"], "CONFIRMED");

        let back: Reservation = serde_json::from_value(json).unwrap();
        assert_eq!(back, sample());
    }

    #[test]
    fn test_status_transitions() {
        use ReservationStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(NoShow));
        assert!(!Cancelled.can_transition_to(Confirmed));
        assert!(!Seated.can_transition_to(Cancelled));
        assert!(!Pending.can_transition_to(Seated));
        assert!(NoShow.is_terminal());
    }

    #[test]
    fn test_source_serde_names() {
        let json = serde_json::to_string(&ReservationSource::InHouse).unwrap();
        assert_eq!(json, "\"IN_HOUSE\"");
        let json = serde_json::to_string(&ReservationStatus::NoShow).unwrap();
        assert_eq!(json, "\"NO_SHOW\"");
    }
}
