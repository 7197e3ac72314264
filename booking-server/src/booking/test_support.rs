//! 单元测试用的构造函数

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use shared::models::{
    Reservation, ReservationSource, ReservationStatus, Slot, WaitlistEntry, WaitlistStatus,
};

pub fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

pub fn time(s: &str) -> NaiveTime {
    NaiveTime::parse_from_str(s, "%H:%M").unwrap()
}

pub fn at(d: &str, t: &str) -> NaiveDateTime {
    date(d).and_time(time(t))
}

pub fn slot(d: &str, t: &str) -> Slot {
    Slot::new(date(d), time(t))
}

pub fn reservation(
    id: i64,
    d: &str,
    t: &str,
    party_size: u32,
    status: ReservationStatus,
) -> Reservation {
    Reservation {
        id,
        guest_name: format!("Guest {}", id),
        guest_email: None,
        guest_phone: None,
        date: date(d),
        time: time(t),
        party_size,
        status,
        source: ReservationSource::Web,
        notes: None,
        cancel_token: format!("token-{}", id),
        created_at: 0,
        updated_at: 0,
    }
}

pub fn waiting(id: i64, d: &str, t: &str, party_size: u32, created_at: i64) -> WaitlistEntry {
    WaitlistEntry {
        id,
        guest_name: format!("Waiting {}", id),
        guest_email: Some(format!("waiting{}@example.com", id)),
        guest_phone: None,
        date: date(d),
        time: time(t),
        party_size,
        status: WaitlistStatus::Waiting,
        notes: None,
        linked_reservation_id: None,
        created_at,
        promoted_at: None,
        updated_at: created_at,
    }
}
