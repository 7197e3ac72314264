//! Capacity Calculator
//!
//! Two intentionally different occupancy measures:
//!
//! - [`calculate_capacity`]: turnover-windowed utilization, used by the
//!   evaluation engine. A confirmed reservation occupies seats for
//!   `turnover_minutes` before and after its own time.
//! - [`exact_slot_covers`]: covers booked at exactly one `(date, time)`,
//!   used by waitlist promotion for a freed slot.

use serde::Serialize;
use shared::models::{Reservation, RestaurantSettings, Slot};

/// 某时段的容量快照
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CapacitySnapshot {
    /// total_guests / total_capacity
    pub utilization: f64,
    /// 翻台窗口内的已确认预订数
    pub reservation_count: u32,
    /// 翻台窗口内的总人数
    pub total_guests: u32,
    /// 总座位数
    pub total_capacity: u32,
}

impl CapacitySnapshot {
    pub fn utilization_percent(&self) -> f64 {
        (self.utilization * 10_000.0).round() / 100.0
    }

    /// 加入 `party_size` 后是否超出总座位
    pub fn would_exceed(&self, party_size: u32) -> bool {
        self.total_guests + party_size > self.total_capacity
    }
}

/// 计算 `slot` 的翻台窗口占用
///
/// 只统计同日且 CONFIRMED 的预订；`|Δminutes| <= turnover_minutes` 视为占用。
/// 总座位为 0 时利用率按满载 (1.0) 处理。
pub fn calculate_capacity(
    reservations: &[Reservation],
    slot: Slot,
    settings: &RestaurantSettings,
) -> CapacitySnapshot {
    let window = i64::from(settings.turnover_minutes);

    let (reservation_count, total_guests) = reservations
        .iter()
        .filter(|r| r.holds_capacity() && r.date == slot.date)
        .filter(|r| (r.time - slot.time).num_minutes().abs() <= window)
        .fold((0u32, 0u32), |(count, guests), r| (count + 1, guests + r.party_size));

    let total_capacity = settings.total_capacity();
    let utilization = if total_capacity == 0 {
        1.0
    } else {
        f64::from(total_guests) / f64::from(total_capacity)
    };

    CapacitySnapshot {
        utilization,
        reservation_count,
        total_guests,
        total_capacity,
    }
}

/// 精确时段内已确认的总人数
pub fn exact_slot_covers(reservations: &[Reservation], slot: Slot) -> u32 {
    reservations
        .iter()
        .filter(|r| r.holds_capacity() && r.slot() == slot)
        .map(|r| r.party_size)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::booking::test_support::{reservation, slot};
    use shared::models::{ReservationStatus, SeatingCapacity};

    fn settings(turnover: u32) -> RestaurantSettings {
        RestaurantSettings {
            turnover_minutes: turnover,
            ..RestaurantSettings::default()
        }
    }

    #[test]
    fn test_window_is_inclusive() {
        let existing = vec![
            reservation(1, "2025-12-15", "18:00", 4, ReservationStatus::Confirmed),
            reservation(2, "2025-12-15", "19:00", 2, ReservationStatus::Confirmed),
            reservation(3, "2025-12-15", "20:01", 6, ReservationStatus::Confirmed),
        ];
        let snap = calculate_capacity(&existing, slot("2025-12-15", "19:00"), &settings(60));
        assert_eq!(snap.reservation_count, 2);
        assert_eq!(snap.total_guests, 6);
        assert_eq!(snap.total_capacity, 100);
        assert_eq!(snap.utilization, 0.06);
        assert_eq!(snap.utilization_percent(), 6.0);
    }

    #[test]
    fn test_only_confirmed_on_same_date_count() {
        let existing = vec![
            reservation(1, "2025-12-15", "19:00", 4, ReservationStatus::Pending),
            reservation(2, "2025-12-15", "19:00", 2, ReservationStatus::Cancelled),
            reservation(3, "2025-12-16", "19:00", 8, ReservationStatus::Confirmed),
            reservation(4, "2025-12-15", "19:15", 3, ReservationStatus::Confirmed),
        ];
        let snap = calculate_capacity(&existing, slot("2025-12-15", "19:00"), &settings(30));
        assert_eq!(snap.reservation_count, 1);
        assert_eq!(snap.total_guests, 3);
    }

    #[test]
    fn test_zero_capacity_reads_as_full() {
        let mut settings = settings(60);
        settings.seating = SeatingCapacity {
            dining_room_seats: 0,
            bar_seats: 0,
            outdoor_seats: 0,
        };
        let snap = calculate_capacity(&[], slot("2025-12-15", "19:00"), &settings);
        assert_eq!(snap.utilization, 1.0);
        assert!(snap.would_exceed(1));
    }

    #[test]
    fn test_exact_slot_ignores_turnover_window() {
        let existing = vec![
            reservation(1, "2025-12-15", "19:00", 4, ReservationStatus::Confirmed),
            reservation(2, "2025-12-15", "19:30", 6, ReservationStatus::Confirmed),
            reservation(3, "2025-12-15", "19:00", 5, ReservationStatus::Cancelled),
        ];
        assert_eq!(exact_slot_covers(&existing, slot("2025-12-15", "19:00")), 4);
        assert_eq!(exact_slot_covers(&existing, slot("2025-12-15", "20:00")), 0);
    }
}
