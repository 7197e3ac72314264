use super::*;

#[test]
fn test_try_promote_next_on_empty_slot_is_noop() {
    let mut h = harness();
    for _ in 0..3 {
        let outcome = h.manager.try_promote_next(slot("2025-12-15", "19:00")).unwrap();
        assert_eq!(outcome, PromotionOutcome::none());
    }
    assert!(h.manager.list_by_date(date("2025-12-15")).unwrap().is_empty());
    assert!(h.drain_notifications().is_empty());
    assert!(h.drain_history().is_empty());
}

#[test]
fn test_try_promote_next_when_nothing_fits() {
    let h = harness_with(RestaurantSettings {
        max_covers_per_time_slot: Some(10),
        ..open_every_day()
    });
    h.seed_reservation(&reservation(100, "2025-12-15", "19:00", 9, ReservationStatus::Confirmed));
    h.seed_waiting(&waiting(200, "2025-12-15", "19:00", 2, 1_000));

    let outcome = h.manager.try_promote_next(slot("2025-12-15", "19:00")).unwrap();
    assert!(!outcome.promoted);
    assert_eq!(h.manager.get_waitlist_entry(200).unwrap().status, WaitlistStatus::Waiting);
}

#[test]
fn test_try_promote_next_directly() {
    let mut h = harness();
    h.seed_waiting(&waiting(200, "2025-12-15", "19:00", 2, 1_000));

    let outcome = h.manager.try_promote_next(slot("2025-12-15", "19:00")).unwrap();
    assert!(outcome.promoted);
    let reservation = outcome.reservation.unwrap();
    assert_eq!(reservation.guest_email.as_deref(), Some("waiting200@example.com"));
    assert_eq!(h.drain_notifications()[0].kind, NotificationKind::Promoted);

    // 已转正的条目不会再被选中
    let again = h.manager.try_promote_next(slot("2025-12-15", "19:00")).unwrap();
    assert!(!again.promoted);
}

#[test]
fn test_expire_only_past_dates() {
    let mut h = harness();
    h.seed_waiting(&waiting(1, "2025-12-09", "19:00", 2, 1));
    h.seed_waiting(&waiting(2, "2025-12-10", "19:00", 2, 2));
    h.seed_waiting(&waiting(3, "2025-12-11", "19:00", 2, 3));

    assert_eq!(h.manager.expire_old_entries().unwrap(), 1);
    assert_eq!(h.manager.get_waitlist_entry(1).unwrap().status, WaitlistStatus::Expired);
    assert_eq!(h.manager.get_waitlist_entry(2).unwrap().status, WaitlistStatus::Waiting);
    assert_eq!(h.manager.get_waitlist_entry(3).unwrap().status, WaitlistStatus::Waiting);

    let history = h.drain_history();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].change_type, ChangeType::Expired);
    assert_eq!(history[0].actor, HistoryActor::System);

    // 再跑一次没有变化
    assert_eq!(h.manager.expire_old_entries().unwrap(), 0);
}

#[test]
fn test_expiry_follows_the_clock() {
    let h = harness();
    h.seed_waiting(&waiting(1, "2025-12-10", "19:00", 2, 1));
    assert_eq!(h.manager.expire_old_entries().unwrap(), 0);

    h.clock.advance(chrono::Duration::days(1));
    assert_eq!(h.manager.expire_old_entries().unwrap(), 1);
}

#[test]
fn test_expired_entries_are_never_promoted() {
    let h = harness();
    h.seed_waiting(&waiting(1, "2025-12-09", "19:00", 2, 1));
    h.manager.expire_old_entries().unwrap();

    let outcome = h.manager.try_promote_next(slot("2025-12-09", "19:00")).unwrap();
    assert!(!outcome.promoted);
}

#[test]
fn test_list_waitlist_by_date() {
    let h = harness();
    h.seed_waiting(&waiting(1, "2025-12-15", "20:00", 2, 5));
    h.seed_waiting(&waiting(2, "2025-12-15", "19:00", 2, 9));
    h.seed_waiting(&waiting(3, "2025-12-16", "19:00", 2, 1));

    let day: Vec<i64> = h
        .manager
        .list_waitlist(Some(date("2025-12-15")))
        .unwrap()
        .iter()
        .map(|e| e.id)
        .collect();
    assert_eq!(day, vec![2, 1]);
    assert_eq!(h.manager.list_waitlist(None).unwrap().len(), 3);

    let err = h.manager.get_waitlist_entry(42).unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(app_code(err), ErrorCode::WaitlistEntryNotFound);
}
