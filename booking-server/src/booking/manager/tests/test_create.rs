use super::*;

#[test]
fn test_auto_confirm_persists_and_notifies() {
    let mut h = harness();
    let outcome = h
        .manager
        .create(request("Ana", "2025-12-15", "19:00", 2), HistoryActor::Guest)
        .unwrap();

    assert_eq!(outcome.decision(), Decision::AutoConfirm);
    let CreateOutcome::Reservation { reservation, evaluation } = outcome else {
        panic!("expected reservation");
    };
    assert_eq!(reservation.status, ReservationStatus::Confirmed);
    assert_eq!(reservation.source, ReservationSource::Web);
    assert_eq!(reservation.cancel_token.len(), 32);
    assert_eq!(evaluation.reason, "All requirements met");

    let stored = h.manager.get(reservation.id).unwrap();
    assert_eq!(stored, reservation);

    let notifications = h.drain_notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Confirmation);
    assert_eq!(notifications[0].recipient, "ana@example.com");

    let history: Vec<ChangeType> = h.drain_history().iter().map(|r| r.change_type).collect();
    assert_eq!(history, vec![ChangeType::Created, ChangeType::Confirmed]);
}

#[test]
fn test_date_and_time_round_trip_as_wall_clock() {
    let h = harness();
    let created = create_reservation(&h, "Ana", "2025-12-15", "19:00", 2);

    let fetched = h.manager.get(created.id).unwrap();
    let json = serde_json::to_value(&fetched).unwrap();
    assert_eq!(json["date"], "2025-12-15");
    assert_eq!(json["time"], "19:00");

    let listed = h.manager.list_by_date(date("2025-12-15")).unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].slot(), slot("2025-12-15", "19:00"));
}

#[test]
fn test_reject_is_a_value_and_persists_nothing() {
    let mut h = harness_with(RestaurantSettings {
        min_hours_in_advance: 48,
        ..open_every_day()
    });

    let outcome = h
        .manager
        .create(request("Ana", "2025-12-11", "19:00", 2), HistoryActor::Guest)
        .unwrap();
    assert_eq!(outcome.decision(), Decision::Reject);
    assert!(matches!(outcome, CreateOutcome::Rejected { .. }));

    assert!(h.manager.list_by_date(date("2025-12-11")).unwrap().is_empty());
    assert!(h.manager.list_waitlist(None).unwrap().is_empty());
    assert!(h.drain_notifications().is_empty());
    assert!(h.drain_history().is_empty());
}

#[test]
fn test_pending_when_near_capacity() {
    let mut h = harness_with(capacity_only());
    for i in 0..9 {
        create_reservation(&h, &format!("Guest{}", i), "2025-12-15", "19:00", 10);
    }
    h.drain_notifications();

    let outcome = h
        .manager
        .create(request("Late", "2025-12-15", "19:00", 5), HistoryActor::Guest)
        .unwrap();
    assert_eq!(outcome.decision(), Decision::Pending);
    assert_eq!(outcome.evaluation().metadata.current_capacity_percent, 90.0);

    let CreateOutcome::Reservation { reservation, .. } = outcome else {
        panic!("expected reservation");
    };
    assert_eq!(reservation.status, ReservationStatus::Pending);

    let notifications = h.drain_notifications();
    assert_eq!(notifications[0].kind, NotificationKind::Pending);
    assert!(notifications[0].payload.reason.is_some());
}

#[test]
fn test_slot_full_goes_to_waitlist() {
    let mut h = harness_with(RestaurantSettings {
        max_reservations_per_slot: 1,
        turnover_minutes: 60,
        ..open_every_day()
    });
    create_reservation(&h, "First", "2025-12-15", "19:00", 4);
    h.drain_notifications();
    h.drain_history();

    let outcome = h
        .manager
        .create(request("Second", "2025-12-15", "19:30", 2), HistoryActor::Guest)
        .unwrap();
    let CreateOutcome::Waitlisted { entry, evaluation } = outcome else {
        panic!("expected waitlist");
    };
    assert_eq!(evaluation.reason, "Time slot is full");
    assert_eq!(entry.status, WaitlistStatus::Waiting);
    assert_eq!(entry.slot(), slot("2025-12-15", "19:30"));

    assert_eq!(h.manager.get_waitlist_entry(entry.id).unwrap(), entry);
    assert_eq!(h.drain_notifications()[0].kind, NotificationKind::Waitlisted);
    assert_eq!(h.drain_history()[0].change_type, ChangeType::Waitlisted);
}

#[test]
fn test_validation_happens_before_evaluation() {
    let h = harness();

    let mut bad_date = request("Ana", "15/12/2025", "19:00", 2);
    let err = h.manager.create(bad_date.clone(), HistoryActor::Guest).unwrap_err();
    assert_eq!(app_code(err), ErrorCode::InvalidFormat);

    bad_date.date = "2025-12-15".to_string();
    bad_date.time = "7pm".to_string();
    let err = h.manager.create(bad_date, HistoryActor::Guest).unwrap_err();
    assert_eq!(app_code(err), ErrorCode::InvalidFormat);

    let err = h
        .manager
        .create(request("Ana", "2025-12-15", "19:00", 0), HistoryActor::Guest)
        .unwrap_err();
    assert_eq!(app_code(err), ErrorCode::PartySizeOutOfRange);

    let err = h
        .manager
        .create(request("  ", "2025-12-15", "19:00", 2), HistoryActor::Guest)
        .unwrap_err();
    assert_eq!(app_code(err), ErrorCode::ValidationFailed);

    assert!(h.manager.list_by_date(date("2025-12-15")).unwrap().is_empty());
}

#[test]
fn test_contact_fields_are_normalized() {
    let h = harness();
    let mut input = request("Ana", "2025-12-15", "19:00", 2);
    input.guest_name = "  Ana Pérez ".to_string();
    input.guest_email = Some("  Ana@Example.COM ".to_string());
    input.guest_phone = Some("555.123.4567".to_string());
    input.source = Some(ReservationSource::Phone);

    let CreateOutcome::Reservation { reservation, .. } =
        h.manager.create(input, HistoryActor::Staff).unwrap()
    else {
        panic!("expected reservation");
    };
    assert_eq!(reservation.guest_name, "Ana Pérez");
    assert_eq!(reservation.guest_email.as_deref(), Some("ana@example.com"));
    assert_eq!(reservation.guest_phone.as_deref(), Some("(555) 123-4567"));
    assert_eq!(reservation.source, ReservationSource::Phone);
}

#[test]
fn test_guest_without_email_is_not_notified() {
    let mut h = harness();
    let mut input = request("Ana", "2025-12-15", "19:00", 2);
    input.guest_email = None;
    h.manager.create(input, HistoryActor::Guest).unwrap();
    assert!(h.drain_notifications().is_empty());
}

#[test]
fn test_check_availability_is_a_dry_run() {
    let mut h = harness_with(RestaurantSettings {
        max_reservations_per_slot: 1,
        ..open_every_day()
    });
    let eval = h.manager.check_availability("2025-12-15", "19:00", 2).unwrap();
    assert_eq!(eval.decision, Decision::AutoConfirm);
    // dry run 不占位
    let eval = h.manager.check_availability("2025-12-15", "19:00", 2).unwrap();
    assert_eq!(eval.decision, Decision::AutoConfirm);
    assert!(h.manager.list_by_date(date("2025-12-15")).unwrap().is_empty());
    assert!(h.drain_notifications().is_empty());

    create_reservation(&h, "Ana", "2025-12-15", "19:00", 2);
    let eval = h.manager.check_availability("2025-12-15", "19:00", 2).unwrap();
    assert_eq!(eval.decision, Decision::Waitlist);
}

#[test]
fn test_clock_drives_advance_notice() {
    let h = harness();
    let eval = h.manager.check_availability("2025-12-10", "13:00", 2).unwrap();
    assert_eq!(eval.decision, Decision::Reject);

    h.clock.set(at("2025-12-10", "10:00"));
    let eval = h.manager.check_availability("2025-12-10", "13:00", 2).unwrap();
    assert_eq!(eval.decision, Decision::AutoConfirm);
    assert_eq!(eval.metadata.hours_in_advance, 3.0);
}

#[test]
fn test_ids_are_sequential_per_kind() {
    let h = harness_with(RestaurantSettings {
        max_reservations_per_slot: 1,
        ..open_every_day()
    });
    let a = create_reservation(&h, "A", "2025-12-15", "19:00", 2);
    let b = create_reservation(&h, "B", "2025-12-16", "19:00", 2);
    assert_eq!((a.id, b.id), (1, 2));
    assert_ne!(a.cancel_token, b.cancel_token);

    let CreateOutcome::Waitlisted { entry, .. } = h
        .manager
        .create(request("C", "2025-12-15", "19:00", 2), HistoryActor::Guest)
        .unwrap()
    else {
        panic!("expected waitlist");
    };
    assert_eq!(entry.id, 1);
}
