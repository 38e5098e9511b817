mod common;
use common::{setup_test_db, ts};
use rkeytrack::core::actor::Actor;
use rkeytrack::core::keys::KeyLogic;
use rkeytrack::core::outcome::RejectionKind;
use rkeytrack::db::initialize::{open_db, open_in_memory};
use rkeytrack::db::key_events::insert_key_event;
use rkeytrack::db::rooms::get_room;
use rkeytrack::models::filters::KeyEventFilter;
use rkeytrack::models::key_action::KeyAction;
use rkeytrack::models::key_state::KeyState;
use std::thread;
use std::time::Duration;

#[test]
fn test_deliver_conflict_then_return() {
    let mut pool = open_in_memory().expect("open db");

    let accepted = KeyLogic::register(
        &mut pool,
        "ana pérez",
        "Electronics",
        "316F",
        KeyAction::Delivered,
        ts("2025-03-10 08:00:00"),
    )
    .expect("first delivery accepted");
    assert!(accepted.value > 0);
    assert!(accepted.message.unwrap().contains("Room 316-F"));
    assert!(KeyLogic::is_key_out(&pool, "316F").unwrap());
    assert!(KeyLogic::is_key_out(&pool, "sala 316f").unwrap());

    let err = KeyLogic::register(
        &mut pool,
        "Luis Gómez",
        "",
        "sala 316f",
        KeyAction::Delivered,
        ts("2025-03-10 09:00:00"),
    )
    .unwrap_err();
    assert!(err.is(RejectionKind::Conflict));
    assert!(err.reason.contains("Room 316-F"));
    assert!(err.reason.contains("Ana Pérez"));

    KeyLogic::register(
        &mut pool,
        "Ana Pérez",
        "Electronics",
        "316F",
        KeyAction::Returned,
        ts("2025-03-10 10:00:00"),
    )
    .expect("return accepted");
    assert!(!KeyLogic::is_key_out(&pool, "316F").unwrap());

    // the rejected delivery left nothing behind
    let events = KeyLogic::list(&pool, &KeyEventFilter::default()).unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].action, KeyAction::Returned);
    assert_eq!(events[1].action, KeyAction::Delivered);
    assert_eq!(events[1].holder, "Ana Pérez");
}

#[test]
fn test_quick_return_reuses_holder_and_area() {
    let mut pool = open_in_memory().unwrap();
    KeyLogic::register(
        &mut pool,
        "maria de la cruz",
        "Mechatronics",
        "lab 2",
        KeyAction::Delivered,
        ts("2025-03-11 07:30:00"),
    )
    .unwrap();

    KeyLogic::register(&mut pool, "", "", "Lab 2", KeyAction::Returned, ts("2025-03-11 12:00:00"))
        .expect("quick return accepted");

    let status = KeyLogic::status(&pool, "lab2").unwrap();
    assert_eq!(status.state, KeyState::Available);
    let latest = status.latest.expect("latest event");
    assert_eq!(latest.action, KeyAction::Returned);
    assert_eq!(latest.holder, "Maria de la Cruz");
    assert_eq!(latest.area, "Mechatronics");
}

#[test]
fn test_return_of_key_not_out_needs_holder_but_is_allowed() {
    let mut pool = open_in_memory().unwrap();

    let err = KeyLogic::register(&mut pool, "", "", "101", KeyAction::Returned, ts("2025-03-12 08:00:00"))
        .unwrap_err();
    assert!(err.is(RejectionKind::Validation));

    let ok = KeyLogic::register(
        &mut pool,
        "Pedro Ruiz",
        "",
        "101",
        KeyAction::Returned,
        ts("2025-03-12 08:00:00"),
    )
    .expect("return with holder accepted");
    assert!(ok.message.unwrap().contains("not recorded as out"));
}

#[test]
fn test_register_rejects_bad_input_without_writing() {
    let mut pool = open_in_memory().unwrap();
    let t = ts("2025-03-12 08:00:00");

    let no_room = KeyLogic::register(&mut pool, "Ana Pérez", "", "  ", KeyAction::Delivered, t).unwrap_err();
    assert!(no_room.is(RejectionKind::Validation));

    let bad_name = KeyLogic::register(&mut pool, "R2D2", "", "101", KeyAction::Delivered, t).unwrap_err();
    assert!(bad_name.is(RejectionKind::Validation));

    let no_name = KeyLogic::register(&mut pool, "", "", "101", KeyAction::Delivered, t).unwrap_err();
    assert!(no_name.is(RejectionKind::Validation));

    assert!(KeyLogic::list(&pool, &KeyEventFilter::default()).unwrap().is_empty());
}

#[test]
fn test_delivery_registers_room() {
    let mut pool = open_in_memory().unwrap();
    KeyLogic::register(&mut pool, "Ana Pérez", "", "bodega", KeyAction::Delivered, ts("2025-03-12 08:00:00"))
        .unwrap();
    assert!(get_room(&pool.conn, "BODEGA").unwrap().is_some());
}

#[test]
fn test_outstanding_flags_overdue() {
    let mut pool = open_in_memory().unwrap();
    KeyLogic::register(&mut pool, "Ana Pérez", "", "101", KeyAction::Delivered, ts("2025-03-12 06:00:00"))
        .unwrap();
    KeyLogic::register(&mut pool, "Luis Gómez", "", "102", KeyAction::Delivered, ts("2025-03-12 09:30:00"))
        .unwrap();
    KeyLogic::register(&mut pool, "Eva Díaz", "", "103", KeyAction::Delivered, ts("2025-03-12 07:00:00"))
        .unwrap();
    KeyLogic::register(&mut pool, "Eva Díaz", "", "103", KeyAction::Returned, ts("2025-03-12 08:00:00"))
        .unwrap();

    let out = KeyLogic::outstanding(&pool, 2, ts("2025-03-12 10:00:00")).unwrap();
    assert_eq!(out.len(), 2);
    assert_eq!(out[0].event.room, "Room 102");
    assert!(!out[0].overdue);
    assert_eq!(out[1].event.room, "Room 101");
    assert!(out[1].overdue);
}

#[test]
fn test_list_filters_and_summary() {
    let mut pool = open_in_memory().unwrap();
    KeyLogic::register(&mut pool, "Ana Pérez", "Electronics", "101", KeyAction::Delivered, ts("2025-01-05 08:00:00"))
        .unwrap();
    KeyLogic::register(&mut pool, "Ana Pérez", "Electronics", "101", KeyAction::Returned, ts("2025-01-05 12:00:00"))
        .unwrap();
    KeyLogic::register(&mut pool, "Luis Gómez", "Systems", "102", KeyAction::Delivered, ts("2025-02-01 08:00:00"))
        .unwrap();

    let only_101 = KeyLogic::list(
        &pool,
        &KeyEventFilter {
            room: Some("sala 101".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(only_101.len(), 2);

    let by_holder = KeyLogic::list(
        &pool,
        &KeyEventFilter {
            holder: Some("gómez".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(by_holder.len(), 1);

    let s = KeyLogic::summary(&pool, &KeyEventFilter::default()).unwrap();
    assert_eq!(s.delivered, 2);
    assert_eq!(s.returned, 1);
    assert_eq!(s.outstanding, 1);
}

#[test]
fn test_delete_requires_admin_and_existing_id() {
    let mut pool = open_in_memory().unwrap();
    let id = KeyLogic::register(&mut pool, "Ana Pérez", "", "101", KeyAction::Delivered, ts("2025-03-12 08:00:00"))
        .unwrap()
        .value;

    let guest = Actor::new("guest", false);
    let err = KeyLogic::delete(&mut pool, &guest, id).unwrap_err();
    assert!(err.is(RejectionKind::Forbidden));
    assert!(KeyLogic::is_key_out(&pool, "101").unwrap());

    let admin = Actor::new("admin", true);
    let missing = KeyLogic::delete(&mut pool, &admin, 999).unwrap_err();
    assert!(missing.is(RejectionKind::NotFound));

    KeyLogic::delete(&mut pool, &admin, id).expect("admin delete");
    assert!(!KeyLogic::is_key_out(&pool, "101").unwrap());
}

#[test]
fn test_backdated_event_is_rejected_and_state_is_kept() {
    let mut pool = open_in_memory().unwrap();
    KeyLogic::register(&mut pool, "Ana Pérez", "", "316F", KeyAction::Delivered, ts("2025-03-10 10:00:00"))
        .unwrap();

    let err = KeyLogic::register(&mut pool, "Ana Pérez", "", "316F", KeyAction::Returned, ts("2025-03-10 09:00:00"))
        .unwrap_err();
    assert!(err.is(RejectionKind::Validation));
    assert!(err.reason.contains("earlier"));
    assert!(KeyLogic::is_key_out(&pool, "316F").unwrap());
    assert_eq!(KeyLogic::list(&pool, &KeyEventFilter::default()).unwrap().len(), 1);

    // same second as the delivery is still in order
    KeyLogic::register(&mut pool, "Ana Pérez", "", "316F", KeyAction::Returned, ts("2025-03-10 10:00:00"))
        .expect("return at the delivery second");
    assert!(!KeyLogic::is_key_out(&pool, "316F").unwrap());

    KeyLogic::register(&mut pool, "Luis Gómez", "", "316F", KeyAction::Delivered, ts("2025-03-10 11:00:00"))
        .expect("next delivery accepted");
    assert!(KeyLogic::is_key_out(&pool, "316F").unwrap());
}

#[test]
fn test_outstanding_and_status_agree_on_mixed_case_rooms() {
    let pool = open_in_memory().unwrap();
    insert_key_event(&pool.conn, "Ana Pérez", "", "room 316-f", KeyAction::Delivered, &ts("2025-03-10 08:00:00"))
        .unwrap();
    insert_key_event(&pool.conn, "Ana Pérez", "", "Room 316-F", KeyAction::Returned, &ts("2025-03-10 09:00:00"))
        .unwrap();

    assert!(!KeyLogic::is_key_out(&pool, "316F").unwrap());
    assert!(KeyLogic::outstanding(&pool, 2, ts("2025-03-10 12:00:00")).unwrap().is_empty());
}

#[test]
fn test_concurrent_delivery_waits_for_writer_and_is_rejected() {
    let db_path = setup_test_db("key_race");
    let first = open_db(&db_path).expect("first session");
    let mut second = open_db(&db_path).expect("second session");

    // first session holds the write lock with an uncommitted delivery
    first.conn.execute_batch("BEGIN IMMEDIATE").unwrap();
    insert_key_event(&first.conn, "Ana Pérez", "", "Room 316-F", KeyAction::Delivered, &ts("2025-03-10 08:00:00"))
        .unwrap();

    let contender = thread::spawn(move || {
        KeyLogic::register(
            &mut second,
            "Luis Gómez",
            "",
            "316F",
            KeyAction::Delivered,
            ts("2025-03-10 08:00:05"),
        )
    });

    thread::sleep(Duration::from_millis(300));
    first.conn.execute_batch("COMMIT").unwrap();

    let err = contender.join().expect("contender thread").unwrap_err();
    assert!(err.is(RejectionKind::Conflict));
    assert!(err.reason.contains("Ana Pérez"));

    let events = KeyLogic::list(&first, &KeyEventFilter::default()).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].holder, "Ana Pérez");
}
