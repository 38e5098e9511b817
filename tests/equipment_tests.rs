mod common;
use common::ts;
use rkeytrack::core::actor::Actor;
use rkeytrack::core::equipment::{EquipmentEdit, EquipmentLogic};
use rkeytrack::core::intake::IntakeLogic;
use rkeytrack::core::outcome::{Rejection, RejectionKind};
use rkeytrack::core::relocate::RelocateLogic;
use rkeytrack::db::equipment::{count_equipment, insert_equipment};
use rkeytrack::db::initialize::open_in_memory;
use rkeytrack::db::movements::count_movements;
use rkeytrack::db::pool::DbPool;
use rkeytrack::db::txn::scoped;
use rkeytrack::errors::AppError;
use rkeytrack::models::equipment::{EquipmentCategory, EquipmentState, NewEquipment};
use rkeytrack::models::filters::EquipmentFilter;

fn intake(pool: &mut DbPool, name: &str, room: &str, tag: Option<&str>) -> i64 {
    IntakeLogic::intake(
        pool,
        name,
        "Oscilloscope",
        "Available",
        room,
        "ana pérez",
        ts("2025-04-01 09:00:00"),
        tag,
    )
    .expect("intake accepted")
    .value
}

#[test]
fn test_intake_defaults_to_storage_and_enforces_tag_uniqueness() {
    let mut pool = open_in_memory().unwrap();

    let id = intake(&mut pool, "Oscilloscope", "", Some("EQ-001"));
    let item = EquipmentLogic::get(&pool, id).unwrap().expect("stored");
    assert_eq!(item.room, "BODEGA");
    assert_eq!(item.tag.as_deref(), Some("EQ-001"));
    assert_eq!(item.responsible, "Ana Pérez");
    assert_eq!(item.category, EquipmentCategory::Oscilloscope);

    let dup = IntakeLogic::intake(
        &mut pool,
        "Another scope",
        "Oscilloscope",
        "Available",
        "",
        "",
        ts("2025-04-01 10:00:00"),
        Some(" eq-001 "),
    )
    .unwrap_err();
    assert!(dup.is(RejectionKind::Conflict));

    // untagged consumables never collide
    intake(&mut pool, "Probe", "", None);
    intake(&mut pool, "Probe", "", Some(""));
    intake(&mut pool, "Probe", "", Some("   "));

    let all = EquipmentLogic::list(&pool, &EquipmentFilter::default()).unwrap();
    assert_eq!(all.len(), 4);
    assert_eq!(all.iter().filter(|e| e.tag.is_none()).count(), 3);
}

#[test]
fn test_intake_rejects_invalid_category_without_writing() {
    let mut pool = open_in_memory().unwrap();
    let err = IntakeLogic::intake(
        &mut pool,
        "Thing",
        "Spaceship",
        "Available",
        "101",
        "",
        ts("2025-04-01 09:00:00"),
        None,
    )
    .unwrap_err();
    assert!(err.is(RejectionKind::Validation));
    assert!(EquipmentLogic::list(&pool, &EquipmentFilter::default()).unwrap().is_empty());
}

#[test]
fn test_update_allows_own_tag_and_rejects_foreign_tag() {
    let mut pool = open_in_memory().unwrap();
    let a = intake(&mut pool, "Scope A", "101", Some("EQ-1"));
    let b = intake(&mut pool, "Scope B", "101", Some("EQ-2"));

    let same = EquipmentLogic::update(
        &mut pool,
        a,
        &EquipmentEdit {
            tag: Some("eq-1".into()),
            state: Some("damaged".into()),
            ..Default::default()
        },
    )
    .expect("re-setting own tag is fine")
    .value;
    assert_eq!(same.tag.as_deref(), Some("EQ-1"));
    assert_eq!(same.state, EquipmentState::Damaged);

    let err = EquipmentLogic::update(
        &mut pool,
        b,
        &EquipmentEdit {
            tag: Some("EQ-1".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(err.is(RejectionKind::Conflict));
    let b_item = EquipmentLogic::get(&pool, b).unwrap().unwrap();
    assert_eq!(b_item.tag.as_deref(), Some("EQ-2"));
}

#[test]
fn test_update_clear_tag_and_missing_item() {
    let mut pool = open_in_memory().unwrap();
    let id = intake(&mut pool, "Scope", "101", Some("EQ-9"));

    let cleared = EquipmentLogic::update(
        &mut pool,
        id,
        &EquipmentEdit {
            clear_tag: true,
            name: Some("  Scope  (old) ".into()),
            ..Default::default()
        },
    )
    .unwrap()
    .value;
    assert_eq!(cleared.tag, None);
    assert_eq!(cleared.name, "Scope (old)");
    assert_eq!(cleared.room, "Room 101");

    // the freed tag can be reused
    intake(&mut pool, "New scope", "101", Some("EQ-9"));

    let missing = EquipmentLogic::update(
        &mut pool,
        999,
        &EquipmentEdit {
            name: Some("ghost".into()),
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(missing.is(RejectionKind::NotFound));
}

#[test]
fn test_delete_is_privileged_and_cascades_to_movements() {
    let mut pool = open_in_memory().unwrap();
    let id = intake(&mut pool, "Router", "101", Some("NET-1"));
    RelocateLogic::relocate(&mut pool, id, "102", None, None, ts("2025-04-02 09:00:00"), None)
        .unwrap();
    RelocateLogic::relocate(&mut pool, id, "103", None, None, ts("2025-04-03 09:00:00"), None)
        .unwrap();
    assert_eq!(count_movements(&pool.conn).unwrap(), 2);

    let err = EquipmentLogic::delete(&mut pool, &Actor::new("guest", false), id).unwrap_err();
    assert!(err.is(RejectionKind::Forbidden));
    assert!(EquipmentLogic::get(&pool, id).unwrap().is_some());

    let admin = Actor::new("admin", true);
    let done = EquipmentLogic::delete(&mut pool, &admin, id).unwrap();
    assert!(done.message.unwrap().contains("2 movement record(s)"));
    assert!(EquipmentLogic::get(&pool, id).unwrap().is_none());
    assert_eq!(count_movements(&pool.conn).unwrap(), 0);

    let again = EquipmentLogic::delete(&mut pool, &admin, id).unwrap_err();
    assert!(again.is(RejectionKind::NotFound));
}

#[test]
fn test_list_filters() {
    let mut pool = open_in_memory().unwrap();
    intake(&mut pool, "Scope A", "101", Some("EQ-1"));
    intake(&mut pool, "Scope B", "102", None);
    intake(&mut pool, "Meter", "bodega", Some("EQ-3"));

    let in_101 = EquipmentLogic::list(
        &pool,
        &EquipmentFilter {
            room: Some("sala 101".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(in_101.len(), 1);
    assert_eq!(in_101[0].name, "Scope A");

    let by_tag = EquipmentLogic::list(
        &pool,
        &EquipmentFilter {
            tag: Some("eq-3".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].room, "BODEGA");

    let scopes = EquipmentLogic::list(
        &pool,
        &EquipmentFilter {
            search: Some("scope".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(scopes.len(), 2);
}

#[test]
fn test_store_level_tag_collision_surfaces_as_conflict_and_rolls_back() {
    let mut pool = open_in_memory().unwrap();
    let rec = NewEquipment {
        name: "Scope".into(),
        category: EquipmentCategory::Oscilloscope,
        state: EquipmentState::Available,
        room: "BODEGA".into(),
        responsible: String::new(),
        registered_at: ts("2025-04-01 09:00:00"),
        tag: Some("EQ-1".into()),
    };

    let err = scoped(&mut pool.conn, "double_insert", |tx| {
        insert_equipment(tx, &rec)?;
        insert_equipment(tx, &rec)
    })
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)), "got {err}");

    let rejection = Rejection::from(err);
    assert!(rejection.is(RejectionKind::Conflict));
    assert!(rejection.reason.contains("asset tag"));

    // the first insert went with the rollback
    assert_eq!(count_equipment(&pool.conn).unwrap(), 0);
}

#[test]
fn test_search_treats_like_wildcards_literally() {
    let mut pool = open_in_memory().unwrap();
    intake(&mut pool, "Cable_A", "101", None);
    intake(&mut pool, "CableB", "101", None);
    intake(&mut pool, "Load 50% rated", "101", None);
    intake(&mut pool, "Load 500", "101", None);

    let underscore = EquipmentLogic::list(
        &pool,
        &EquipmentFilter {
            search: Some("e_".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(underscore.len(), 1);
    assert_eq!(underscore[0].name, "Cable_A");

    let percent = EquipmentLogic::list(
        &pool,
        &EquipmentFilter {
            search: Some("50%".into()),
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(percent.len(), 1);
    assert_eq!(percent[0].name, "Load 50% rated");
}
