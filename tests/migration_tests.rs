mod common;
use common::setup_test_db;
use rkeytrack::db::initialize::open_db;
use rkeytrack::db::log::list_log;
use rkeytrack::db::migrate::{SCHEMA_VERSION, current_version};
use rkeytrack::db::rooms::get_room;
use rkeytrack::errors::AppError;

fn migration_rows(pool: &rkeytrack::db::pool::DbPool) -> usize {
    list_log(&pool.conn)
        .unwrap()
        .into_iter()
        .filter(|e| e.operation == "migration_applied")
        .count()
}

#[test]
fn test_fresh_store_reaches_current_version_once() {
    let db_path = setup_test_db("migrate_fresh");

    let pool = open_db(&db_path).expect("first open");
    assert_eq!(current_version(&pool.conn).unwrap(), SCHEMA_VERSION);
    assert_eq!(migration_rows(&pool), SCHEMA_VERSION as usize);
    drop(pool);

    let pool = open_db(&db_path).expect("second open");
    assert_eq!(current_version(&pool.conn).unwrap(), SCHEMA_VERSION);
    assert_eq!(migration_rows(&pool), SCHEMA_VERSION as usize);
}

#[test]
fn test_legacy_values_are_renormalized_and_rooms_backfilled() {
    let db_path = setup_test_db("migrate_legacy");

    let pool = open_db(&db_path).unwrap();
    pool.conn
        .execute_batch(
            "INSERT INTO key_events (holder, area, room, action, timestamp)
             VALUES ('ana   PEREZ', '', 'sala 316f', 'Delivered', '2024-11-04 08:00:00');
             INSERT INTO equipment (name, category, state, room, responsible, registered_at, tag)
             VALUES ('Scope', 'Oscilloscope', 'Available', 'almacen', 'luis gomez', '2024-11-04 08:00:00', 'EQ-1');
             INSERT INTO equipment_movements (equipment_id, tag, origin_room, destination_room, timestamp)
             VALUES (1, 'EQ-1', '', 'aula 7', '2024-11-05 08:00:00');
             INSERT INTO rooms (code, name) VALUES ('316F', 'Lab');
             INSERT INTO rooms (code, building) VALUES ('sala 316f', 'B');
             PRAGMA user_version = 1;",
        )
        .unwrap();
    drop(pool);

    let pool = open_db(&db_path).expect("reopen runs pending passes");
    assert_eq!(current_version(&pool.conn).unwrap(), SCHEMA_VERSION);

    let (room, holder): (String, String) = pool
        .conn
        .query_row("SELECT room, holder FROM key_events", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(room, "Room 316-F");
    assert_eq!(holder, "Ana Perez");

    let (eq_room, responsible): (String, String) = pool
        .conn
        .query_row("SELECT room, responsible FROM equipment", [], |r| {
            Ok((r.get(0)?, r.get(1)?))
        })
        .unwrap();
    assert_eq!(eq_room, "BODEGA");
    assert_eq!(responsible, "Luis Gomez");

    let (origin, dest): (Option<String>, String) = pool
        .conn
        .query_row(
            "SELECT origin_room, destination_room FROM equipment_movements",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(origin, None);
    assert_eq!(dest, "Room 7");

    for code in ["Room 316-F", "BODEGA", "Room 7"] {
        assert!(get_room(&pool.conn, code).unwrap().is_some(), "room {code}");
    }

    // legacy spellings of one room collapse into a single registry row
    let merged = get_room(&pool.conn, "Room 316-F").unwrap().unwrap();
    assert_eq!(merged.name.as_deref(), Some("Lab"));
    assert_eq!(merged.building.as_deref(), Some("B"));
    let spellings: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM rooms WHERE code LIKE '%316%'", [], |r| r.get(0))
        .unwrap();
    assert_eq!(spellings, 1);
}

#[test]
fn test_newer_schema_is_refused() {
    let db_path = setup_test_db("migrate_newer");
    let pool = open_db(&db_path).unwrap();
    pool.conn
        .execute_batch(&format!("PRAGMA user_version = {};", SCHEMA_VERSION + 1))
        .unwrap();
    drop(pool);

    match open_db(&db_path) {
        Err(AppError::Migration(msg)) => assert!(msg.contains("newer")),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("newer schema must be refused"),
    }
}
