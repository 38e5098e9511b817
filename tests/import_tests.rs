mod common;
use common::ts;
use rkeytrack::core::import::{ImportLogic, RawEquipmentRow, validate_batch};
use rkeytrack::core::intake::IntakeLogic;
use rkeytrack::core::outcome::RejectionKind;
use rkeytrack::db::equipment::count_equipment;
use rkeytrack::db::initialize::open_in_memory;
use rkeytrack::import::{parse_delimiter, read_equipment_rows};

fn row(name: &str, category: &str, tag: Option<&str>) -> RawEquipmentRow {
    RawEquipmentRow {
        name: name.to_string(),
        category: category.to_string(),
        state: "Available".to_string(),
        room: "101".to_string(),
        responsible: "ana pérez".to_string(),
        registered_at: None,
        tag: tag.map(str::to_string),
    }
}

#[test]
fn test_batch_with_duplicate_tags_is_rejected_whole() {
    let mut pool = open_in_memory().unwrap();
    let rows = vec![
        row("Scope 1", "Oscilloscope", Some("EQ-9")),
        row("Meter", "Multimeter", Some("EQ-10")),
        row("Scope 2", "Oscilloscope", Some("eq-9")),
    ];

    let err = ImportLogic::import(&mut pool, &rows, ts("2025-05-01 08:00:00"), "test").unwrap_err();
    assert!(err.is(RejectionKind::Conflict));
    assert!(err.reason.contains("EQ-9"));
    assert_eq!(count_equipment(&pool.conn).unwrap(), 0);

    // the input rows are untouched
    assert_eq!(rows[2].tag.as_deref(), Some("eq-9"));
}

#[test]
fn test_batch_lists_every_invalid_row() {
    let rows = vec![
        row("Scope", "Oscilloscope", None),
        row("", "Laptop", None),
        row("Thing", "Spaceship", None),
    ];
    let err = validate_batch(&rows, ts("2025-05-01 08:00:00")).unwrap_err();
    assert!(err.is(RejectionKind::Validation));
    assert!(err.reason.contains("row 2"));
    assert!(err.reason.contains("row 3"));
    assert!(!err.reason.contains("row 1:"));
}

#[test]
fn test_batch_rejects_bad_timestamp_and_empty_input() {
    let mut bad = row("Scope", "Oscilloscope", None);
    bad.registered_at = Some("yesterday".into());
    let err = validate_batch(&[bad], ts("2025-05-01 08:00:00")).unwrap_err();
    assert!(err.reason.contains("yesterday"));

    let empty = validate_batch(&[], ts("2025-05-01 08:00:00")).unwrap_err();
    assert!(empty.is(RejectionKind::Validation));
}

#[test]
fn test_batch_conflicting_with_stored_tag_persists_nothing() {
    let mut pool = open_in_memory().unwrap();
    IntakeLogic::intake(
        &mut pool,
        "Existing",
        "Laptop",
        "Available",
        "",
        "",
        ts("2025-05-01 08:00:00"),
        Some("LAP-1"),
    )
    .unwrap();

    let rows = vec![
        row("New 1", "Laptop", Some("LAP-2")),
        row("New 2", "Laptop", Some("lap-1")),
    ];
    let err = ImportLogic::import(&mut pool, &rows, ts("2025-05-02 08:00:00"), "test").unwrap_err();
    assert!(err.is(RejectionKind::Conflict));
    assert_eq!(count_equipment(&pool.conn).unwrap(), 1);
}

#[test]
fn test_valid_batch_is_normalized_and_inserted() {
    let mut pool = open_in_memory().unwrap();
    let mut untagged = row("Cable", "Other", Some(""));
    untagged.room = String::new();
    untagged.registered_at = Some("2025-01-15".into());
    let rows = vec![row("Scope", "osciloscopio", Some("eq-1")), untagged];

    let accepted = ImportLogic::import(&mut pool, &rows, ts("2025-05-01 08:00:00"), "test").unwrap();
    assert_eq!(accepted.value, 2);

    let records = validate_batch(&rows, ts("2025-05-01 08:00:00")).unwrap();
    assert_eq!(records[0].tag.as_deref(), Some("EQ-1"));
    assert_eq!(records[0].room, "Room 101");
    assert_eq!(records[0].responsible, "Ana Pérez");
    assert_eq!(records[1].tag, None);
    assert_eq!(records[1].room, "BODEGA");
    assert_eq!(records[1].registered_at, ts("2025-01-15 00:00:00"));
}

#[test]
fn test_csv_reader_accepts_type_header_and_semicolons() {
    let data = "name;type;state;room;responsible;tag\n\
                Scope ; Oscilloscope ;Available;316F;ana pérez;EQ-1\n\
                Probe;Tool;Available;;;\n";
    let rows = read_equipment_rows(data.as_bytes(), parse_delimiter(";").unwrap()).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].name, "Scope");
    assert_eq!(rows[0].category, "Oscilloscope");
    assert_eq!(rows[0].tag.as_deref(), Some("EQ-1"));
    assert_eq!(rows[1].room, "");
}

#[test]
fn test_parse_delimiter() {
    assert_eq!(parse_delimiter(",").unwrap(), b',');
    assert_eq!(parse_delimiter("tab").unwrap(), b'\t');
    assert!(parse_delimiter(";;").is_err());
}
