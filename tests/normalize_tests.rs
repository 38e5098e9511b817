use rkeytrack::core::normalize::{
    STORAGE_ROOM, collapse_spaces, normalize_asset_tag, normalize_person_name,
    normalize_room_code, optional_text, room_or_storage,
};

#[test]
fn test_room_code_inserts_hyphen_between_number_and_letter() {
    assert_eq!(normalize_room_code("316F"), "Room 316-F");
    assert_eq!(normalize_room_code("sala 316f"), "Room 316-F");
    assert_eq!(normalize_room_code("  Aula   204-b "), "Room 204-B");
}

#[test]
fn test_room_code_strips_locational_word() {
    assert_eq!(normalize_room_code("room 7"), "Room 7");
    assert_eq!(normalize_room_code("room7"), "Room 7");
    assert_eq!(normalize_room_code("Salón 12"), "Room 12");
    assert_eq!(normalize_room_code("b-12"), "Room B-12");
}

#[test]
fn test_storage_synonyms_map_to_sentinel() {
    for raw in ["bodega", "BODEGA", "La Bodega", "almacén", "Storage", "sala bodega", "bodega!"] {
        assert_eq!(normalize_room_code(raw), STORAGE_ROOM, "input {raw:?}");
    }
}

#[test]
fn test_empty_room_stays_empty_but_equipment_falls_back_to_storage() {
    assert_eq!(normalize_room_code(""), "");
    assert_eq!(normalize_room_code("   "), "");
    assert_eq!(room_or_storage(""), STORAGE_ROOM);
    assert_eq!(room_or_storage("101"), "Room 101");
}

#[test]
fn test_room_code_is_idempotent() {
    let inputs = [
        "316F", "sala 316f", "Room 316-F", "room7", "bodega", "aula 204-b", "b-12", "lab 3",
        "almacén", "  Room   101 ", "bodega!",
    ];
    for raw in inputs {
        let once = normalize_room_code(raw);
        assert_eq!(normalize_room_code(&once), once, "input {raw:?}");
    }
}

#[test]
fn test_person_name_title_case_with_connectors() {
    assert_eq!(
        normalize_person_name("ana   maría DE la cruz"),
        "Ana María de la Cruz"
    );
    assert_eq!(normalize_person_name("de la rosa"), "De la Rosa");

    let once = normalize_person_name("  LUIS  gómez ");
    assert_eq!(once, "Luis Gómez");
    assert_eq!(normalize_person_name(&once), once);
}

#[test]
fn test_asset_tag_trimmed_uppercased_or_absent() {
    assert_eq!(normalize_asset_tag(Some(" eq-001 ")), Some("EQ-001".to_string()));
    assert_eq!(normalize_asset_tag(Some("   ")), None);
    assert_eq!(normalize_asset_tag(Some("")), None);
    assert_eq!(normalize_asset_tag(None), None);
}

#[test]
fn test_free_text_helpers() {
    assert_eq!(collapse_spaces("  a \t b\n c "), "a b c");
    assert_eq!(optional_text(Some("  ")), None);
    assert_eq!(optional_text(Some(" ok  then ")), Some("ok then".to_string()));
    assert_eq!(optional_text(None), None);
}
