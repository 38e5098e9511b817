mod common;
use common::{rkt, setup_test_db, temp_home, temp_home_with_admin, temp_out};
use predicates::prelude::*;
use std::fs;
use std::path::Path;

fn init(db: &str, home: &Path) {
    rkt()
        .env("HOME", home)
        .args(["--db", db, "--test", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Database initialized"));
}

#[test]
fn test_init_creates_database() {
    let db = setup_test_db("cli_init");
    let home = temp_home("cli_init");
    init(&db, &home);
    assert!(Path::new(&db).exists());
    // --test never writes a config file
    assert!(!home.join(".rkeytrack").join("rkeytrack.conf").exists());
}

#[test]
fn test_key_deliver_twice_is_rejected_with_conflict() {
    let db = setup_test_db("cli_keys");
    let home = temp_home("cli_keys");
    init(&db, &home);

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "key", "deliver", "316F", "--holder", "ana pérez"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Room 316-F"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "key", "deliver", "sala 316f", "--holder", "Luis Gómez"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[conflict]"))
        .stderr(predicate::str::contains("already checked out"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "key", "status", "316F"])
        .assert()
        .success()
        .stdout(predicate::str::contains("checked out"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "key", "return", "316F"])
        .assert()
        .success()
        .stdout(predicate::str::contains("returned by Ana Pérez"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "key", "out"])
        .assert()
        .success()
        .stdout(predicate::str::contains("All keys are in."));
}

#[test]
fn test_invalid_holder_is_a_validation_failure() {
    let db = setup_test_db("cli_bad_holder");
    let home = temp_home("cli_bad_holder");
    init(&db, &home);

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "key", "deliver", "101", "--holder", "R2D2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[validation]"));
}

#[test]
fn test_equipment_add_move_history_and_export() {
    let db = setup_test_db("cli_equipment");
    let home = temp_home("cli_equipment");
    init(&db, &home);

    rkt()
        .env("HOME", &home)
        .args([
            "--db", &db, "equipment", "add", "Scope", "--type", "Oscilloscope", "--tag", "eq-001",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("BODEGA"))
        .stdout(predicate::str::contains("EQ-001"));

    rkt()
        .env("HOME", &home)
        .args([
            "--db", &db, "equipment", "add", "Scope 2", "--type", "Oscilloscope", "--tag", "EQ-001",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[conflict]"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "equipment", "move", "1", "--to", "316F", "--reason", "lab"])
        .assert()
        .success()
        .stdout(predicate::str::contains("from BODEGA to Room 316-F"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "equipment", "move", "999", "--to", "101"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[not-found]"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "equipment", "history", "--tag", "eq-001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Room 316-F"));

    let out = temp_out("cli_equipment_export", "csv");
    rkt()
        .env("HOME", &home)
        .args([
            "--db", &db, "export", "--dataset", "equipment", "--format", "csv", "--file", &out,
        ])
        .assert()
        .success();

    let content = fs::read_to_string(&out).expect("export written");
    let header = content.lines().next().unwrap_or_default();
    assert!(header.contains("type"));
    assert!(header.contains("tag"));
    assert!(content.contains("EQ-001"));
    assert!(content.contains("Room 316-F"));
}

#[test]
fn test_import_is_all_or_nothing() {
    let db = setup_test_db("cli_import");
    let home = temp_home("cli_import");
    init(&db, &home);

    let bad = temp_out("cli_import_bad", "csv");
    fs::write(
        &bad,
        "name,type,state,room,responsible,tag\n\
         Scope 1,Oscilloscope,Available,101,,EQ-9\n\
         Meter,Multimeter,Available,101,,EQ-10\n\
         Scope 2,Oscilloscope,Available,101,,EQ-9\n",
    )
    .unwrap();

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "equipment", "import", "--file", &bad])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nothing was saved"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "equipment", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No equipment found."));

    let good = temp_out("cli_import_good", "csv");
    fs::write(
        &good,
        "name;type;state;room;responsible;tag\n\
         Scope 1;Oscilloscope;Available;101;;EQ-9\n\
         Meter;Multimeter;Available;;;\n",
    )
    .unwrap();

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "equipment", "import", "--file", &good, "--delimiter", ";"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Imported 2 equipment item(s)."));
}

#[test]
fn test_delete_needs_admin_from_config() {
    let db = setup_test_db("cli_delete");
    let home = temp_home_with_admin("cli_delete", "boss");
    init(&db, &home);

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "key", "deliver", "101", "--holder", "Ana Pérez"])
        .assert()
        .success();

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "key", "del", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[forbidden]"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "--user", "boss", "key", "del", "1"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted key event #1"));

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "--user", "boss", "key", "del", "1"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("[not-found]"));
}

#[test]
fn test_log_records_operations() {
    let db = setup_test_db("cli_log");
    let home = temp_home("cli_log");
    init(&db, &home);

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "room", "add", "bodega", "--name", "Main storage"])
        .assert()
        .success();

    rkt()
        .env("HOME", &home)
        .args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("migration_applied"))
        .stdout(predicate::str::contains("room_upsert"));
}
