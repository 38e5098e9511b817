use crate::core::normalize::{normalize_person_name, normalize_room_code, room_or_storage};
use crate::db::log::ttlog;
use crate::db::txn::scoped;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use crate::utils::archive::zip_single_file;
use rusqlite::{Connection, OptionalExtension, Transaction, params};
use std::path::Path;
use tracing::info;

/// Highest schema version this build knows how to produce.
pub const SCHEMA_VERSION: i32 = 3;

type MigrationFn = fn(&Transaction<'_>) -> AppResult<String>;

/// One-time passes gated by `PRAGMA user_version`, in ascending order.
const MIGRATIONS: &[(i32, &str, MigrationFn)] = &[
    (1, "v1_baseline", migrate_v1_baseline),
    (2, "v2_renormalize_rooms_and_names", migrate_v2_renormalize),
    (3, "v3_backfill_room_registry", migrate_v3_backfill_rooms),
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

/// Create every table and index if missing. Safe to run on each open.
fn create_schema(conn: &Connection) -> AppResult<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS key_events (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            holder     TEXT NOT NULL,
            area       TEXT NOT NULL DEFAULT '',
            room       TEXT NOT NULL,
            action     TEXT NOT NULL CHECK(action IN ('Delivered','Returned')),
            timestamp  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_key_events_room_ts
            ON key_events(room, timestamp, id);

        CREATE TABLE IF NOT EXISTS rooms (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            code      TEXT NOT NULL UNIQUE COLLATE NOCASE,
            name      TEXT,
            building  TEXT,
            floor     TEXT,
            notes     TEXT
        );

        CREATE TABLE IF NOT EXISTS equipment (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            name           TEXT NOT NULL CHECK(trim(name) <> ''),
            category       TEXT NOT NULL CHECK(category IN (
                               'Computer','Laptop','Charger','Oscilloscope',
                               'Multimeter','Power Supply','Router','Switch',
                               'Tool','Television','Projector','Other')),
            state          TEXT NOT NULL CHECK(state IN ('Available','In use','Damaged','Lost')),
            room           TEXT NOT NULL DEFAULT 'BODEGA',
            responsible    TEXT NOT NULL DEFAULT '',
            registered_at  TEXT NOT NULL,
            tag            TEXT
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_equipment_tag_unique
            ON equipment(tag) WHERE tag IS NOT NULL AND tag <> '';
        CREATE INDEX IF NOT EXISTS idx_equipment_room ON equipment(room);

        CREATE TABLE IF NOT EXISTS equipment_movements (
            id                INTEGER PRIMARY KEY AUTOINCREMENT,
            equipment_id      INTEGER NOT NULL
                              REFERENCES equipment(id) ON DELETE CASCADE,
            tag               TEXT,
            origin_room       TEXT,
            destination_room  TEXT NOT NULL CHECK(destination_room <> ''),
            reason            TEXT,
            responsible       TEXT,
            timestamp         TEXT NOT NULL,
            notes             TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_movements_equipment
            ON equipment_movements(equipment_id);
        CREATE INDEX IF NOT EXISTS idx_movements_ts
            ON equipment_movements(timestamp, id);
        "#,
    )?;
    Ok(())
}

pub fn current_version(conn: &Connection) -> AppResult<i32> {
    Ok(conn.query_row("PRAGMA user_version", [], |row| row.get(0))?)
}

/// True if the store already holds business data worth protecting.
fn has_data(conn: &Connection) -> AppResult<bool> {
    let n: i64 = conn.query_row(
        "SELECT (SELECT COUNT(*) FROM key_events) + (SELECT COUNT(*) FROM equipment)",
        [],
        |row| row.get(0),
    )?;
    Ok(n > 0)
}

fn backup_before_migration(db_path: &str, from_version: i32) -> AppResult<()> {
    use chrono::Local;

    let src = Path::new(db_path);
    let backup_name = format!(
        "{}-backup_db_pre_v{}.zip",
        Local::now().format("%Y%m%d_%H%M%S"),
        SCHEMA_VERSION
    );
    let backup_path = src
        .parent()
        .map(|p| p.join(&backup_name))
        .unwrap_or_else(|| backup_name.clone().into());

    zip_single_file(src, &backup_path, "database.sqlite")
        .map_err(|e| AppError::Migration(format!("backup failed: {e}")))?;

    success(format!(
        "📦 Backup of schema v{from_version} created: {}",
        backup_path.display()
    ));
    Ok(())
}

fn migrate_v1_baseline(_tx: &Transaction<'_>) -> AppResult<String> {
    Ok("Schema baseline".to_string())
}

/// Rewrite every value of `table.column` through `f`; returns rows touched.
fn renormalize_column(
    tx: &Transaction<'_>,
    table: &str,
    column: &str,
    f: fn(&str) -> String,
) -> AppResult<usize> {
    let mut stmt = tx.prepare(&format!(
        "SELECT id, {column} FROM {table} WHERE {column} IS NOT NULL"
    ))?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut update = tx.prepare(&format!("UPDATE {table} SET {column} = ?1 WHERE id = ?2"))?;
    let mut touched = 0;
    for (id, old) in rows {
        let new = f(&old);
        if new != old {
            update.execute(params![new, id])?;
            touched += 1;
        }
    }
    Ok(touched)
}

/// Re-key the room registry. Entries collapsing onto one canonical code are
/// merged: the surviving row keeps its fields and fills gaps from the other.
fn renormalize_room_registry(tx: &Transaction<'_>) -> AppResult<usize> {
    let mut stmt = tx.prepare("SELECT id, code FROM rooms ORDER BY id")?;
    let rows = stmt
        .query_map([], |row| Ok((row.get::<_, i64>(0)?, row.get::<_, String>(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;

    let mut touched = 0;
    for (id, old) in rows {
        let code = normalize_room_code(&old);
        if code == old {
            continue;
        }

        let survivor: Option<i64> = tx
            .query_row(
                "SELECT id FROM rooms WHERE code = ?1 AND id <> ?2",
                params![code, id],
                |row| row.get(0),
            )
            .optional()?;

        match survivor {
            Some(keep) => {
                tx.execute(
                    "UPDATE rooms SET
                         name     = COALESCE(name,     (SELECT name     FROM rooms WHERE id = ?2)),
                         building = COALESCE(building, (SELECT building FROM rooms WHERE id = ?2)),
                         floor    = COALESCE(floor,    (SELECT floor    FROM rooms WHERE id = ?2)),
                         notes    = COALESCE(notes,    (SELECT notes    FROM rooms WHERE id = ?2))
                     WHERE id = ?1",
                    params![keep, id],
                )?;
                tx.execute("DELETE FROM rooms WHERE id = ?1", [id])?;
            }
            None if code.is_empty() => {
                tx.execute("DELETE FROM rooms WHERE id = ?1", [id])?;
            }
            None => {
                tx.execute(
                    "UPDATE rooms SET code = ?1 WHERE id = ?2",
                    params![code, id],
                )?;
            }
        }
        touched += 1;
    }
    Ok(touched)
}

fn migrate_v2_renormalize(tx: &Transaction<'_>) -> AppResult<String> {
    let mut touched = renormalize_room_registry(tx)?;
    touched += renormalize_column(tx, "key_events", "room", normalize_room_code)?;
    touched += renormalize_column(tx, "key_events", "holder", normalize_person_name)?;
    touched += renormalize_column(tx, "equipment", "room", room_or_storage)?;
    touched += renormalize_column(tx, "equipment", "responsible", normalize_person_name)?;
    touched += renormalize_column(tx, "equipment_movements", "destination_room", room_or_storage)?;
    touched += renormalize_column(tx, "equipment_movements", "origin_room", normalize_room_code)?;

    // An origin that normalizes to nothing means "no prior room".
    tx.execute(
        "UPDATE equipment_movements SET origin_room = NULL WHERE origin_room = ''",
        [],
    )?;

    Ok(format!("Re-normalized {touched} stored room/name values"))
}

fn migrate_v3_backfill_rooms(tx: &Transaction<'_>) -> AppResult<String> {
    let inserted = tx.execute(
        r#"
        INSERT OR IGNORE INTO rooms (code)
        SELECT room FROM key_events WHERE room <> ''
        UNION SELECT room FROM equipment WHERE room <> ''
        UNION SELECT destination_room FROM equipment_movements
        UNION SELECT origin_room FROM equipment_movements
              WHERE origin_room IS NOT NULL AND origin_room <> ''
        "#,
        [],
    )?;
    Ok(format!("Registered {inserted} rooms referenced by existing records"))
}

/// Public entry point: create the schema and run all pending migrations.
///
/// Idempotent: each versioned pass runs at most once per store.
pub fn run_pending_migrations(conn: &mut Connection) -> AppResult<()> {
    ensure_log_table(conn)?;
    create_schema(conn)?;

    let version = current_version(conn)?;
    if version > SCHEMA_VERSION {
        return Err(AppError::Migration(format!(
            "database schema v{version} is newer than supported v{SCHEMA_VERSION}"
        )));
    }
    if version == SCHEMA_VERSION {
        return Ok(());
    }

    if has_data(conn)? {
        warning("Older schema detected, creating safety backup before migration...");
        match conn.path().filter(|p| !p.is_empty()) {
            Some(path) => backup_before_migration(&path.to_string(), version)?,
            None => warning("Could not determine DB path, backup skipped."),
        }
    }

    for (target, name, apply) in MIGRATIONS.iter().filter(|(v, _, _)| *v > version) {
        let message = scoped(conn, name, |tx| {
            let message = apply(tx)?;
            ttlog(tx, "migration_applied", name, &message)?;
            tx.pragma_update(None, "user_version", target)?;
            Ok(message)
        })
        .map_err(|e| AppError::Migration(format!("{name}: {e}")))?;

        info!(version = target, migration = name, "{message}");
    }

    Ok(())
}
