use crate::errors::AppResult;
use crate::models::room::{Room, RoomFields};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};

fn map_row(row: &Row) -> Result<Room> {
    Ok(Room {
        id: row.get("id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        building: row.get("building")?,
        floor: row.get("floor")?,
        notes: row.get("notes")?,
    })
}

/// Insert-or-update by code. Supplied fields overwrite, `None` fields keep
/// whatever is stored. Returns the room id.
pub fn upsert_room(conn: &Connection, code: &str, fields: &RoomFields) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO rooms (code, name, building, floor, notes)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(code) DO UPDATE SET
             name     = COALESCE(excluded.name, rooms.name),
             building = COALESCE(excluded.building, rooms.building),
             floor    = COALESCE(excluded.floor, rooms.floor),
             notes    = COALESCE(excluded.notes, rooms.notes)",
        params![
            code,
            fields.name,
            fields.building,
            fields.floor,
            fields.notes
        ],
    )?;

    let id = conn.query_row(
        "SELECT id FROM rooms WHERE code = ?1",
        [code],
        |row| row.get(0),
    )?;
    Ok(id)
}

/// Make sure a registry entry exists without touching its fields.
pub fn ensure_room(conn: &Connection, code: &str) -> AppResult<()> {
    if code.is_empty() {
        return Ok(());
    }
    conn.execute("INSERT OR IGNORE INTO rooms (code) VALUES (?1)", [code])?;
    Ok(())
}

pub fn get_room(conn: &Connection, code: &str) -> AppResult<Option<Room>> {
    Ok(conn
        .query_row(
            "SELECT id, code, name, building, floor, notes FROM rooms WHERE code = ?1",
            [code],
            map_row,
        )
        .optional()?)
}

pub fn list_rooms(conn: &Connection) -> AppResult<Vec<Room>> {
    let mut stmt =
        conn.prepare("SELECT id, code, name, building, floor, notes FROM rooms ORDER BY code")?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_rooms(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM rooms", [], |row| row.get(0))?)
}
