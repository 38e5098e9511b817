use crate::db::filter::Where;
use crate::db::rooms::ensure_room;
use crate::db::txn::scoped;
use crate::errors::{AppError, AppResult};
use crate::models::filters::MovementFilter;
use crate::models::movement::{Movement, Relocation};
use crate::utils::date::{TIMESTAMP_FMT, format_timestamp};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

const SELECT: &str = "SELECT id, equipment_id, tag, origin_room, destination_room, \
                      reason, responsible, timestamp, notes FROM equipment_movements";

fn map_row(row: &Row) -> Result<Movement> {
    let ts_str: String = row.get("timestamp")?;
    let timestamp = NaiveDateTime::parse_from_str(&ts_str, TIMESTAMP_FMT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTimestamp(ts_str.clone())),
        )
    })?;

    Ok(Movement {
        id: row.get("id")?,
        equipment_id: row.get("equipment_id")?,
        tag: row.get("tag")?,
        origin_room: row.get("origin_room")?,
        destination_room: row.get("destination_room")?,
        reason: row.get("reason")?,
        responsible: row.get("responsible")?,
        timestamp,
        notes: row.get("notes")?,
    })
}

/// Move an item and append its ledger entry as one unit.
///
/// a) read the current room and tag (NotFound if the item is gone)
/// b) register the destination room
/// c) update the item's room
/// d) append the movement with the pre-update room as origin
///
/// Returns the id of the new movement.
pub fn relocate_equipment(conn: &mut Connection, req: &Relocation) -> AppResult<i64> {
    if req.destination_room.trim().is_empty() {
        return Err(AppError::Validation(
            "Destination room is required.".to_string(),
        ));
    }

    scoped(conn, "relocate_equipment", |tx| {
        let current: Option<(String, Option<String>)> = tx
            .query_row(
                "SELECT room, tag FROM equipment WHERE id = ?1",
                [req.equipment_id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        let Some((origin, tag)) = current else {
            return Err(AppError::NotFound(format!(
                "Equipment #{} not found.",
                req.equipment_id
            )));
        };

        ensure_room(tx, &req.destination_room)?;

        tx.execute(
            "UPDATE equipment SET room = ?1 WHERE id = ?2",
            params![req.destination_room, req.equipment_id],
        )?;

        let origin = (!origin.is_empty()).then_some(origin);
        tx.execute(
            "INSERT INTO equipment_movements
                 (equipment_id, tag, origin_room, destination_room, reason, responsible, timestamp, notes)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                req.equipment_id,
                tag,
                origin,
                req.destination_room,
                req.reason,
                req.responsible,
                format_timestamp(&req.timestamp),
                req.notes
            ],
        )?;

        Ok(tx.last_insert_rowid())
    })
}

pub fn list_movements(conn: &Connection, filter: &MovementFilter) -> AppResult<Vec<Movement>> {
    let mut w = Where::new();
    w.eq_int("equipment_id", filter.equipment_id)
        .eq_nocase("tag", filter.tag.as_deref())
        .eq_nocase("origin_room", filter.origin_room.as_deref())
        .eq_nocase("destination_room", filter.destination_room.as_deref())
        .contains("responsible", filter.responsible.as_deref())
        .date_range("timestamp", &filter.range);

    let sql = format!("{SELECT}{} ORDER BY timestamp DESC, id DESC", w.sql());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(w.params()), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn count_movements(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM equipment_movements",
        [],
        |row| row.get(0),
    )?)
}
