use crate::db::filter::Where;
use crate::errors::{AppError, AppResult};
use crate::models::filters::KeyEventFilter;
use crate::models::key_action::KeyAction;
use crate::models::key_event::{KeyEvent, KeySummary};
use crate::utils::date::{TIMESTAMP_FMT, format_timestamp};
use chrono::NaiveDateTime;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};

const SELECT: &str = "SELECT id, holder, area, room, action, timestamp FROM key_events";

/// Newest first; id breaks ties between events in the same second.
const NEWEST_FIRST: &str = " ORDER BY timestamp DESC, id DESC";

pub fn map_row(row: &Row) -> Result<KeyEvent> {
    let action_str: String = row.get("action")?;
    let action = KeyAction::from_db_str(&action_str).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::Validation(format!("Invalid key action: {action_str}"))),
        )
    })?;

    let ts_str: String = row.get("timestamp")?;
    let timestamp = NaiveDateTime::parse_from_str(&ts_str, TIMESTAMP_FMT).map_err(|_| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidTimestamp(ts_str.clone())),
        )
    })?;

    Ok(KeyEvent {
        id: row.get("id")?,
        holder: row.get("holder")?,
        area: row.get("area")?,
        room: row.get("room")?,
        action,
        timestamp,
    })
}

/// Insert one key event. Business rules are the caller's job; only schema
/// constraints are enforced here.
pub fn insert_key_event(
    conn: &Connection,
    holder: &str,
    area: &str,
    room: &str,
    action: KeyAction,
    timestamp: &NaiveDateTime,
) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO key_events (holder, area, room, action, timestamp)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            holder,
            area,
            room,
            action.to_db_str(),
            format_timestamp(timestamp)
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// The chronologically latest event for a room.
pub fn latest_for_room(conn: &Connection, room: &str) -> AppResult<Option<KeyEvent>> {
    let sql = format!("{SELECT} WHERE room = ?1 COLLATE NOCASE{NEWEST_FIRST} LIMIT 1");
    let ev = conn.query_row(&sql, [room], map_row).optional()?;
    Ok(ev)
}

/// True iff the latest event for `room` is a delivery.
pub fn is_key_out(conn: &Connection, room: &str) -> AppResult<bool> {
    Ok(latest_for_room(conn, room)?.is_some_and(|ev| ev.action.is_delivered()))
}

pub fn list_key_events(conn: &Connection, filter: &KeyEventFilter) -> AppResult<Vec<KeyEvent>> {
    let mut w = Where::new();
    w.eq_nocase("room", filter.room.as_deref())
        .contains("holder", filter.holder.as_deref())
        .contains("area", filter.area.as_deref())
        .eq("action", filter.action.map(|a| a.to_db_str()))
        .date_range("timestamp", &filter.range);

    let sql = format!("{SELECT}{}{NEWEST_FIRST}", w.sql());
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(w.params()), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Latest event of every room whose key is currently out, newest first.
pub fn outstanding_keys(conn: &Connection) -> AppResult<Vec<KeyEvent>> {
    let sql = format!(
        "{SELECT} k
         WHERE k.id = (
             SELECT k2.id FROM key_events k2
             WHERE k2.room = k.room COLLATE NOCASE
             ORDER BY k2.timestamp DESC, k2.id DESC
             LIMIT 1
         )
         AND k.action = 'Delivered'{NEWEST_FIRST}"
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Delivered / returned counts for the filtered events, plus keys out now.
pub fn summary(conn: &Connection, filter: &KeyEventFilter) -> AppResult<KeySummary> {
    let events = list_key_events(conn, filter)?;
    let delivered = events.iter().filter(|e| e.action.is_delivered()).count() as i64;
    let returned = events.len() as i64 - delivered;
    let outstanding = outstanding_keys(conn)?.len() as i64;

    Ok(KeySummary {
        delivered,
        returned,
        outstanding,
    })
}

pub fn get_key_event(conn: &Connection, id: i64) -> AppResult<Option<KeyEvent>> {
    let sql = format!("{SELECT} WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

/// Hard delete; returns the number of rows removed.
pub fn delete_key_event(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM key_events WHERE id = ?1", [id])?)
}

pub fn count_key_events(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM key_events", [], |row| row.get(0))?)
}
