use crate::db::filter::Where;
use crate::db::rooms::ensure_room;
use crate::db::txn::scoped;
use crate::errors::{AppError, AppResult};
use crate::models::equipment::{
    Equipment, EquipmentCategory, EquipmentPatch, EquipmentState, NewEquipment,
};
use crate::models::filters::EquipmentFilter;
use crate::utils::date::{TIMESTAMP_FMT, format_timestamp};
use chrono::NaiveDateTime;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Result, Row, params, params_from_iter};
use std::collections::HashSet;

const SELECT: &str =
    "SELECT id, name, category, state, room, responsible, registered_at, tag FROM equipment";

fn conversion_error(msg: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        0,
        rusqlite::types::Type::Text,
        Box::new(AppError::Validation(msg)),
    )
}

pub fn map_row(row: &Row) -> Result<Equipment> {
    let category_str: String = row.get("category")?;
    let category = EquipmentCategory::from_db_str(&category_str)
        .ok_or_else(|| conversion_error(format!("Invalid category: {category_str}")))?;

    let state_str: String = row.get("state")?;
    let state = EquipmentState::from_db_str(&state_str)
        .ok_or_else(|| conversion_error(format!("Invalid state: {state_str}")))?;

    let ts_str: String = row.get("registered_at")?;
    let registered_at = NaiveDateTime::parse_from_str(&ts_str, TIMESTAMP_FMT)
        .map_err(|_| conversion_error(format!("Invalid timestamp: {ts_str}")))?;

    Ok(Equipment {
        id: row.get("id")?,
        name: row.get("name")?,
        category,
        state,
        room: row.get("room")?,
        responsible: row.get("responsible")?,
        registered_at,
        tag: row.get("tag")?,
    })
}

/// Insert one item. A colliding non-empty tag fails with a constraint error.
pub fn insert_equipment(conn: &Connection, rec: &NewEquipment) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO equipment (name, category, state, room, responsible, registered_at, tag)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            rec.name,
            rec.category.to_db_str(),
            rec.state.to_db_str(),
            rec.room,
            rec.responsible,
            format_timestamp(&rec.registered_at),
            rec.tag
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

/// Is `tag` already held by an item other than `exclude_id`?
pub fn tag_exists(conn: &Connection, tag: &str, exclude_id: Option<i64>) -> AppResult<bool> {
    let found: Option<i64> = conn
        .query_row(
            "SELECT id FROM equipment
             WHERE tag = ?1 AND (?2 IS NULL OR id <> ?2)
             LIMIT 1",
            params![tag, exclude_id],
            |row| row.get(0),
        )
        .optional()?;
    Ok(found.is_some())
}

pub fn get_equipment(conn: &Connection, id: i64) -> AppResult<Option<Equipment>> {
    let sql = format!("{SELECT} WHERE id = ?1");
    Ok(conn.query_row(&sql, [id], map_row).optional()?)
}

pub fn list_equipment(conn: &Connection, filter: &EquipmentFilter) -> AppResult<Vec<Equipment>> {
    let mut w = Where::new();
    w.eq_nocase("room", filter.room.as_deref())
        .eq("category", filter.category.map(|c| c.to_db_str()))
        .eq("state", filter.state.map(|s| s.to_db_str()))
        .eq_nocase("tag", filter.tag.as_deref())
        .contains("name", filter.search.as_deref())
        .date_range("registered_at", &filter.range);

    let sql = format!(
        "{SELECT}{} ORDER BY registered_at DESC, id DESC",
        w.sql()
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(w.params()), map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Apply only the fields present in `patch`.
///
/// The existence check, the self-excluding tag check and the write share one
/// transaction.
pub fn update_equipment(conn: &mut Connection, id: i64, patch: &EquipmentPatch) -> AppResult<()> {
    let mut sets: Vec<&str> = Vec::new();
    let mut values: Vec<Value> = Vec::new();

    if let Some(name) = &patch.name {
        sets.push("name");
        values.push(Value::Text(name.clone()));
    }
    if let Some(category) = patch.category {
        sets.push("category");
        values.push(Value::Text(category.to_db_str().to_string()));
    }
    if let Some(state) = patch.state {
        sets.push("state");
        values.push(Value::Text(state.to_db_str().to_string()));
    }
    if let Some(responsible) = &patch.responsible {
        sets.push("responsible");
        values.push(Value::Text(responsible.clone()));
    }
    if let Some(tag) = &patch.tag {
        sets.push("tag");
        values.push(tag.clone().map(Value::Text).unwrap_or(Value::Null));
    }

    if sets.is_empty() {
        return Err(AppError::Validation("No fields to update.".to_string()));
    }

    let assignments = sets
        .iter()
        .enumerate()
        .map(|(i, col)| format!("{col} = ?{}", i + 1))
        .collect::<Vec<_>>()
        .join(", ");
    values.push(Value::Integer(id));
    let sql = format!(
        "UPDATE equipment SET {assignments} WHERE id = ?{}",
        values.len()
    );

    scoped(conn, "update_equipment", |tx| {
        if get_equipment(tx, id)?.is_none() {
            return Err(AppError::NotFound(format!("Equipment #{id} not found.")));
        }

        if let Some(Some(tag)) = &patch.tag
            && tag_exists(tx, tag, Some(id))?
        {
            return Err(AppError::Conflict(format!(
                "Asset tag '{tag}' is already assigned to another item."
            )));
        }

        tx.execute(&sql, params_from_iter(values.iter()))?;
        Ok(())
    })
}

/// Hard delete; movements go with it through the cascade.
pub fn delete_equipment(conn: &Connection, id: i64) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM equipment WHERE id = ?1", [id])?)
}

/// Tags that appear more than once (case-insensitive), in first-seen order.
pub fn duplicate_tags<'a, I>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut dups = Vec::new();
    for tag in tags {
        let key = tag.to_uppercase();
        if !seen.insert(key.clone()) && !dups.contains(&key) {
            dups.push(key);
        }
    }
    dups
}

/// Insert a whole batch or nothing.
///
/// The batch is rejected before any write if a tag repeats within it or is
/// already stored. Returns the number of rows inserted.
pub fn bulk_insert_equipment(conn: &mut Connection, rows: &[NewEquipment]) -> AppResult<usize> {
    let dups = duplicate_tags(rows.iter().filter_map(|r| r.tag.as_deref()));
    if !dups.is_empty() {
        return Err(AppError::Conflict(format!(
            "Duplicate asset tags within the batch: {}",
            dups.join(", ")
        )));
    }

    scoped(conn, "bulk_insert_equipment", |tx| {
        let mut taken = Vec::new();
        for tag in rows.iter().filter_map(|r| r.tag.as_deref()) {
            if tag_exists(tx, tag, None)? {
                taken.push(tag.to_string());
            }
        }
        if !taken.is_empty() {
            return Err(AppError::Conflict(format!(
                "Asset tags already registered: {}",
                taken.join(", ")
            )));
        }

        for rec in rows {
            ensure_room(tx, &rec.room)?;
            insert_equipment(tx, rec)?;
        }
        Ok(rows.len())
    })
}

pub fn count_equipment(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM equipment", [], |row| row.get(0))?)
}
