//! Bulk equipment import: pure batch validation, then one all-or-nothing write.

use crate::core::outcome::{Accepted, Outcome, Rejection, RejectionKind};
use crate::core::validate::validate_equipment;
use crate::db::equipment::{bulk_insert_equipment, duplicate_tags};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::models::equipment::NewEquipment;
use crate::utils::date::parse_timestamp;
use chrono::NaiveDateTime;
use serde::Deserialize;

/// One row as handed over by the file-parsing collaborator.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawEquipmentRow {
    pub name: String,
    #[serde(rename = "type", alias = "category")]
    pub category: String,
    pub state: String,
    #[serde(default)]
    pub room: String,
    #[serde(default)]
    pub responsible: String,
    #[serde(default)]
    pub registered_at: Option<String>,
    #[serde(default)]
    pub tag: Option<String>,
}

fn validate_row(row: &RawEquipmentRow, default_ts: NaiveDateTime) -> Result<NewEquipment, String> {
    let valid = validate_equipment(
        &row.name,
        &row.category,
        &row.state,
        &row.room,
        row.tag.as_deref(),
    )
    .map_err(|r| r.reason)?;

    let registered_at = match row.registered_at.as_deref().map(str::trim) {
        None | Some("") => default_ts,
        Some(s) => parse_timestamp(s).ok_or_else(|| format!("invalid registered_at '{s}'"))?,
    };

    Ok(valid.into_record(&row.responsible, registered_at))
}

/// Validate a whole batch without touching the input.
///
/// Either every row is valid and tags are unique within the batch, or the
/// rejection lists every offending row (1-based) and duplicated tag.
pub fn validate_batch(
    rows: &[RawEquipmentRow],
    default_ts: NaiveDateTime,
) -> Result<Vec<NewEquipment>, Rejection> {
    if rows.is_empty() {
        return Err(Rejection::validation("The import contains no rows."));
    }

    let mut records = Vec::with_capacity(rows.len());
    let mut problems = Vec::new();

    for (i, row) in rows.iter().enumerate() {
        match validate_row(row, default_ts) {
            Ok(rec) => records.push(rec),
            Err(reason) => problems.push(format!("row {}: {reason}", i + 1)),
        }
    }

    // Bad rows make it a validation problem; duplicate tags alone a conflict.
    let kind = if problems.is_empty() {
        RejectionKind::Conflict
    } else {
        RejectionKind::Validation
    };

    let dups = duplicate_tags(records.iter().filter_map(|r| r.tag.as_deref()));
    if !dups.is_empty() {
        problems.push(format!("duplicate tags in batch: {}", dups.join(", ")));
    }

    if problems.is_empty() {
        Ok(records)
    } else {
        Err(Rejection::new(
            kind,
            format!("Import rejected, nothing was saved. {}", problems.join("; ")),
        ))
    }
}

pub struct ImportLogic;

impl ImportLogic {
    /// Returns the number of rows inserted.
    pub fn import(
        pool: &mut DbPool,
        rows: &[RawEquipmentRow],
        default_ts: NaiveDateTime,
        source: &str,
    ) -> Outcome<usize> {
        let records = validate_batch(rows, default_ts)?;
        let inserted = bulk_insert_equipment(&mut pool.conn, &records)?;

        let message = format!("Imported {inserted} equipment item(s).");
        audit(&pool.conn, "equipment_import", source, &message);
        Ok(Accepted::new(inserted).with_message(message))
    }
}
