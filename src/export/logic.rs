use crate::db::equipment::list_equipment;
use crate::db::key_events::list_key_events;
use crate::db::movements::list_movements;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::export::fs_utils::ensure_writable;
use crate::export::json_csv::{export_csv, export_json};
use crate::export::model::{EquipmentExport, KeyEventExport, MovementExport};
use crate::export::{ExportDataset, ExportFormat};
use crate::models::filters::{DateRange, EquipmentFilter, KeyEventFilter, MovementFilter};
use crate::ui::messages::warning;
use crate::utils::date::parse_range;
use serde::Serialize;
use std::path::Path;

/// High-level export logic.
pub struct ExportLogic;

fn write_rows<T: Serialize>(
    rows: &[T],
    format: ExportFormat,
    path: &Path,
    label: &str,
) -> AppResult<usize> {
    if rows.is_empty() {
        warning(format!("No {label} found for the selected range. Nothing to export."));
        return Ok(0);
    }

    match format {
        ExportFormat::Csv => export_csv(rows, path, label)?,
        ExportFormat::Json => export_json(rows, path, label)?,
    }
    Ok(rows.len())
}

impl ExportLogic {
    /// Export one dataset.
    ///
    /// - `file`: absolute path of the output file
    /// - `range`: `None`, `"all"` or
    ///   - `YYYY`, `YYYY-MM`, `YYYY-MM-DD`
    ///   - `YYYY:YYYY`, `YYYY-MM:YYYY-MM`, `YYYY-MM-DD:YYYY-MM-DD`
    ///
    /// Returns the number of rows written (0 when nothing matched).
    pub fn export(
        pool: &DbPool,
        dataset: ExportDataset,
        format: ExportFormat,
        file: &str,
        range: Option<&str>,
        force: bool,
    ) -> AppResult<usize> {
        let path = Path::new(file);

        if !path.is_absolute() {
            return Err(AppError::Export(format!(
                "Output file path must be absolute: {file}"
            )));
        }

        ensure_writable(path, force)?;

        let range = match range {
            None => DateRange::default(),
            Some(r) => parse_range(r)?,
        };

        let conn = &pool.conn;
        match dataset {
            ExportDataset::Keys => {
                let filter = KeyEventFilter {
                    range,
                    ..Default::default()
                };
                let rows: Vec<KeyEventExport> = list_key_events(conn, &filter)?
                    .iter()
                    .map(KeyEventExport::from)
                    .collect();
                write_rows(&rows, format, path, "key events")
            }
            ExportDataset::Equipment => {
                let filter = EquipmentFilter {
                    range,
                    ..Default::default()
                };
                let rows: Vec<EquipmentExport> = list_equipment(conn, &filter)?
                    .iter()
                    .map(EquipmentExport::from)
                    .collect();
                write_rows(&rows, format, path, "equipment items")
            }
            ExportDataset::Movements => {
                let filter = MovementFilter {
                    range,
                    ..Default::default()
                };
                let rows: Vec<MovementExport> = list_movements(conn, &filter)?
                    .iter()
                    .map(MovementExport::from)
                    .collect();
                write_rows(&rows, format, path, "movements")
            }
        }
    }
}
