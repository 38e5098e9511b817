//! File-parsing collaborator for bulk equipment import.
//!
//! Turns a delimited file into the row table the core validates; it never
//! validates domain rules itself.

use crate::core::import::RawEquipmentRow;
use crate::errors::{AppError, AppResult};
use std::io::Read;
use std::path::Path;

/// Read rows from a CSV file with a header line.
pub fn read_equipment_csv(path: &Path, delimiter: u8) -> AppResult<Vec<RawEquipmentRow>> {
    let file = std::fs::File::open(path)
        .map_err(|e| AppError::Import(format!("cannot open {}: {e}", path.display())))?;
    read_equipment_rows(file, delimiter)
}

pub fn read_equipment_rows<R: Read>(reader: R, delimiter: u8) -> AppResult<Vec<RawEquipmentRow>> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let mut rows = Vec::new();
    for (i, result) in rdr.deserialize::<RawEquipmentRow>().enumerate() {
        let row = result.map_err(|e| AppError::Import(format!("line {}: {e}", i + 2)))?;
        rows.push(row);
    }
    Ok(rows)
}

/// Accept `,` `;` `\t` or any single ASCII character.
pub fn parse_delimiter(raw: &str) -> AppResult<u8> {
    match raw {
        "\\t" | "tab" => Ok(b'\t'),
        s if s.len() == 1 && s.is_ascii() => Ok(s.as_bytes()[0]),
        other => Err(AppError::Import(format!(
            "invalid delimiter '{other}': expected a single character"
        ))),
    }
}
