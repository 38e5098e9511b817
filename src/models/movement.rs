use crate::utils::date::format_timestamp;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Immutable ledger entry for one equipment relocation.
#[derive(Debug, Clone, Serialize)]
pub struct Movement {
    pub id: i64,
    pub equipment_id: i64,
    pub tag: Option<String>,         // tag snapshot at move time
    pub origin_room: Option<String>, // None only when the item had no room
    pub destination_room: String,
    pub reason: Option<String>,
    pub responsible: Option<String>,
    pub timestamp: NaiveDateTime,
    pub notes: Option<String>,
}

impl Movement {
    pub fn timestamp_str(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

/// Relocation request as handed to the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relocation {
    pub equipment_id: i64,
    pub destination_room: String,
    pub reason: Option<String>,
    pub responsible: Option<String>,
    pub timestamp: NaiveDateTime,
    pub notes: Option<String>,
}
