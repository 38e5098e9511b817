//! Optional filters for the read operations. Empty filters return everything.

use super::equipment::{EquipmentCategory, EquipmentState};
use super::key_action::KeyAction;
use chrono::NaiveDate;

/// Inclusive calendar-day bounds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl DateRange {
    pub fn between(from: NaiveDate, to: NaiveDate) -> Self {
        Self {
            from: Some(from),
            to: Some(to),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct KeyEventFilter {
    pub room: Option<String>,
    pub holder: Option<String>,
    pub area: Option<String>,
    pub action: Option<KeyAction>,
    pub range: DateRange,
}

#[derive(Debug, Clone, Default)]
pub struct EquipmentFilter {
    pub room: Option<String>,
    pub category: Option<EquipmentCategory>,
    pub state: Option<EquipmentState>,
    pub tag: Option<String>,
    pub search: Option<String>,
    pub range: DateRange,
}

#[derive(Debug, Clone, Default)]
pub struct MovementFilter {
    pub equipment_id: Option<i64>,
    pub tag: Option<String>,
    pub origin_room: Option<String>,
    pub destination_room: Option<String>,
    pub responsible: Option<String>,
    pub range: DateRange,
}
