use super::key_action::KeyAction;
use crate::utils::date::format_timestamp;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct KeyEvent {
    pub id: i64,
    pub holder: String,           // ⇔ key_events.holder
    pub area: String,             // ⇔ key_events.area (program / area)
    pub room: String,             // ⇔ key_events.room (normalized code)
    pub action: KeyAction,        // ⇔ key_events.action ('Delivered' | 'Returned')
    pub timestamp: NaiveDateTime, // ⇔ key_events.timestamp ("YYYY-MM-DD HH:MM:SS")
}

impl KeyEvent {
    pub fn timestamp_str(&self) -> String {
        format_timestamp(&self.timestamp)
    }
}

/// A key currently out, as listed by the outstanding-keys view.
#[derive(Debug, Clone, Serialize)]
pub struct OutstandingKey {
    pub event: KeyEvent,
    pub overdue: bool,
}

/// Delivered / returned counters over a range of key events.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct KeySummary {
    pub delivered: i64,
    pub returned: i64,
    pub outstanding: i64,
}
