use crate::models::equipment::Equipment;
use crate::models::key_event::KeyEvent;
use crate::models::movement::Movement;
use serde::Serialize;

/// Flat key-event row for CSV / JSON.
#[derive(Serialize, Clone, Debug)]
pub struct KeyEventExport {
    pub id: i64,
    pub timestamp: String,
    pub room: String,
    pub action: String,
    pub holder: String,
    pub area: String,
}

impl From<&KeyEvent> for KeyEventExport {
    fn from(ev: &KeyEvent) -> Self {
        Self {
            id: ev.id,
            timestamp: ev.timestamp_str(),
            room: ev.room.clone(),
            action: ev.action.to_db_str().to_string(),
            holder: ev.holder.clone(),
            area: ev.area.clone(),
        }
    }
}

/// Flat inventory row; `type` matches the import column name.
#[derive(Serialize, Clone, Debug)]
pub struct EquipmentExport {
    pub id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub category: String,
    pub state: String,
    pub room: String,
    pub responsible: String,
    pub registered_at: String,
    pub tag: String,
}

impl From<&Equipment> for EquipmentExport {
    fn from(e: &Equipment) -> Self {
        Self {
            id: e.id,
            name: e.name.clone(),
            category: e.category.to_db_str().to_string(),
            state: e.state.to_db_str().to_string(),
            room: e.room.clone(),
            responsible: e.responsible.clone(),
            registered_at: e.registered_at_str(),
            tag: e.tag.clone().unwrap_or_default(),
        }
    }
}

#[derive(Serialize, Clone, Debug)]
pub struct MovementExport {
    pub id: i64,
    pub equipment_id: i64,
    pub tag: String,
    pub origin_room: String,
    pub destination_room: String,
    pub reason: String,
    pub responsible: String,
    pub timestamp: String,
    pub notes: String,
}

impl From<&Movement> for MovementExport {
    fn from(m: &Movement) -> Self {
        Self {
            id: m.id,
            equipment_id: m.equipment_id,
            tag: m.tag.clone().unwrap_or_default(),
            origin_room: m.origin_room.clone().unwrap_or_default(),
            destination_room: m.destination_room.clone(),
            reason: m.reason.clone().unwrap_or_default(),
            responsible: m.responsible.clone().unwrap_or_default(),
            timestamp: m.timestamp_str(),
            notes: m.notes.clone().unwrap_or_default(),
        }
    }
}
