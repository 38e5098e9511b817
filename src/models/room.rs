use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Room {
    pub id: i64,
    pub code: String,
    pub name: Option<String>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub notes: Option<String>,
}

/// Optional descriptive fields for a room upsert.
/// `None` never overwrites a stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoomFields {
    pub name: Option<String>,
    pub building: Option<String>,
    pub floor: Option<String>,
    pub notes: Option<String>,
}
