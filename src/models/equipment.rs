use crate::utils::date::format_timestamp;
use chrono::NaiveDateTime;
use serde::Serialize;

/// Fixed set of equipment categories.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EquipmentCategory {
    Computer,
    Laptop,
    Charger,
    Oscilloscope,
    Multimeter,
    PowerSupply,
    Router,
    Switch,
    Tool,
    Television,
    Projector,
    Other,
}

impl EquipmentCategory {
    pub const ALL: [EquipmentCategory; 12] = [
        EquipmentCategory::Computer,
        EquipmentCategory::Laptop,
        EquipmentCategory::Charger,
        EquipmentCategory::Oscilloscope,
        EquipmentCategory::Multimeter,
        EquipmentCategory::PowerSupply,
        EquipmentCategory::Router,
        EquipmentCategory::Switch,
        EquipmentCategory::Tool,
        EquipmentCategory::Television,
        EquipmentCategory::Projector,
        EquipmentCategory::Other,
    ];

    /// Convert enum → DB string (also the display label)
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EquipmentCategory::Computer => "Computer",
            EquipmentCategory::Laptop => "Laptop",
            EquipmentCategory::Charger => "Charger",
            EquipmentCategory::Oscilloscope => "Oscilloscope",
            EquipmentCategory::Multimeter => "Multimeter",
            EquipmentCategory::PowerSupply => "Power Supply",
            EquipmentCategory::Router => "Router",
            EquipmentCategory::Switch => "Switch",
            EquipmentCategory::Tool => "Tool",
            EquipmentCategory::Television => "Television",
            EquipmentCategory::Projector => "Projector",
            EquipmentCategory::Other => "Other",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.to_db_str() == s)
    }

    /// Parse user input: canonical label in any case, or a Spanish alias.
    pub fn from_label(s: &str) -> Option<Self> {
        let key = s.trim().to_lowercase();
        if let Some(c) = Self::ALL
            .into_iter()
            .find(|c| c.to_db_str().to_lowercase() == key)
        {
            return Some(c);
        }

        match key.as_str() {
            "computador" | "pc" => Some(Self::Computer),
            "portátil" | "portatil" => Some(Self::Laptop),
            "cargador" => Some(Self::Charger),
            "osciloscopio" => Some(Self::Oscilloscope),
            "multímetro" | "multimetro" => Some(Self::Multimeter),
            "fuente" | "power-supply" | "powersupply" => Some(Self::PowerSupply),
            "herramienta" => Some(Self::Tool),
            "televisor" | "tv" => Some(Self::Television),
            "proyector" => Some(Self::Projector),
            "otro" => Some(Self::Other),
            _ => None,
        }
    }

    pub fn valid_labels() -> String {
        Self::ALL
            .iter()
            .map(|c| c.to_db_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Fixed set of equipment states.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum EquipmentState {
    Available,
    InUse,
    Damaged,
    Lost,
}

impl EquipmentState {
    pub const ALL: [EquipmentState; 4] = [
        EquipmentState::Available,
        EquipmentState::InUse,
        EquipmentState::Damaged,
        EquipmentState::Lost,
    ];

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            EquipmentState::Available => "Available",
            EquipmentState::InUse => "In use",
            EquipmentState::Damaged => "Damaged",
            EquipmentState::Lost => "Lost",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|st| st.to_db_str() == s)
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "available" | "disponible" => Some(Self::Available),
            "in use" | "in-use" | "inuse" | "en uso" => Some(Self::InUse),
            "damaged" | "dañado" | "danado" => Some(Self::Damaged),
            "lost" | "extraviado" => Some(Self::Lost),
            _ => None,
        }
    }

    pub fn valid_labels() -> String {
        Self::ALL
            .iter()
            .map(|s| s.to_db_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Equipment {
    pub id: i64,
    pub name: String,
    pub category: EquipmentCategory,
    pub state: EquipmentState,
    pub room: String,
    pub responsible: String,
    pub registered_at: NaiveDateTime,
    pub tag: Option<String>,
}

impl Equipment {
    pub fn registered_at_str(&self) -> String {
        format_timestamp(&self.registered_at)
    }
}

/// A validated, normalized equipment record ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEquipment {
    pub name: String,
    pub category: EquipmentCategory,
    pub state: EquipmentState,
    pub room: String,
    pub responsible: String,
    pub registered_at: NaiveDateTime,
    pub tag: Option<String>,
}

/// Closed partial update: one optional slot per mutable attribute.
///
/// `tag: Some(None)` clears the tag. The room is deliberately absent:
/// it only changes through a relocation, which also writes the ledger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EquipmentPatch {
    pub name: Option<String>,
    pub category: Option<EquipmentCategory>,
    pub state: Option<EquipmentState>,
    pub responsible: Option<String>,
    pub tag: Option<Option<String>>,
}

impl EquipmentPatch {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.category.is_none()
            && self.state.is_none()
            && self.responsible.is_none()
            && self.tag.is_none()
    }
}
