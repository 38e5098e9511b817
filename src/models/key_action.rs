use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum KeyAction {
    Delivered,
    Returned,
}

impl KeyAction {
    /// Parse user input (English or Spanish, case-insensitive).
    pub fn from_label(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "delivered" | "deliver" | "out" | "entregada" | "entrega" => Some(Self::Delivered),
            "returned" | "return" | "in" | "devuelta" | "devolucion" | "devolución" => {
                Some(Self::Returned)
            }
            _ => None,
        }
    }

    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            KeyAction::Delivered => "Delivered",
            KeyAction::Returned => "Returned",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "Delivered" => Some(KeyAction::Delivered),
            "Returned" => Some(KeyAction::Returned),
            _ => None,
        }
    }

    pub fn is_delivered(&self) -> bool {
        matches!(self, KeyAction::Delivered)
    }
}
