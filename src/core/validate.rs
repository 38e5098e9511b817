//! Domain rules applied to prospective key events and equipment records
//! before anything reaches the store.

use crate::core::normalize::{
    collapse_spaces, normalize_asset_tag, normalize_person_name, room_or_storage,
};
use crate::core::outcome::Rejection;
use crate::models::equipment::{EquipmentCategory, EquipmentState, NewEquipment};
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::LazyLock;

/// Minimum number of letters in a person name.
pub const MIN_NAME_LETTERS: usize = 2;

static NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{M}' ’-]+$").expect("static regex"));

/// Accept names made of letters (accented included), spaces, apostrophes
/// and hyphens, with at least [`MIN_NAME_LETTERS`] letters.
pub fn validate_instructor_name(raw: &str) -> Result<(), Rejection> {
    let name = collapse_spaces(raw);

    if name.is_empty() {
        return Err(Rejection::validation("The name is required."));
    }
    if name.chars().any(|c| c.is_numeric()) {
        return Err(Rejection::validation(format!(
            "The name '{name}' must not contain digits."
        )));
    }
    if !NAME_CHARS.is_match(&name) {
        return Err(Rejection::validation(format!(
            "The name '{name}' may only contain letters, spaces, hyphens and apostrophes."
        )));
    }
    if name.chars().filter(|c| c.is_alphabetic()).count() < MIN_NAME_LETTERS {
        return Err(Rejection::validation(format!(
            "The name '{name}' is too short."
        )));
    }

    Ok(())
}

/// Parse and validate a category label, listing valid options on failure.
pub fn validate_category(raw: &str) -> Result<EquipmentCategory, Rejection> {
    EquipmentCategory::from_label(raw).ok_or_else(|| {
        Rejection::validation(format!(
            "Invalid type '{}'. Use one of: {}",
            raw.trim(),
            EquipmentCategory::valid_labels()
        ))
    })
}

/// Parse and validate a state label, listing valid options on failure.
pub fn validate_state(raw: &str) -> Result<EquipmentState, Rejection> {
    EquipmentState::from_label(raw).ok_or_else(|| {
        Rejection::validation(format!(
            "Invalid state '{}'. Use one of: {}",
            raw.trim(),
            EquipmentState::valid_labels()
        ))
    })
}

/// Trimmed, non-empty equipment name.
pub fn validate_equipment_name(raw: &str) -> Result<String, Rejection> {
    let name = collapse_spaces(raw);
    if name.is_empty() {
        return Err(Rejection::validation("The equipment name is required."));
    }
    Ok(name)
}

/// Normalized field bundle produced by [`validate_equipment`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidEquipment {
    pub name: String,
    pub category: EquipmentCategory,
    pub state: EquipmentState,
    pub room: String,
    pub tag: Option<String>,
}

impl ValidEquipment {
    /// Attach the non-validated attributes to get an insertable record.
    pub fn into_record(self, responsible: &str, registered_at: NaiveDateTime) -> NewEquipment {
        NewEquipment {
            name: self.name,
            category: self.category,
            state: self.state,
            room: self.room,
            responsible: normalize_person_name(responsible),
            registered_at,
            tag: self.tag,
        }
    }
}

/// Validate an equipment record and return its normalized form.
///
/// The room falls back to storage when empty; the tag becomes `None` when
/// empty so untagged consumables never collide.
pub fn validate_equipment(
    name: &str,
    category: &str,
    state: &str,
    room: &str,
    tag: Option<&str>,
) -> Result<ValidEquipment, Rejection> {
    let name = validate_equipment_name(name)?;
    let category = validate_category(category)?;
    let state = validate_state(state)?;

    Ok(ValidEquipment {
        name,
        category,
        state,
        room: room_or_storage(room),
        tag: normalize_asset_tag(tag),
    })
}
