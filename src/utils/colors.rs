/// ANSI color helper utilities for terminal output.
pub const RESET: &str = "\x1b[0m";

pub const GREY: &str = "\x1b[90m";

pub const RED: &str = "\x1b[31m";
pub const GREEN: &str = "\x1b[32m";

pub const YELLOW: &str = "\x1b[33m";
pub const CYAN: &str = "\x1b[36m";

use crate::models::equipment::EquipmentState;
use crate::models::key_action::KeyAction;

/// Delivered → yellow (key is out), Returned → green.
pub fn colorize_action(action: KeyAction) -> String {
    let color = if action.is_delivered() { YELLOW } else { GREEN };
    format!("{color}{}{RESET}", action.to_db_str())
}

pub fn colorize_state(state: EquipmentState) -> String {
    let color = match state {
        EquipmentState::Available => GREEN,
        EquipmentState::InUse => CYAN,
        EquipmentState::Damaged => YELLOW,
        EquipmentState::Lost => RED,
    };
    format!("{color}{}{RESET}", state.to_db_str())
}

/// Grey out empty placeholders.
pub fn colorize_optional(value: &str) -> String {
    if value.trim().is_empty() || value.trim() == "--" {
        format!("{GREY}{value}{RESET}")
    } else {
        value.to_string()
    }
}
