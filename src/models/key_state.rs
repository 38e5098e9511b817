//! Per-room key state machine.
//!
//! ```text
//!   Available --Delivered--> CheckedOut
//!   CheckedOut --Returned--> Available
//!   CheckedOut --Delivered--> (rejected)
//! ```
//! A room with no events starts `Available`; there is no terminal state.

use super::key_action::KeyAction;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum KeyState {
    Available,
    CheckedOut,
}

/// A transition the machine refuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoubleCheckout;

impl KeyState {
    /// State implied by the latest recorded action for a room.
    pub fn from_latest(latest: Option<KeyAction>) -> Self {
        match latest {
            Some(KeyAction::Delivered) => KeyState::CheckedOut,
            Some(KeyAction::Returned) | None => KeyState::Available,
        }
    }

    pub fn apply(self, action: KeyAction) -> Result<KeyState, DoubleCheckout> {
        match (self, action) {
            (KeyState::CheckedOut, KeyAction::Delivered) => Err(DoubleCheckout),
            (_, KeyAction::Delivered) => Ok(KeyState::CheckedOut),
            (_, KeyAction::Returned) => Ok(KeyState::Available),
        }
    }

    pub fn is_out(&self) -> bool {
        matches!(self, KeyState::CheckedOut)
    }

    pub fn label(&self) -> &'static str {
        match self {
            KeyState::Available => "available",
            KeyState::CheckedOut => "checked out",
        }
    }
}
