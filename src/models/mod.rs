pub mod equipment;
pub mod filters;
pub mod key_action;
pub mod key_event;
pub mod key_state;
pub mod movement;
pub mod room;
