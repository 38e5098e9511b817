pub mod actor;
pub mod backup;
pub mod config;
pub mod equipment;
pub mod import;
pub mod intake;
pub mod keys;
pub mod log;
pub mod normalize;
pub mod outcome;
pub mod relocate;
pub mod rooms;
pub mod validate;
