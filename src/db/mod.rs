pub mod equipment;
pub mod filter;
pub mod initialize;
pub mod key_events;
pub mod log;
pub mod migrate;
pub mod movements;
pub mod pool;
pub mod rooms;
pub mod stats;
pub mod txn;
