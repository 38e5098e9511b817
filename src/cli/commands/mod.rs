pub mod backup;
pub mod config;
pub mod db;
pub mod equipment;
pub mod export;
pub mod init;
pub mod key;
pub mod log;
pub mod room;

use crate::config::Config;
use crate::core::outcome::Outcome;
use crate::db::initialize::open_db;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::ui::messages::success;

/// Open the configured store, creating and migrating it as needed.
pub(crate) fn open_pool(cfg: &Config) -> AppResult<DbPool> {
    open_db(&cfg.database)
}

/// Print an accepted outcome's confirmation; turn a rejection into an error
/// so the process exits non-zero.
pub(crate) fn report<T>(outcome: Outcome<T>) -> AppResult<T> {
    match outcome {
        Ok(accepted) => {
            if let Some(msg) = &accepted.message {
                success(msg);
            }
            Ok(accepted.value)
        }
        Err(rejection) => Err(AppError::Rejected(rejection)),
    }
}
