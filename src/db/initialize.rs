use crate::db::migrate::run_pending_migrations;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use rusqlite::Connection;
use std::fs;
use std::path::Path;

/// Initialize the database.
/// Delegates all schema creation / upgrades to the migration engine.
pub fn init_db(conn: &mut Connection) -> AppResult<()> {
    run_pending_migrations(conn)
}

/// Open (creating if needed) the store at `path` and bring its schema up to date.
pub fn open_db(path: &str) -> AppResult<DbPool> {
    if let Some(parent) = Path::new(path).parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let mut pool = DbPool::new(path)?;
    init_db(&mut pool.conn)?;
    Ok(pool)
}

/// In-memory store with the full schema.
pub fn open_in_memory() -> AppResult<DbPool> {
    let mut pool = DbPool::in_memory()?;
    init_db(&mut pool.conn)?;
    Ok(pool)
}
