use crate::db::equipment::count_equipment;
use crate::db::key_events::{count_key_events, outstanding_keys};
use crate::db::migrate::current_version;
use crate::db::movements::count_movements;
use crate::db::pool::DbPool;
use crate::db::rooms::count_rooms;
use crate::errors::AppResult;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET, YELLOW};
use rusqlite::OptionalExtension;
use std::fs;

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> AppResult<()> {
    let conn = &pool.conn;
    println!();

    //
    // 1) FILE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}{}{}", CYAN, RESET, YELLOW, db_path, RESET);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);
    println!(
        "{}• Schema version:{} {}",
        CYAN,
        RESET,
        current_version(conn)?
    );

    //
    // 2) COUNTS
    //
    let counts = [
        ("Key events", count_key_events(conn)?),
        ("Keys out", outstanding_keys(conn)?.len() as i64),
        ("Rooms", count_rooms(conn)?),
        ("Equipment items", count_equipment(conn)?),
        ("Movements", count_movements(conn)?),
    ];
    for (label, n) in counts {
        println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, n, RESET);
    }

    //
    // 3) KEY HISTORY RANGE
    //
    let bounds: Option<(Option<String>, Option<String>)> = conn
        .query_row(
            "SELECT MIN(timestamp), MAX(timestamp) FROM key_events",
            [],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
        .optional()?;
    let (first, last) = bounds.unwrap_or((None, None));

    let placeholder = || format!("{GREY}--{RESET}");
    println!("{}• Key history:{}", CYAN, RESET);
    println!("    from: {}", first.unwrap_or_else(placeholder));
    println!("    to:   {}", last.unwrap_or_else(placeholder));

    println!();
    Ok(())
}
