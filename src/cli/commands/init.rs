use crate::cli::parser::Cli;
use crate::config::Config;
use crate::db::initialize::open_db;
use crate::db::log::audit;
use crate::errors::AppResult;
use crate::utils::path::expand_db_path;

/// Handle the `init` command
///
/// This initializes:
///  - the config directory and file (skipped with `--test`)
///  - the SQLite database
///  - all pending DB migrations
pub fn handle(cli: &Cli) -> AppResult<()> {
    let db_path = match &cli.db {
        Some(custom) => Config::resolve_db_name(Some(&expand_db_path(custom))),
        None => Config::resolve_db_name(None),
    };

    let cfg = Config::init_all(&db_path, cli.test)?;

    println!("⚙️  Initializing rKeyTrack…");
    if !cli.test {
        println!("📄 Config file : {}", Config::config_file().display());
    }
    println!("🗄️  Database   : {}", &cfg.database);

    let pool = open_db(&cfg.database)?;

    println!("✅ Database initialized at {}", &cfg.database);

    audit(
        &pool.conn,
        "init",
        "Database initialized",
        &format!("Database initialized at {}", &cfg.database),
    );

    println!("🎉 rKeyTrack initialization completed!");
    Ok(())
}
