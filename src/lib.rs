//! rKeyTrack library root.
//! Exposes the CLI parser, the high-level run() function, and the
//! data-integrity layer (normalization, validation, persistence, services).

pub mod cli;
pub mod config;
pub mod core;
pub mod db;
pub mod errors;
pub mod export;
pub mod import;
pub mod models;
pub mod ui;
pub mod utils;

use clap::Parser;
use cli::parser::{Cli, Commands};
use config::Config;
use core::actor::Actor;
use errors::AppResult;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use utils::path::expand_db_path;

/// Central command dispatcher
pub fn dispatch(cli: &Cli, cfg: &Config) -> AppResult<()> {
    let actor = Actor::from_config(cfg, cli.user.as_deref());

    match &cli.command {
        Commands::Init => cli::commands::init::handle(cli),
        Commands::Config { .. } => cli::commands::config::handle(&cli.command, cfg),
        Commands::Db { .. } => cli::commands::db::handle(&cli.command, cfg),
        Commands::Log { .. } => cli::commands::log::handle(&cli.command, cfg),
        Commands::Backup { .. } => cli::commands::backup::handle(&cli.command, cfg),
        Commands::Export { .. } => cli::commands::export::handle(&cli.command, cfg),
        Commands::Key(sub) => cli::commands::key::handle(sub, cfg, &actor),
        Commands::Room(sub) => cli::commands::room::handle(sub, cfg),
        Commands::Equipment(sub) => cli::commands::equipment::handle(sub, cfg, &actor),
    }
}

/// Diagnostics go to stderr; `RUST_LOG` wins over the configured level.
fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    // A second init (tests calling run() twice) is harmless.
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .try_init();
}

/// Entry point used by main.rs
pub fn run() -> AppResult<()> {
    // 1️⃣ parse CLI
    let cli = Cli::parse();

    // 2️⃣ load config once
    let mut cfg = Config::load()?;
    init_tracing(&cfg.log_level);

    // 3️⃣ command-line override of the DB path
    if let Some(custom_db) = &cli.db {
        cfg.database = expand_db_path(custom_db);
    } else {
        cfg.database = expand_db_path(&cfg.database);
    }

    // 4️⃣ hand everything to the dispatcher
    dispatch(&cli, &cfg)
}
