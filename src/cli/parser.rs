use crate::export::{ExportDataset, ExportFormat};
use clap::{Args, Parser, Subcommand};

/// Command-line interface definition for rKeyTrack
/// CLI application to track room-key loans and equipment inventory with SQLite
#[derive(Parser)]
#[command(
    name = "rkeytrack",
    version = env!("CARGO_PKG_VERSION"),
    about = "Room-key loans and equipment inventory with an audit trail, backed by SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Acting user id (defaults to `default_user` from the config)
    #[arg(global = true, long = "user")]
    pub user: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing configuration fields with defaults")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(
            long = "editor",
            help = "Specify the editor to use (vim, nano, or custom path)"
        )]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Write a .zip archive instead of a plain copy")]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing file without asking")]
        force: bool,
    },

    /// Export key history, inventory or movement ledger
    Export {
        #[arg(long, value_enum, default_value = "keys")]
        dataset: ExportDataset,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Room key loans and returns
    #[command(subcommand)]
    Key(KeyCommand),

    /// Room registry
    #[command(subcommand)]
    Room(RoomCommand),

    /// Equipment inventory and movements
    #[command(subcommand)]
    Equipment(EquipmentCommand),
}

#[derive(Subcommand)]
pub enum KeyCommand {
    /// Hand a room key to someone
    Deliver {
        /// Room label, e.g. "316F", "Sala 204", "bodega"
        room: String,

        #[arg(long, help = "Person receiving the key")]
        holder: String,

        #[arg(long, default_value = "", help = "Program or area of the holder")]
        area: String,

        #[arg(long = "at", help = "Timestamp (YYYY-MM-DD HH:MM:SS), default now")]
        at: Option<String>,
    },

    /// Take a room key back
    Return {
        room: String,

        #[arg(long, help = "Person returning the key (default: current holder)")]
        holder: Option<String>,

        #[arg(long, help = "Program or area (default: that of the delivery)")]
        area: Option<String>,

        #[arg(long = "at", help = "Timestamp (YYYY-MM-DD HH:MM:SS), default now")]
        at: Option<String>,
    },

    /// Show whether a room's key is out
    Status { room: String },

    /// List keys currently out
    Out,

    /// List key events
    List {
        #[command(flatten)]
        filter: KeyListArgs,

        #[arg(long, help = "Print delivered/returned counters instead of rows")]
        summary: bool,
    },

    /// Delete a key event (admin only)
    Del { id: i64 },
}

#[derive(Args, Debug, Default)]
pub struct KeyListArgs {
    #[arg(long)]
    pub room: Option<String>,

    #[arg(long, help = "Holder name substring")]
    pub holder: Option<String>,

    #[arg(long, help = "Area substring")]
    pub area: Option<String>,

    #[arg(long, help = "delivered | returned")]
    pub action: Option<String>,

    #[arg(
        long,
        short,
        help = "Filter by year/month/day or a custom range (e.g. 2025-01:2025-03)"
    )]
    pub period: Option<String>,
}

#[derive(Subcommand)]
pub enum RoomCommand {
    /// Register a room or update its details
    Add {
        code: String,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        building: Option<String>,

        #[arg(long)]
        floor: Option<String>,

        #[arg(long)]
        notes: Option<String>,
    },

    /// List registered rooms
    List,
}

#[derive(Subcommand)]
pub enum EquipmentCommand {
    /// Register a new item
    Add {
        name: String,

        #[arg(long = "type", help = "Equipment type, e.g. Laptop, Oscilloscope")]
        category: String,

        #[arg(long, default_value = "Available")]
        state: String,

        #[arg(long, default_value = "", help = "Room (empty = BODEGA)")]
        room: String,

        #[arg(long, default_value = "")]
        responsible: String,

        #[arg(long, help = "Unique asset tag (omit for consumables)")]
        tag: Option<String>,

        #[arg(long = "at", help = "Registration timestamp, default now")]
        at: Option<String>,
    },

    /// Update fields of an item (the room changes only with `move`)
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long = "type")]
        category: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        responsible: Option<String>,

        #[arg(long, conflicts_with = "clear_tag")]
        tag: Option<String>,

        #[arg(long = "clear-tag", help = "Remove the asset tag")]
        clear_tag: bool,
    },

    /// Delete an item and its movement history (admin only)
    Del { id: i64 },

    /// List inventory
    List {
        #[arg(long)]
        room: Option<String>,

        #[arg(long = "type")]
        category: Option<String>,

        #[arg(long)]
        state: Option<String>,

        #[arg(long)]
        tag: Option<String>,

        #[arg(long, help = "Name substring")]
        search: Option<String>,

        #[arg(long, short, help = "Registration date range")]
        period: Option<String>,
    },

    /// Move an item to another room
    Move {
        id: i64,

        #[arg(long = "to")]
        destination: String,

        #[arg(long)]
        reason: Option<String>,

        #[arg(long)]
        responsible: Option<String>,

        #[arg(long)]
        notes: Option<String>,

        #[arg(long = "at", help = "Timestamp, default now")]
        at: Option<String>,
    },

    /// Import items from a CSV file (all rows or none)
    Import {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, default_value = ",", help = "Field delimiter: , ; or tab")]
        delimiter: String,
    },

    /// Movement history
    History {
        #[arg(long)]
        id: Option<i64>,

        #[arg(long)]
        tag: Option<String>,

        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,

        #[arg(long, help = "Responsible substring")]
        responsible: Option<String>,

        #[arg(long, short)]
        period: Option<String>,
    },
}
