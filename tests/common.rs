#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use chrono::NaiveDateTime;
use rkeytrack::db::initialize::open_db;
use rkeytrack::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn rkt() -> Command {
    cargo_bin_cmd!("rkeytrack")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_rkeytrack.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Fresh temp HOME holding a config file that grants `admin` the privileged capability.
pub fn temp_home_with_admin(name: &str, admin: &str) -> PathBuf {
    let mut home = env::temp_dir();
    home.push(format!("{}_rkeytrack_home", name));
    fs::remove_dir_all(&home).ok();
    let conf_dir = home.join(".rkeytrack");
    fs::create_dir_all(&conf_dir).expect("create config dir");
    fs::write(
        conf_dir.join("rkeytrack.conf"),
        format!("admin_users:\n  - {admin}\ndefault_user: operator\n"),
    )
    .expect("write config");
    home
}

/// Open (and migrate) a fresh store through the library API.
pub fn open_test_pool(name: &str) -> DbPool {
    let db_path = setup_test_db(name);
    open_db(&db_path).expect("open db")
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("valid timestamp")
}

/// Initialize a DB through the CLI (no config file written).
pub fn init_cli_db(db_path: &str) {
    rkt()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
}

/// Empty temp HOME so the CLI never reads a real user config.
pub fn temp_home(name: &str) -> PathBuf {
    let mut home = env::temp_dir();
    home.push(format!("{}_rkeytrack_home", name));
    fs::remove_dir_all(&home).ok();
    fs::create_dir_all(&home).expect("create temp home");
    home
}
