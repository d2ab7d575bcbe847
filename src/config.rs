//! Startup configuration. Nothing here is user-tunable: the database lives in
//! the working directory and logs go to the platform data directory, so the
//! struct mostly exists to keep `main.rs` readable and tests independent of
//! the real filesystem layout.

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::db::DB_FILE_NAME;

/// Application name used for the data directory and log file basename.
pub const APP_NAME: &str = "employee-manager";

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite file, relative to the working directory.
    pub db_path: PathBuf,
    /// Directory that receives rotating log files.
    pub log_dir: PathBuf,
    /// `flexi_logger` spec string such as `info` or `debug`.
    pub log_level: String,
}

impl AppConfig {
    pub fn resolve() -> Self {
        let log_dir = ProjectDirs::from("", "", APP_NAME)
            .map(|dirs| dirs.data_local_dir().join("logs"))
            .unwrap_or_else(|| PathBuf::from("logs"));

        Self {
            db_path: PathBuf::from(DB_FILE_NAME),
            log_dir,
            log_level: default_log_level().to_string(),
        }
    }
}

fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}
