use std::fs;
use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use log::{error, info};
use rusqlite::Connection;

/// SQLite file name, resolved against the working directory at startup.
pub const DB_FILE_NAME: &str = "employees.db";

/// Owner of the single long-lived SQLite connection. The controller holds one
/// of these for the lifetime of the process; every read and write goes
/// through [`EmployeeStore::run`].
pub struct EmployeeStore {
    pub(super) conn: Connection,
}

impl EmployeeStore {
    /// Open (or create) the database file at `path` and make sure the
    /// `employees` table exists.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let started_at = Instant::now();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).context("failed to create data directory")?;
        }

        let conn = match Connection::open(path) {
            Ok(conn) => conn,
            Err(err) => {
                error!(
                    "event=db_open module=db status=error mode=file path={} error={}",
                    path.display(),
                    err
                );
                return Err(err).context("failed to open SQLite database");
            }
        };

        let store = Self { conn };
        store.ensure_schema()?;
        info!(
            "event=db_open module=db status=ok mode=file path={} duration_ms={}",
            path.display(),
            started_at.elapsed().as_millis()
        );
        Ok(store)
    }

    /// In-memory database with the schema applied. Used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory database")?;
        let store = Self { conn };
        store.ensure_schema()?;
        info!("event=db_open module=db status=ok mode=memory");
        Ok(store)
    }

    /// Create the `employees` table if it is missing. Safe to run on every
    /// startup.
    pub fn ensure_schema(&self) -> Result<()> {
        self.conn
            .execute(
                "CREATE TABLE IF NOT EXISTS employees (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    name TEXT,
                    title TEXT,
                    salary REAL
                )",
                [],
            )
            .context("failed to create employees table")?;
        Ok(())
    }
}
