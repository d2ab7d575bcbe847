//! Core library surface for the Employee Manager terminal application.
//!
//! The binary only wires these pieces together; tests drive the same API to
//! exercise the store and the command handlers without a real terminal.
pub mod config;
pub mod db;
pub mod logging;
pub mod models;
pub mod ui;

/// Startup configuration and file logging.
pub use config::AppConfig;
pub use logging::init_logging;

/// The store and its typed statements.
pub use db::{EmployeeStore, Statement};

/// Domain types passed between the store and the UI.
pub use models::{Employee, EmployeeDraft, Salary};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
