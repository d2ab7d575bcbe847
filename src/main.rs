//! Binary entry point: open the employee database, load the table, and drive
//! the terminal UI until the user quits.
use employee_manager::{init_logging, run_app, App, AppConfig, EmployeeStore};

fn main() -> anyhow::Result<()> {
    let config = AppConfig::resolve();
    let _logger = init_logging(&config.log_level, &config.log_dir)?;

    let store = EmployeeStore::open(&config.db_path)?;
    let mut app = App::new(store);
    app.show_all();
    run_app(&mut app)
}
