//! Persistence module split across logical submodules.

mod connection;
mod employees;
mod statement;

pub use connection::{EmployeeStore, DB_FILE_NAME};
pub use statement::Statement;
