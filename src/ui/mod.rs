//! Terminal front-end: the employee table, the three-field form, the five
//! command buttons, and the modal dialogs that report each outcome.

mod app;
mod commands;
mod forms;
mod helpers;
mod terminal;

pub use app::{App, Focus};
pub use commands::{Command, CommandError};
pub use forms::{Dialog, DialogKind, EmployeeForm, FormField};
pub use terminal::run_app;
