use thiserror::Error;

use super::forms::Dialog;
use super::helpers::surface_error;

/// The five actions exposed as on-screen buttons.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Add,
    Remove,
    Update,
    Search,
    ShowAll,
}

impl Command {
    /// Button order, left to right.
    pub const ALL: [Command; 5] = [
        Command::Add,
        Command::Remove,
        Command::Update,
        Command::Search,
        Command::ShowAll,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Command::Add => "Add",
            Command::Remove => "Remove",
            Command::Update => "Update",
            Command::Search => "Search",
            Command::ShowAll => "Show All",
        }
    }

    /// Ctrl-key shortcut that triggers the command from anywhere.
    pub fn shortcut(self) -> char {
        match self {
            Command::Add => 'a',
            Command::Remove => 'r',
            Command::Update => 'u',
            Command::Search => 'f',
            Command::ShowAll => 'l',
        }
    }

    pub fn from_shortcut(ch: char) -> Option<Self> {
        let ch = ch.to_ascii_lowercase();
        Self::ALL.into_iter().find(|command| command.shortcut() == ch)
    }

    /// Notice shown once the command went through, if it announces itself.
    pub(crate) fn success_message(self) -> Option<&'static str> {
        match self {
            Command::Add => Some("Employee added successfully."),
            Command::Remove => Some("Employee removed successfully."),
            Command::Update => Some("Employee updated successfully."),
            Command::Search | Command::ShowAll => None,
        }
    }
}

/// Why a command stopped before finishing.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Input rejected before the store was touched.
    #[error("{0}")]
    Validation(&'static str),
    /// The database refused the statement.
    #[error("database error: {0:#}")]
    Store(#[from] anyhow::Error),
}

impl CommandError {
    pub(crate) fn to_dialog(&self) -> Dialog {
        match self {
            CommandError::Validation(message) => Dialog::error("Error", *message),
            CommandError::Store(err) => Dialog::error("Database error", surface_error(err)),
        }
    }
}
