use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::{Employee, EmployeeDraft};

/// Text fields bound to the editable employee attributes.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum FormField {
    #[default]
    Name,
    Title,
    Salary,
}

impl FormField {
    pub const ALL: [FormField; 3] = [FormField::Name, FormField::Title, FormField::Salary];

    pub fn label(self) -> &'static str {
        match self {
            FormField::Name => "Name",
            FormField::Title => "Title",
            FormField::Salary => "Salary",
        }
    }
}

/// Raw contents of the three input fields. The id of the selected row is
/// never copied in here; the controller keeps it through the selection.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EmployeeForm {
    name: String,
    title: String,
    salary: String,
}

impl EmployeeForm {
    pub fn value(&self, field: FormField) -> &str {
        match field {
            FormField::Name => &self.name,
            FormField::Title => &self.title,
            FormField::Salary => &self.salary,
        }
    }

    fn value_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Name => &mut self.name,
            FormField::Title => &mut self.title,
            FormField::Salary => &mut self.salary,
        }
    }

    pub fn set(&mut self, field: FormField, value: &str) {
        *self.value_mut(field) = value.to_string();
    }

    /// Append a printable character to `field`.
    pub fn push_char(&mut self, field: FormField, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(field).push(ch);
        true
    }

    pub fn backspace(&mut self, field: FormField) {
        self.value_mut(field).pop();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Copy name, title and salary from a table row.
    pub fn fill_from(&mut self, employee: &Employee) {
        self.name = employee.name.clone();
        self.title = employee.title.clone();
        self.salary = employee.salary.to_input();
    }

    /// True when no field is empty. Whitespace counts as content. Only the
    /// add command enforces this.
    pub fn is_complete(&self) -> bool {
        FormField::ALL
            .iter()
            .all(|field| !self.value(*field).is_empty())
    }

    /// Field values exactly as typed.
    pub fn draft(&self) -> EmployeeDraft {
        EmployeeDraft::from_input(&self.name, &self.title, &self.salary)
    }

    pub(crate) fn value_len(&self, field: FormField) -> usize {
        self.value(field).chars().count()
    }

    /// Render a single labelled line for the form widget.
    pub(crate) fn build_line(&self, field: FormField, is_active: bool) -> Line<'static> {
        let value = self.value(field);

        let display = if value.is_empty() && !is_active {
            "<empty>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{:<width$}", format!("{}:", field.label()), width = LABEL_WIDTH)),
            Span::styled(display, style),
        ])
    }
}

/// Column where field values start, so the three inputs line up.
pub(crate) const LABEL_WIDTH: usize = 8;

/// Severity of a modal dialog.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DialogKind {
    Info,
    Error,
}

/// Modal message box. While one is open it swallows every key except the
/// ones that dismiss it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Dialog {
    pub kind: DialogKind,
    pub title: String,
    pub message: String,
}

impl Dialog {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Info,
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind: DialogKind::Error,
            title: title.into(),
            message: message.into(),
        }
    }
}
