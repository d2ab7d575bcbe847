use crossterm::event::KeyCode;
use log::{debug, info, warn};
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap,
};
use ratatui::Frame;

use crate::db::{EmployeeStore, Statement};
use crate::models::Employee;

use super::commands::{Command, CommandError};
use super::forms::{Dialog, DialogKind, EmployeeForm, FormField, LABEL_WIDTH};
use super::helpers::{centered_rect, key_hint};

/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Three field lines plus the block borders.
const FORM_HEIGHT: u16 = 5;
const BUTTON_HEIGHT: u16 = 3;
/// Rows skipped by PageUp/PageDown in the table.
const PAGE_STEP: isize = 5;

/// Which part of the window receives typed keys.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Focus {
    Field(FormField),
    Table,
    Buttons,
}

impl Focus {
    /// Tab order: the three fields, then the table, then the button row.
    fn next(self) -> Self {
        match self {
            Focus::Field(FormField::Name) => Focus::Field(FormField::Title),
            Focus::Field(FormField::Title) => Focus::Field(FormField::Salary),
            Focus::Field(FormField::Salary) => Focus::Table,
            Focus::Table => Focus::Buttons,
            Focus::Buttons => Focus::Field(FormField::Name),
        }
    }

    fn previous(self) -> Self {
        match self {
            Focus::Field(FormField::Name) => Focus::Buttons,
            Focus::Field(FormField::Title) => Focus::Field(FormField::Name),
            Focus::Field(FormField::Salary) => Focus::Field(FormField::Title),
            Focus::Table => Focus::Field(FormField::Salary),
            Focus::Buttons => Focus::Table,
        }
    }
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Window state plus the command handlers that bind it to the store.
///
/// `rows` is only ever a projection of the database: every mutation is
/// followed by a full reload, and a search replaces it with the matches.
pub struct App {
    store: EmployeeStore,
    rows: Vec<Employee>,
    selected: Option<usize>,
    form: EmployeeForm,
    focus: Focus,
    button: usize,
    dialog: Option<Dialog>,
    status: Option<StatusMessage>,
    search_term: Option<String>,
}

impl App {
    /// Build the controller around an open store. The table starts empty
    /// until [`App::show_all`] runs.
    pub fn new(store: EmployeeStore) -> Self {
        Self {
            store,
            rows: Vec::new(),
            selected: None,
            form: EmployeeForm::default(),
            focus: Focus::Field(FormField::Name),
            button: 0,
            dialog: None,
            status: None,
            search_term: None,
        }
    }

    pub fn rows(&self) -> &[Employee] {
        &self.rows
    }

    pub fn selected(&self) -> Option<&Employee> {
        self.selected.and_then(|idx| self.rows.get(idx))
    }

    pub fn form(&self) -> &EmployeeForm {
        &self.form
    }

    pub fn set_field(&mut self, field: FormField, value: &str) {
        self.form.set(field, value);
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }

    /// Term behind the current table contents, `None` when showing everything.
    pub fn search_term(&self) -> Option<&str> {
        self.search_term.as_deref()
    }

    pub fn store(&self) -> &EmployeeStore {
        &self.store
    }

    /// Insert the form contents as a new employee. Every field must be
    /// filled in.
    pub fn add(&mut self) {
        let outcome = self.try_add();
        self.finish(Command::Add, outcome);
    }

    /// Delete the selected employee.
    pub fn remove(&mut self) {
        let outcome = self.try_remove();
        self.finish(Command::Remove, outcome);
    }

    /// Overwrite the selected employee with the form contents. Unlike
    /// [`App::add`], blank fields are written as they are.
    pub fn update(&mut self) {
        let outcome = self.try_update();
        self.finish(Command::Update, outcome);
    }

    /// Replace the table with employees whose name contains the name field.
    pub fn search(&mut self) {
        let outcome = self.try_search();
        self.finish(Command::Search, outcome);
    }

    /// Reload every employee, dropping any search filter.
    pub fn show_all(&mut self) {
        let outcome = self.reload();
        self.finish(Command::ShowAll, outcome);
    }

    pub fn run_command(&mut self, command: Command) {
        match command {
            Command::Add => self.add(),
            Command::Remove => self.remove(),
            Command::Update => self.update(),
            Command::Search => self.search(),
            Command::ShowAll => self.show_all(),
        }
    }

    /// Highlight a table row and copy its attributes into the form.
    /// Out-of-range indexes are ignored.
    pub fn select(&mut self, index: usize) {
        if let Some(employee) = self.rows.get(index) {
            self.form.fill_from(employee);
            self.selected = Some(index);
        }
    }

    /// Drop the selection. The form keeps whatever it holds.
    pub fn deselect(&mut self) {
        self.selected = None;
    }

    fn try_add(&mut self) -> Result<(), CommandError> {
        if !self.form.is_complete() {
            return Err(CommandError::Validation("Please fill in all fields."));
        }
        self.store.run(&Statement::Insert(self.form.draft()))?;
        self.reload()?;
        self.form.clear();
        Ok(())
    }

    fn try_remove(&mut self) -> Result<(), CommandError> {
        let id = self
            .selected()
            .map(|employee| employee.id)
            .ok_or(CommandError::Validation(
                "Please select a record to remove.",
            ))?;
        self.store.run(&Statement::Delete { id })?;
        self.reload()?;
        Ok(())
    }

    fn try_update(&mut self) -> Result<(), CommandError> {
        let id = self
            .selected()
            .map(|employee| employee.id)
            .ok_or(CommandError::Validation(
                "Please select a record to update.",
            ))?;
        self.store.run(&Statement::Update {
            id,
            draft: self.form.draft(),
        })?;
        self.reload()?;
        self.form.clear();
        Ok(())
    }

    fn try_search(&mut self) -> Result<(), CommandError> {
        let term = self.form.value(FormField::Name).to_string();
        if term.is_empty() {
            return Err(CommandError::Validation("Please enter a search term."));
        }
        self.rows = self.store.search_by_name(&term)?;
        self.selected = None;
        self.search_term = Some(term);
        Ok(())
    }

    fn reload(&mut self) -> Result<(), CommandError> {
        self.rows = self.store.fetch_all()?;
        self.selected = None;
        self.search_term = None;
        Ok(())
    }

    /// Turn a command outcome into the dialog and footer the user sees.
    fn finish(&mut self, command: Command, outcome: Result<(), CommandError>) {
        match outcome {
            Ok(()) => {
                info!(
                    "event=command module=ui status=ok command={} rows={}",
                    command.label(),
                    self.rows.len()
                );
                if let Some(message) = command.success_message() {
                    self.dialog = Some(Dialog::info("Success", message));
                }
                let text = match &self.search_term {
                    Some(term) => format!("{} match(es) for \"{term}\".", self.rows.len()),
                    None => format!("{} employee(s).", self.rows.len()),
                };
                self.set_status(text, StatusKind::Info);
            }
            Err(err) => {
                match &err {
                    CommandError::Validation(_) => debug!(
                        "event=command module=ui status=rejected command={} reason=\"{}\"",
                        command.label(),
                        err
                    ),
                    CommandError::Store(_) => warn!(
                        "event=command module=ui status=error command={} error=\"{}\"",
                        command.label(),
                        err
                    ),
                }
                let dialog = err.to_dialog();
                self.set_status(dialog.message.clone(), StatusKind::Error);
                self.dialog = Some(dialog);
            }
        }
    }

    /// Handle a Ctrl-modified character. Returns `true` when the app should
    /// exit.
    pub fn handle_ctrl(&mut self, ch: char) -> bool {
        if matches!(ch, 'q' | 'Q' | 'c' | 'C') {
            return true;
        }
        if self.dialog.is_some() {
            return false;
        }
        if let Some(command) = Command::from_shortcut(ch) {
            self.run_command(command);
        }
        false
    }

    /// Handle an unmodified key press.
    pub fn handle_key(&mut self, code: KeyCode) {
        if self.dialog.is_some() {
            if matches!(code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                self.dismiss_dialog();
            }
            return;
        }

        match code {
            KeyCode::Tab => {
                self.focus = self.focus.next();
                return;
            }
            KeyCode::BackTab => {
                self.focus = self.focus.previous();
                return;
            }
            KeyCode::Esc => {
                self.deselect();
                self.clear_status();
                return;
            }
            _ => {}
        }

        match self.focus {
            Focus::Field(field) => match code {
                KeyCode::Char(ch) => {
                    self.form.push_char(field, ch);
                }
                KeyCode::Backspace => self.form.backspace(field),
                KeyCode::Enter => self.add(),
                KeyCode::Up => self.focus = self.focus.previous(),
                KeyCode::Down => self.focus = self.focus.next(),
                _ => {}
            },
            Focus::Table => match code {
                KeyCode::Up => self.move_selection(-1),
                KeyCode::Down => self.move_selection(1),
                KeyCode::PageUp => self.move_selection(-PAGE_STEP),
                KeyCode::PageDown => self.move_selection(PAGE_STEP),
                KeyCode::Home => self.select(0),
                KeyCode::End => self.select(self.rows.len().saturating_sub(1)),
                _ => {}
            },
            Focus::Buttons => match code {
                KeyCode::Left => {
                    self.button = (self.button + Command::ALL.len() - 1) % Command::ALL.len();
                }
                KeyCode::Right => self.button = (self.button + 1) % Command::ALL.len(),
                KeyCode::Enter | KeyCode::Char(' ') => self.run_command(Command::ALL[self.button]),
                _ => {}
            },
        }
    }

    fn move_selection(&mut self, offset: isize) {
        if self.rows.is_empty() {
            return;
        }
        let last = self.rows.len() - 1;
        let target = match self.selected {
            None if offset < 0 => last,
            None => 0,
            Some(current) => current.saturating_add_signed(offset).min(last),
        };
        self.select(target);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(3),
                Constraint::Length(FORM_HEIGHT),
                Constraint::Length(BUTTON_HEIGHT),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_table(frame, chunks[0]);
        self.draw_form(frame, chunks[1]);
        self.draw_buttons(frame, chunks[2]);
        self.draw_footer(frame, chunks[3]);

        if let Some(dialog) = &self.dialog {
            self.draw_dialog(frame, area, dialog);
        }
    }

    fn border_style(&self, focused: bool) -> Style {
        if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default()
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let title = match &self.search_term {
            Some(term) => format!("Employees (search: \"{term}\")"),
            None => "Employees".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.border_style(self.focus == Focus::Table));

        if self.rows.is_empty() {
            let message = if self.search_term.is_some() {
                "No employees match this search. Ctrl-L shows everyone."
            } else {
                "No employees yet. Fill in the form and press Ctrl-A to add one."
            };
            let paragraph = Paragraph::new(message)
                .block(block)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(["ID", "Name", "Title", "Salary"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.rows.iter().map(|employee| {
            Row::new(vec![
                Cell::from(employee.id.to_string()),
                Cell::from(employee.name.clone()),
                Cell::from(employee.title.clone()),
                Cell::from(Text::from(employee.salary.to_string()).alignment(Alignment::Right)),
            ])
        });

        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(40),
                Constraint::Percentage(35),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(self.selected);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let focused_field = match self.focus {
            Focus::Field(field) => Some(field),
            _ => None,
        };
        let title = match self.selected() {
            Some(employee) => format!("Employee #{}", employee.id),
            None => "New employee".to_string(),
        };
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(self.border_style(focused_field.is_some()));
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let lines: Vec<Line> = FormField::ALL
            .iter()
            .map(|field| self.form.build_line(*field, focused_field == Some(*field)))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if let (Some(field), None) = (focused_field, &self.dialog) {
            let row = FormField::ALL
                .iter()
                .position(|candidate| *candidate == field)
                .unwrap_or(0) as u16;
            let value_len = u16::try_from(self.form.value_len(field)).unwrap_or(u16::MAX);
            let label_width = u16::try_from(LABEL_WIDTH).unwrap_or(u16::MAX);
            let cursor_x = inner.x.saturating_add(label_width).saturating_add(value_len);
            let cursor_y = inner.y + row;
            if cursor_y < inner.y + inner.height {
                let right_edge = inner.x.saturating_add(inner.width);
                frame.set_cursor_position((cursor_x.min(right_edge), cursor_y));
            }
        }
    }

    fn draw_buttons(&self, frame: &mut Frame, area: Rect) {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, Command::ALL.len() as u32); Command::ALL.len()])
            .split(area);

        for (idx, (command, cell)) in Command::ALL.iter().zip(columns.iter()).enumerate() {
            let highlighted = self.focus == Focus::Buttons && idx == self.button;
            let style = if highlighted {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let button = Paragraph::new(Line::from(command.label()))
                .alignment(Alignment::Center)
                .style(style)
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(self.border_style(highlighted)),
                );
            frame.render_widget(button, *cell);
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let mut spans = Vec::new();
        if self.dialog.is_some() {
            spans.extend(key_hint("[Enter]", " Close   "));
            spans.extend(key_hint("[^Q]", " Quit"));
            return Line::from(spans);
        }

        match self.focus {
            Focus::Table => {
                spans.extend(key_hint("[↑↓]", " Select   "));
                spans.extend(key_hint("[PgUp/PgDn]", " Jump   "));
                spans.extend(key_hint("[Esc]", " Deselect   "));
            }
            Focus::Buttons => {
                spans.extend(key_hint("[←→]", " Choose   "));
                spans.extend(key_hint("[Enter]", " Press   "));
            }
            Focus::Field(_) => {
                spans.extend(key_hint("[Enter]", " Add   "));
            }
        }
        spans.extend(key_hint("[Tab]", " Next   "));
        spans.extend(key_hint("[^A]", " Add  "));
        spans.extend(key_hint("[^R]", " Remove  "));
        spans.extend(key_hint("[^U]", " Update  "));
        spans.extend(key_hint("[^F]", " Search  "));
        spans.extend(key_hint("[^L]", " Show All  "));
        spans.extend(key_hint("[^Q]", " Quit"));
        Line::from(spans)
    }

    fn draw_dialog(&self, frame: &mut Frame, area: Rect, dialog: &Dialog) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let accent = match dialog.kind {
            DialogKind::Info => Color::Green,
            DialogKind::Error => Color::Red,
        };
        let block = Block::default()
            .title(dialog.title.clone())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(accent));
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let lines = vec![
            Line::from(dialog.message.clone()),
            Line::from(""),
            Line::from(Span::styled(
                "Press Enter to close.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    use super::*;

    fn rendered(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn app_with(rows: &[(&str, &str, &str)]) -> App {
        let mut app = App::new(EmployeeStore::open_in_memory().unwrap());
        for (name, title, salary) in rows {
            app.set_field(FormField::Name, name);
            app.set_field(FormField::Title, title);
            app.set_field(FormField::Salary, salary);
            app.add();
            app.dismiss_dialog();
        }
        app
    }

    #[test]
    fn main_screen_shows_table_form_and_buttons() {
        let app = app_with(&[("Ana", "Clerk", "1000")]);
        let screen = rendered(&app);
        for expected in ["Employees", "Salary", "Ana", "1000.00", "New employee", "Show All"] {
            assert!(screen.contains(expected), "missing {expected:?}");
        }
    }

    #[test]
    fn validation_dialog_is_drawn_over_the_table() {
        let mut app = app_with(&[]);
        app.remove();
        let screen = rendered(&app);
        assert!(screen.contains("Please select a record to remove."));
        assert!(screen.contains("No employees yet."));
    }

    #[test]
    fn tab_cycles_through_every_region() {
        let mut app = app_with(&[]);
        let mut seen = vec![app.focus()];
        for _ in 0..4 {
            app.handle_key(KeyCode::Tab);
            seen.push(app.focus());
        }
        assert_eq!(
            seen,
            vec![
                Focus::Field(FormField::Name),
                Focus::Field(FormField::Title),
                Focus::Field(FormField::Salary),
                Focus::Table,
                Focus::Buttons,
            ]
        );
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Field(FormField::Name));
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.focus(), Focus::Buttons);
    }

    #[test]
    fn open_dialog_swallows_keys_until_dismissed() {
        let mut app = app_with(&[]);
        app.add();
        assert!(app.dialog().is_some());

        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.form().value(FormField::Name), "");
        assert!(!app.handle_ctrl('a'));

        app.handle_key(KeyCode::Enter);
        assert!(app.dialog().is_none());
        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.form().value(FormField::Name), "x");
    }

    #[test]
    fn arrow_keys_in_table_select_and_fill_form() {
        let mut app = app_with(&[("Ana", "Clerk", "1000"), ("Beto", "Clerk", "1200")]);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        app.handle_key(KeyCode::Tab);
        assert_eq!(app.focus(), Focus::Table);

        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected().map(|e| e.name.as_str()), Some("Ana"));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected().map(|e| e.name.as_str()), Some("Beto"));
        assert_eq!(app.form().value(FormField::Salary), "1200");

        app.handle_key(KeyCode::Esc);
        assert!(app.selected().is_none());
        assert_eq!(app.form().value(FormField::Name), "Beto");
    }

    #[test]
    fn button_row_runs_the_highlighted_command() {
        let mut app = app_with(&[("Ana", "Clerk", "1000")]);
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.focus(), Focus::Buttons);

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Enter);
        assert_eq!(app.rows().len(), 1);
        assert!(app.dialog().is_none());

        app.handle_key(KeyCode::Left);
        app.handle_key(KeyCode::Enter);
        assert_eq!(
            app.dialog().map(|d| d.message.as_str()),
            Some("Please enter a search term.")
        );
    }

    #[test]
    fn page_keys_jump_through_the_table() {
        let names = ["A", "B", "C", "D", "E", "F", "G"];
        let rows: Vec<(&str, &str, &str)> = names.iter().map(|n| (*n, "Clerk", "1")).collect();
        let mut app = app_with(&rows);
        app.handle_key(KeyCode::BackTab);
        app.handle_key(KeyCode::BackTab);
        assert_eq!(app.focus(), Focus::Table);

        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.selected().map(|e| e.name.as_str()), Some("A"));
        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.selected().map(|e| e.name.as_str()), Some("F"));
        app.handle_key(KeyCode::PageDown);
        assert_eq!(app.selected().map(|e| e.name.as_str()), Some("G"));
        app.handle_key(KeyCode::PageUp);
        assert_eq!(app.selected().map(|e| e.name.as_str()), Some("B"));
    }

    #[test]
    fn very_long_field_value_keeps_cursor_on_screen() {
        let mut app = app_with(&[]);
        app.set_field(FormField::Name, &"x".repeat(70_000));
        let screen = rendered(&app);
        assert!(screen.contains("Name:"));
    }

    #[test]
    fn ctrl_q_requests_exit() {
        let mut app = app_with(&[]);
        assert!(app.handle_ctrl('q'));
        assert!(!app.handle_ctrl('l'));
    }
}
