//! Application state and key handling for the interactive UI

use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::path::PathBuf;
use std::sync::Arc;

use crate::calendar::DayEntry;
use crate::config::Config;
use crate::export::export_to_document;
use crate::holidays::HolidaySource;
use crate::ledger::format_units;
use crate::period::Period;
use crate::report::RenderedTable;
use crate::session::{HolidayEvent, ReportSession};
use crate::utils::format_days;

use super::messages::{Message, MessageType};

/// Messages kept for the messages pane
const MAX_MESSAGES: usize = 50;

/// Application mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Month table with a selected day
    Edit,
    /// Typing the activity of the selected day
    EditActivity,
    /// Report laid out as it will be exported
    Preview,
    Help,
}

/// Main application state
pub struct App {
    pub session: ReportSession,
    pub config: Config,
    pub mode: AppMode,
    /// Mode to return to when leaving help
    previous_mode: AppMode,
    /// Index of the selected day in the month view
    pub selected: usize,
    /// Text being typed in `EditActivity`
    pub input: String,
    pub messages: Vec<Message>,
    /// Path of the last exported report
    pub last_export: Option<PathBuf>,
}

impl App {
    /// Open the current month. Must be called from within a tokio runtime.
    pub fn new(config: Config, source: Arc<dyn HolidaySource>) -> Self {
        Self::with_period(config, source, Period::current())
    }

    pub fn with_period(config: Config, source: Arc<dyn HolidaySource>, period: Period) -> Self {
        let session = ReportSession::new(period, source);
        let today = Local::now().date_naive();
        let selected = session
            .view()
            .days()
            .iter()
            .position(|day| day.date == today)
            .unwrap_or(0);

        App {
            session,
            config,
            mode: AppMode::Edit,
            previous_mode: AppMode::Edit,
            selected,
            input: String::new(),
            messages: vec![Message::new(
                MessageType::Info,
                format!("Loading public holidays for {}...", period.year()),
            )],
            last_export: None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.session.is_loading()
    }

    pub fn loading_message(&self) -> String {
        format!("Loading public holidays for {}...", self.session.period().year())
    }

    pub fn selected_day(&self) -> Option<&DayEntry> {
        self.session.view().days().get(self.selected)
    }

    fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_day().map(|day| day.date)
    }

    pub fn push_message(&mut self, message_type: MessageType, text: impl Into<String>) {
        self.messages.push(Message::new(message_type, text.into()));
        if self.messages.len() > MAX_MESSAGES {
            let excess = self.messages.len() - MAX_MESSAGES;
            self.messages.drain(..excess);
        }
    }

    /// Called on every UI tick: applies resolved holidays and prunes old notices
    pub fn tick(&mut self) {
        if let Some(event) = self.session.poll_holidays() {
            match event {
                HolidayEvent::Loaded { year, count } => self.push_message(
                    MessageType::Success,
                    format!("{} public holidays loaded for {}", count, year),
                ),
                HolidayEvent::Failed { year, reason } => self.push_message(
                    MessageType::Warning,
                    format!("Public holidays for {} unavailable: {}", year, reason),
                ),
            }
            self.clamp_selection();
        }
        self.messages
            .retain(|m| m.message_type == MessageType::Error || !m.is_expired());
    }

    /// Release the pending holiday fetch before leaving
    pub fn shutdown(&mut self) {
        self.session.shutdown();
    }

    /// Handle a key event; returns `false` when the application should exit
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Ok(false);
        }

        match self.mode {
            AppMode::Edit => self.handle_edit_mode(key),
            AppMode::EditActivity => {
                self.handle_input_mode(key);
                Ok(true)
            }
            AppMode::Preview => self.handle_preview_mode(key),
            AppMode::Help => {
                self.mode = self.previous_mode;
                Ok(true)
            }
        }
    }

    fn handle_edit_mode(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(false),
            KeyCode::Char('?') => self.show_help(),
            KeyCode::Left => self.change_period(self.session.period().previous()),
            KeyCode::Right => self.change_period(self.session.period().next()),
            KeyCode::PageUp => self.change_period(self.session.period().previous_year()),
            KeyCode::PageDown => self.change_period(self.session.period().next_year()),
            KeyCode::Home => self.change_period(Period::current()),
            KeyCode::Up => self.selected = self.selected.saturating_sub(1),
            KeyCode::Down => {
                if self.selected + 1 < self.session.view().len() {
                    self.selected += 1;
                }
            }
            KeyCode::Char('0') => self.set_selected_activity("0"),
            KeyCode::Char('h') | KeyCode::Char('H') => self.set_selected_activity("0.5"),
            KeyCode::Char('1') => self.set_selected_activity("1"),
            KeyCode::Enter => self.start_activity_input(),
            KeyCode::Delete | KeyCode::Backspace => self.clear_selected_activity(),
            KeyCode::Char('a') | KeyCode::Char('A') => self.fill_working_days(),
            KeyCode::Char('p') | KeyCode::Char('P') => self.mode = AppMode::Preview,
            _ => {}
        }
        Ok(true)
    }

    fn handle_input_mode(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.input.clear();
                self.mode = AppMode::Edit;
            }
            KeyCode::Enter => {
                let text = std::mem::take(&mut self.input);
                self.mode = AppMode::Edit;
                if text.trim().is_empty() {
                    self.clear_selected_activity();
                } else {
                    self.set_selected_activity(&text);
                }
            }
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_preview_mode(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return Ok(false),
            KeyCode::Char('?') => self.show_help(),
            KeyCode::Esc | KeyCode::Char('b') | KeyCode::Char('B') => self.mode = AppMode::Edit,
            KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter => self.export(),
            _ => {}
        }
        Ok(true)
    }

    fn show_help(&mut self) {
        self.previous_mode = self.mode;
        self.mode = AppMode::Help;
    }

    fn change_period(&mut self, period: Period) {
        if period == self.session.period() {
            return;
        }
        let year_changed = period.year() != self.session.period().year();
        self.session.select_period(period);
        self.clamp_selection();

        if year_changed {
            self.push_message(
                MessageType::Info,
                format!("Loading public holidays for {}...", period.year()),
            );
        }
        tracing::debug!(%period, "Period selected");
    }

    fn clamp_selection(&mut self) {
        let len = self.session.view().len();
        if self.selected >= len {
            self.selected = len.saturating_sub(1);
        }
    }

    fn set_selected_activity(&mut self, text: &str) {
        let Some(date) = self.selected_date() else {
            return;
        };
        match self.session.view_mut().set_activity(date, text) {
            Ok(()) => {
                if self.session.view().units_on(date).is_none() {
                    self.push_message(
                        MessageType::Warning,
                        format!("'{}' is not a number and is left out of the total", text.trim()),
                    );
                }
            }
            Err(e) => self.push_message(MessageType::Warning, e.to_string()),
        }
    }

    fn clear_selected_activity(&mut self) {
        if let Some(date) = self.selected_date() {
            if let Err(e) = self.session.view_mut().clear_activity(date) {
                self.push_message(MessageType::Warning, e.to_string());
            }
        }
    }

    fn start_activity_input(&mut self) {
        let Some(day) = self.selected_day() else {
            return;
        };
        if !day.is_working_day() {
            let reason = if day.is_holiday { "a public holiday" } else { "a weekend" };
            let text = format!("{} is {}", day.date.format("%d/%m/%Y"), reason);
            self.push_message(MessageType::Warning, text);
            return;
        }
        self.input = day.activity.clone().unwrap_or_default();
        self.mode = AppMode::EditActivity;
    }

    fn fill_working_days(&mut self) {
        let units = self.config.default_units;
        let total = self.session.view_mut().fill_all_working_days(units);
        let count = self.session.view().working_days().count();
        self.push_message(
            MessageType::Success,
            format!(
                "Marked {} working days with {} (total {})",
                count,
                format_units(units),
                format_days(total)
            ),
        );
    }

    /// The table shown in preview and written on export
    pub fn rendered_table(&self) -> RenderedTable {
        self.session
            .render(&self.config.header, Local::now().naive_local())
    }

    fn export(&mut self) {
        if self.config.header.is_empty() {
            self.push_message(
                MessageType::Warning,
                "No employee details configured (see `cra config --help`)",
            );
        }
        let table = self.rendered_table();
        let output_dir = self.config.output_dir();
        match export_to_document(Some(&table), &self.session.metadata(), &output_dir) {
            Ok(path) => {
                self.push_message(
                    MessageType::Success,
                    format!("Report saved to {}", path.display()),
                );
                self.last_export = Some(path);
            }
            Err(e) => {
                tracing::error!(error = %e, "Export failed");
                self.push_message(MessageType::Error, format!("Export failed: {}", e));
            }
        }
    }
}
