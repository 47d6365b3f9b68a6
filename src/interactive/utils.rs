//! Styling helpers for the interactive UI

use ratatui::style::{Color, Modifier, Style};
use std::time::{SystemTime, UNIX_EPOCH};

use super::messages::MessageType;
use crate::report::DayKind;

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

pub fn get_message_style(message_type: MessageType) -> Style {
    match message_type {
        MessageType::Info => Style::default().fg(Color::Cyan),
        MessageType::Success => Style::default().fg(Color::Green),
        MessageType::Warning => Style::default().fg(Color::Yellow),
        MessageType::Error => Style::default().fg(Color::Red),
    }
}

/// Shading of a day, matching the exported report
pub fn day_style(kind: DayKind) -> Style {
    match kind {
        DayKind::Working => Style::default(),
        DayKind::Weekend => Style::default().bg(Color::DarkGray).fg(Color::Gray),
        DayKind::Holiday => Style::default()
            .bg(Color::Gray)
            .fg(Color::Black)
            .add_modifier(Modifier::ITALIC),
    }
}

pub fn selected_style() -> Style {
    Style::default()
        .bg(Color::Cyan)
        .fg(Color::Black)
        .add_modifier(Modifier::BOLD)
}

/// Spinner frame for the current wall-clock time
pub fn spinner_frame() -> &'static str {
    let millis = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0);
    SPINNER_FRAMES[((millis / 100) % SPINNER_FRAMES.len() as u128) as usize]
}
