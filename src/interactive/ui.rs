//! Main UI rendering logic

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use super::app::{App, AppMode};
use super::utils::{get_message_style, spinner_frame};
use super::{month_view, report_view};

pub fn draw(f: &mut Frame, app: &App) {
    let size = f.size();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(10),   // Main content
            Constraint::Length(5), // Messages
            Constraint::Length(3), // Footer
        ])
        .split(size);

    render_header(f, app, chunks[0]);

    match app.mode {
        AppMode::Help => render_help(f, chunks[1]),
        AppMode::Preview => report_view::render(f, &app.rendered_table(), chunks[1]),
        AppMode::Edit | AppMode::EditActivity => month_view::render(f, app, chunks[1]),
    }

    render_messages(f, app, chunks[2]);
    render_footer(f, app, chunks[3]);

    if app.mode == AppMode::EditActivity {
        render_input_popup(f, app, size);
    }
    if app.is_loading() {
        render_loading_overlay(f, app, size);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let period = app.session.period();
    let employee = &app.config.header.employee_name;
    let title = if employee.trim().is_empty() {
        format!(" CRA - {} {} ", period.month_name(), period.year())
    } else {
        format!(
            " CRA - {} {} - {} ",
            period.month_name(),
            period.year(),
            employee
        )
    };

    let header = Paragraph::new(title)
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

    f.render_widget(header, area);
}

fn section(title: &'static str) -> Line<'static> {
    Line::from(Span::styled(
        title,
        Style::default().add_modifier(Modifier::BOLD),
    ))
}

fn render_help(f: &mut Frame, area: Rect) {
    let help_text = vec![
        Line::from(Span::styled(
            "Keyboard Shortcuts",
            Style::default()
                .add_modifier(Modifier::BOLD)
                .fg(Color::Cyan),
        )),
        Line::from(""),
        section("Navigation:"),
        Line::from("  ←/→           Previous / next month"),
        Line::from("  PgUp/PgDn     Previous / next year"),
        Line::from("  Home          Current month"),
        Line::from("  ↑/↓           Select day"),
        Line::from(""),
        section("Activity:"),
        Line::from("  0 / h / 1     Set 0, half a day or a full day"),
        Line::from("  Enter         Type the activity of the selected day"),
        Line::from("  Del           Clear the selected day"),
        Line::from("  a             Mark every working day with the default units"),
        Line::from(""),
        section("Report:"),
        Line::from("  p             Preview the report"),
        Line::from("  s / Enter     Export the previewed report as PDF"),
        Line::from("  Esc / b       Back to the month table"),
        Line::from(""),
        section("General:"),
        Line::from("  ?             Show this help"),
        Line::from("  q             Quit"),
        Line::from(""),
        Line::from(Span::styled(
            "Press any key to return...",
            Style::default().fg(Color::Gray),
        )),
    ];

    let paragraph = Paragraph::new(help_text).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Help ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

fn render_messages(f: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = app
        .messages
        .iter()
        .rev()
        .take(3)
        .rev()
        .map(|msg| {
            let style = get_message_style(msg.message_type);
            Line::from(vec![
                Span::styled(format!("{} ", msg.icon()), style),
                Span::styled(msg.text.as_str(), style),
            ])
        })
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Ready",
            Style::default().fg(Color::Gray),
        )));
    }

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Messages ")
            .border_style(Style::default().fg(Color::Cyan)),
    );

    f.render_widget(paragraph, area);
}

fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let shortcuts = match app.mode {
        AppMode::Edit => {
            "[←→] Month  [PgUp/PgDn] Year  [↑↓] Day  [0/h/1] Units  [Enter] Type  [Del] Clear  [a]ll  [p]review  [?] help  [q]uit"
        }
        AppMode::EditActivity => "[Enter] Save  [Esc] Cancel",
        AppMode::Preview => "[s/Enter] Export PDF  [Esc/b] Back  [?] help  [q]uit",
        AppMode::Help => "Press any key to return",
    };

    let footer = Paragraph::new(shortcuts)
        .style(Style::default().fg(Color::Gray))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

    f.render_widget(footer, area);
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn render_input_popup(f: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered(area, 40, 3);
    let title = app
        .selected_day()
        .map(|day| format!(" Activity {} ", day.date.format("%d/%m/%Y")))
        .unwrap_or_else(|| " Activity ".to_string());

    let input = Paragraph::new(Line::from(vec![
        Span::raw(app.input.as_str()),
        Span::styled("_", Style::default().add_modifier(Modifier::SLOW_BLINK)),
    ]))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::Yellow))
            .style(Style::default().bg(Color::Black)),
    );

    f.render_widget(Clear, popup_area);
    f.render_widget(input, popup_area);
}

fn render_loading_overlay(f: &mut Frame, app: &App, area: Rect) {
    let popup_area = centered(area, 50, 5);

    let loading_text = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(
                format!("{} ", spinner_frame()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(app.loading_message(), Style::default().fg(Color::White)),
        ]),
        Line::from(""),
    ];

    let paragraph = Paragraph::new(loading_text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Loading ")
                .border_style(Style::default().fg(Color::Cyan))
                .style(Style::default().bg(Color::Black)),
        )
        .alignment(Alignment::Center);

    f.render_widget(Clear, popup_area);
    f.render_widget(paragraph, popup_area);
}
