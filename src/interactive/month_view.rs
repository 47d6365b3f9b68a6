//! Month table with the selectable day

use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use super::app::App;
use super::utils::{day_style, selected_style};
use crate::calendar::DayEntry;
use crate::ledger::{format_units, parse_units};
use crate::report::DayKind;
use crate::utils::{format_days, truncate_string};

/// Activity column text and its colour
fn activity_cell(day: &DayEntry) -> Cell<'static> {
    match (DayKind::of(day), day.activity.as_deref()) {
        (DayKind::Holiday, _) => Cell::from("public holiday"),
        (DayKind::Weekend, _) => Cell::from("weekend"),
        (DayKind::Working, None) => Cell::from("-").style(Style::default().fg(Color::DarkGray)),
        (DayKind::Working, Some(text)) => match parse_units(text) {
            Some(units) => {
                Cell::from(format_units(units)).style(Style::default().fg(Color::Yellow))
            }
            None => Cell::from(format!("{} (ignored)", truncate_string(text, 12)))
                .style(Style::default().fg(Color::Red)),
        },
    }
}

pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let view = app.session.view();

    let header = Row::new(vec!["Date", "Day", "Activity"])
        .style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
        .height(1);

    let rows: Vec<Row> = view
        .days()
        .iter()
        .map(|day| {
            Row::new(vec![
                Cell::from(day.date.format("%d/%m/%Y").to_string()),
                Cell::from(day.day_name),
                activity_cell(day),
            ])
            .style(day_style(DayKind::of(day)))
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(4),
        Constraint::Min(16),
    ];

    let title = format!(
        " {} {} - {} working days - Total {} ",
        view.period().month_name(),
        view.period().year(),
        view.working_days().count(),
        format_days(view.compute_total())
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .highlight_style(selected_style())
        .highlight_symbol("▶ ")
        .column_spacing(1);

    let mut state = TableState::default();
    state.select(Some(app.selected));
    f.render_stateful_widget(table, area, &mut state);
}
