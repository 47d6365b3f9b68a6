//! Preview of the report exactly as it is exported

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table},
    Frame,
};

use super::utils::day_style;
use crate::report::{RenderedTable, TableColumn};

/// Rows of the preview table: label, one cell per day, then the total
fn table_rows(table: &RenderedTable) -> Vec<Row<'static>> {
    let row = |label: &'static str, value: fn(&TableColumn) -> String, total: String| {
        let mut cells = vec![Cell::from(label).style(Style::default().add_modifier(Modifier::BOLD))];
        cells.extend(
            table
                .columns
                .iter()
                .map(|column| Cell::from(value(column)).style(day_style(column.kind))),
        );
        cells.push(Cell::from(total));
        Row::new(cells)
    };

    vec![
        row("Day", |c| c.day_name.clone(), String::new()),
        row("Date", |c| c.day_number.clone(), "Total".to_string()),
        row("Activity", |c| c.activity.clone(), table.total.clone())
            .style(Style::default().fg(Color::Yellow)),
    ]
}

fn header_lines(table: &RenderedTable) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled(
        table.title.clone(),
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    ))];

    if table.header.is_empty() {
        lines.push(Line::from(Span::styled(
            "No employee details configured (see `cra config --help`)",
            Style::default().fg(Color::Gray),
        )));
    }
    for (label, value) in &table.header {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", label), Style::default().fg(Color::Gray)),
            Span::raw(value.clone()),
        ]));
    }
    lines
}

pub fn render(f: &mut Frame, table: &RenderedTable, area: Rect) {
    let header_height = (table.header.len().max(1) + 3) as u16;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(header_height),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .split(area);

    let header = Paragraph::new(header_lines(table)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Preview ")
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(header, chunks[0]);

    let mut widths = vec![Constraint::Length(8)];
    widths.extend(table.columns.iter().map(|_| Constraint::Length(3)));
    widths.push(Constraint::Length(6));

    let grid = Table::new(table_rows(table), widths)
        .block(Block::default().borders(Borders::ALL))
        .column_spacing(0);
    f.render_widget(grid, chunks[1]);

    let footer = Paragraph::new(vec![
        Line::from(vec![
            Span::styled("   ", Style::default().bg(Color::DarkGray)),
            Span::raw(" weekend   "),
            Span::styled("   ", Style::default().bg(Color::Gray)),
            Span::raw(" public holiday"),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("Generated on {}", table.generated_at),
            Style::default().fg(Color::Gray),
        )),
    ]);
    f.render_widget(footer, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::build_month_view;
    use crate::config::ReportHeader;
    use crate::holidays::HolidaySet;
    use crate::period::Period;
    use crate::report::render_table;
    use chrono::NaiveDate;

    fn may_2024_table(header: &ReportHeader) -> RenderedTable {
        let mut view = build_month_view(
            Period::new(2024, 5).unwrap(),
            &HolidaySet::from_iter(["2024-05-01", "2024-05-08"]),
        );
        view.fill_all_working_days(0.5);
        let generated_at = NaiveDate::from_ymd_opt(2024, 5, 31)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap();
        render_table(&view, header, generated_at)
    }

    #[test]
    fn test_three_rows() {
        let table = may_2024_table(&ReportHeader::default());
        assert_eq!(table_rows(&table).len(), 3);
    }

    #[test]
    fn test_header_lines() {
        let header = ReportHeader {
            employee_name: "Camille Martin".to_string(),
            ..Default::default()
        };
        let lines = header_lines(&may_2024_table(&header));
        assert_eq!(lines.len(), 2);

        let empty = header_lines(&may_2024_table(&ReportHeader::default()));
        assert_eq!(empty.len(), 2);
        assert!(empty[1].spans[0].content.contains("cra config"));
    }
}
