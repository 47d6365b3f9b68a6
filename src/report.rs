//! Report table rendering
//!
//! The month view is laid out once as a `RenderedTable`; both the preview
//! screen and the PDF exporter draw from it, so what is previewed is what
//! gets exported.

use chrono::NaiveDateTime;

use crate::calendar::{DayEntry, MonthView};
use crate::config::ReportHeader;
use crate::ledger::{format_units, parse_units};
use crate::period::Period;

/// Month and year of an exported report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportMetadata {
    pub month_name: String,
    pub year: i32,
}

impl ReportMetadata {
    pub fn from_period(period: Period) -> Self {
        ReportMetadata {
            month_name: period.month_name(),
            year: period.year(),
        }
    }

    /// `CRA <MonthName> <Year>.pdf`
    pub fn file_name(&self) -> String {
        format!("CRA {} {}.pdf", self.month_name, self.year)
    }

    pub fn title(&self) -> String {
        format!("CRA - {} {}", self.month_name, self.year)
    }
}

/// How a day column is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayKind {
    Working,
    Weekend,
    Holiday,
}

impl DayKind {
    /// A public holiday on a weekend counts as a holiday
    pub fn of(day: &DayEntry) -> Self {
        if day.is_holiday {
            DayKind::Holiday
        } else if day.is_weekend {
            DayKind::Weekend
        } else {
            DayKind::Working
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TableColumn {
    pub day_name: String,
    pub day_number: String,
    /// Formatted units, empty when unset, invalid or not a working day
    pub activity: String,
    pub kind: DayKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    pub title: String,
    /// Label/value pairs of the identity block, empty fields left out
    pub header: Vec<(String, String)>,
    pub columns: Vec<TableColumn>,
    pub total: String,
    pub generated_at: String,
}

impl RenderedTable {
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

fn header_lines(header: &ReportHeader) -> Vec<(String, String)> {
    [
        ("Employee", &header.employee_name),
        ("Email", &header.employee_email),
        ("Company", &header.company_name),
        ("Manager", &header.manager_name),
        ("Manager email", &header.manager_email),
    ]
    .into_iter()
    .filter(|(_, value)| !value.trim().is_empty())
    .map(|(label, value)| (label.to_string(), value.trim().to_string()))
    .collect()
}

/// Lay out `view` as a report table
pub fn render_table(
    view: &MonthView,
    header: &ReportHeader,
    generated_at: NaiveDateTime,
) -> RenderedTable {
    let metadata = ReportMetadata::from_period(view.period());

    let columns = view
        .days()
        .iter()
        .map(|day| {
            let kind = DayKind::of(day);
            let activity = match kind {
                DayKind::Working => day
                    .activity
                    .as_deref()
                    .and_then(parse_units)
                    .map(format_units)
                    .unwrap_or_default(),
                _ => String::new(),
            };
            TableColumn {
                day_name: day.day_name.to_string(),
                day_number: day.day_number.clone(),
                activity,
                kind,
            }
        })
        .collect();

    RenderedTable {
        title: metadata.title(),
        header: header_lines(header),
        columns,
        total: format_units(view.compute_total()),
        generated_at: generated_at.format("%d/%m/%Y %H:%M:%S").to_string(),
    }
}
