//! Monthly activity report (CRA) generator.
//!
//! Lists the days of a month with weekends and public holidays flagged,
//! records half-day activity units per working day, totals them and
//! exports the report as a PDF.

pub mod cache;
pub mod calendar;
pub mod commands;
pub mod config;
pub mod error;
pub mod export;
pub mod holidays;
pub mod interactive;
pub mod ledger;
pub mod loader;
pub mod logging;
pub mod period;
pub mod report;
pub mod session;
pub mod utils;

pub use calendar::{build_month_view, DayEntry, MonthView};
pub use config::{Config, ReportHeader};
pub use error::{CraError, Result};
pub use export::{export_to_document, ExportOptions};
pub use holidays::{Holiday, HolidayClient, HolidaySet, HolidaySource};
pub use period::Period;
pub use report::{render_table, RenderedTable, ReportMetadata};
pub use session::{HolidayEvent, ReportSession};
