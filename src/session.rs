//! Report session: the selected period, its holidays and the month view
//!
//! Shared by the interactive UI and the command line. All mutation happens
//! on the caller's task; only the holiday fetch runs in the background.

use chrono::NaiveDateTime;
use std::sync::Arc;

use crate::calendar::{build_month_view, MonthView};
use crate::config::ReportHeader;
use crate::holidays::{HolidaySet, HolidaySource};
use crate::loader::{HolidayLoader, HolidayUpdate};
use crate::period::Period;
use crate::report::{render_table, RenderedTable, ReportMetadata};

/// What happened when a holiday fetch resolved
#[derive(Debug, Clone, PartialEq)]
pub enum HolidayEvent {
    Loaded { year: i32, count: usize },
    /// The fetch failed; the year is shown without holidays
    Failed { year: i32, reason: String },
}

pub struct ReportSession {
    period: Period,
    holidays: HolidaySet,
    view: MonthView,
    loader: HolidayLoader,
}

impl ReportSession {
    /// Open a session on `period` and start fetching its year's holidays.
    ///
    /// Must be called from within a tokio runtime.
    pub fn new(period: Period, source: Arc<dyn HolidaySource>) -> Self {
        let holidays = HolidaySet::empty();
        let view = build_month_view(period, &holidays);
        let mut loader = HolidayLoader::new(source);
        loader.request(period.year());

        ReportSession {
            period,
            holidays,
            view,
            loader,
        }
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn view(&self) -> &MonthView {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut MonthView {
        &mut self.view
    }

    pub fn holidays(&self) -> &HolidaySet {
        &self.holidays
    }

    pub fn is_loading(&self) -> bool {
        self.loader.is_loading()
    }

    pub fn total(&self) -> f64 {
        self.view.compute_total()
    }

    /// Switch to `period`, fetching holidays again when the year changes.
    ///
    /// The view is rebuilt from scratch; entered activity is discarded.
    pub fn select_period(&mut self, period: Period) {
        if period.year() != self.period.year() {
            self.holidays = HolidaySet::empty();
            self.loader.request(period.year());
        }
        self.period = period;
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.view = build_month_view(self.period, &self.holidays);
    }

    /// Apply a resolved fetch if it belongs to the selected year
    pub fn apply(&mut self, update: HolidayUpdate) -> Option<HolidayEvent> {
        if update.year != self.period.year() {
            tracing::debug!(year = update.year, "Ignoring holidays of a year no longer selected");
            return None;
        }

        let year = update.year;
        self.holidays = update.holidays;
        self.rebuild();

        Some(match update.error {
            Some(reason) => HolidayEvent::Failed { year, reason },
            None => HolidayEvent::Loaded {
                year,
                count: self.holidays.len(),
            },
        })
    }

    /// Apply the pending fetch if it has resolved, without waiting
    pub fn poll_holidays(&mut self) -> Option<HolidayEvent> {
        let update = self.loader.try_next()?;
        self.apply(update)
    }

    /// Wait for the pending fetch and apply it
    pub async fn wait_for_holidays(&mut self) -> Option<HolidayEvent> {
        let update = self.loader.next().await?;
        self.apply(update)
    }

    pub fn metadata(&self) -> ReportMetadata {
        ReportMetadata::from_period(self.period)
    }

    pub fn render(&self, header: &ReportHeader, generated_at: NaiveDateTime) -> RenderedTable {
        render_table(&self.view, header, generated_at)
    }

    /// Release the pending fetch; its result will have no effect
    pub fn shutdown(&mut self) {
        self.loader.cancel();
    }
}
