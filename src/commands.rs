//! Non-interactive command handlers

use chrono::Local;
use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use crate::cache::HolidayCache;
use crate::calendar::MonthView;
use crate::config::{Config, ReportHeader};
use crate::error::Result;
use crate::export::export_to_document;
use crate::holidays::{
    CachedHolidaySource, Holiday, HolidayClient, HolidaySource, OfflineHolidaySource,
};
use crate::period::{self, Period};
use crate::report::DayKind;
use crate::session::{HolidayEvent, ReportSession};
use crate::utils::{self, format_days, Timer};

/// Where holidays come from for this run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Provider, read through the on-disk cache
    #[default]
    Cached,
    /// Provider, ignoring cached years
    Refresh,
    /// On-disk cache only
    Offline,
}

fn load_cache() -> HolidayCache {
    match HolidayCache::load() {
        Ok(cache) => cache,
        Err(e) => {
            tracing::warn!(error = %e, "Holiday cache unavailable, starting empty");
            let path = HolidayCache::get_cache_path()
                .unwrap_or_else(|| PathBuf::from("holidays_cache.json"));
            HolidayCache::with_path(path)
        }
    }
}

/// Build the holiday source for `mode`
pub fn holiday_source(config: &Config, mode: SourceMode) -> Result<Arc<dyn HolidaySource>> {
    let cache = load_cache();
    let source: Arc<dyn HolidaySource> = match mode {
        SourceMode::Offline => Arc::new(OfflineHolidaySource::new(cache)),
        SourceMode::Cached => Arc::new(CachedHolidaySource::new(
            HolidayClient::from_config(config)?,
            cache,
        )),
        SourceMode::Refresh => Arc::new(
            CachedHolidaySource::new(HolidayClient::from_config(config)?, cache).refreshing(),
        ),
    };
    Ok(source)
}

/// Open a session and wait until its holidays are known
async fn resolved_session(period: Period, source: Arc<dyn HolidaySource>) -> ReportSession {
    let timer = Timer::new("Holiday lookup");
    let mut session = ReportSession::new(period, source);
    match session.wait_for_holidays().await {
        Some(HolidayEvent::Failed { year, reason }) => {
            eprintln!(
                "Warning: public holidays for {} unavailable ({}), none are marked",
                year, reason
            );
        }
        Some(HolidayEvent::Loaded { year, count }) => {
            tracing::info!(year, count, "Public holidays loaded");
        }
        None => {}
    }
    timer.stop_and_log();
    session
}

/// Plain-text rendering of a month view
pub fn format_month_table(view: &MonthView) -> String {
    let period = view.period();
    let mut out = String::new();

    let _ = writeln!(out, "CRA - {} {}", period.month_name(), period.year());
    let _ = writeln!(out, "{:<12} {:<4} {}", "Date", "Day", "Activity");
    let _ = writeln!(out, "{}", "-".repeat(30));
    for day in view.days() {
        let activity = match DayKind::of(day) {
            DayKind::Holiday => "holiday",
            DayKind::Weekend => "weekend",
            DayKind::Working => day.activity.as_deref().unwrap_or("-"),
        };
        let _ = writeln!(
            out,
            "{:<12} {:<4} {}",
            day.date.format("%Y-%m-%d"),
            day.day_name,
            activity
        );
    }
    let _ = writeln!(out, "{}", "-".repeat(30));
    let _ = writeln!(
        out,
        "Total: {} ({} working days)",
        format_days(view.compute_total()),
        view.working_days().count()
    );
    out
}

/// Print the month table
pub async fn show(config: &Config, period: Period, mode: SourceMode) -> Result<()> {
    let session = resolved_session(period, holiday_source(config, mode)?).await;
    print!("{}", format_month_table(session.view()));
    Ok(())
}

/// Activity edits applied before exporting
#[derive(Debug, Clone, Default)]
pub struct ExportRequest {
    /// Units written on every working day first
    pub fill: Option<f64>,
    /// `DATE=UNITS` assignments applied after the fill
    pub assignments: Vec<String>,
    pub output_dir: Option<PathBuf>,
}

/// Apply `request` to the view of `session`
pub fn apply_edits(session: &mut ReportSession, request: &ExportRequest) -> Result<()> {
    if let Some(units) = request.fill {
        let total = session.view_mut().fill_all_working_days(units);
        tracing::debug!(units, total, "Filled working days");
    }
    for assignment in &request.assignments {
        let (date, units) = utils::parse_assignment(assignment)?;
        session.view_mut().set_activity(date, &units)?;
    }
    Ok(())
}

/// Build the report for `period` and write it as a PDF
pub async fn export(
    config: &Config,
    period: Period,
    request: &ExportRequest,
    mode: SourceMode,
) -> Result<PathBuf> {
    let mut session = resolved_session(period, holiday_source(config, mode)?).await;
    apply_edits(&mut session, request)?;
    if config.header.is_empty() {
        eprintln!("Warning: no employee details configured (see `cra config --help`)");
    }

    let table = session.render(&config.header, Local::now().naive_local());
    let output_dir = request
        .output_dir
        .clone()
        .unwrap_or_else(|| config.output_dir());
    let path = export_to_document(Some(&table), &session.metadata(), &output_dir)?;

    println!(
        "Exported {} (total {})",
        path.display(),
        format_days(session.total())
    );
    Ok(path)
}

pub fn format_holidays(year: i32, holidays: &[Holiday]) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Public holidays {}", year);
    for holiday in holidays {
        let _ = writeln!(
            out,
            "  {}  {}",
            holiday.date,
            utils::truncate_string(&holiday.name, 40)
        );
    }
    let _ = writeln!(out, "{} holidays", holidays.len());
    out
}

/// List the public holidays of `year`
pub async fn holidays(config: &Config, year: i32, mode: SourceMode) -> Result<()> {
    let year = period::check_year(year)?;
    let source = holiday_source(config, mode)?;
    let mut holidays = source.fetch_holidays(year).await?;
    holidays.sort_by(|a, b| a.date.cmp(&b.date));
    print!("{}", format_holidays(year, &holidays));
    Ok(())
}

/// Header and output changes requested on the command line
#[derive(Debug, Clone, Default)]
pub struct ConfigUpdate {
    pub employee_name: Option<String>,
    pub employee_email: Option<String>,
    pub company_name: Option<String>,
    pub manager_name: Option<String>,
    pub manager_email: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub holiday_api_url: Option<String>,
}

impl ConfigUpdate {
    pub fn is_empty(&self) -> bool {
        self.employee_name.is_none()
            && self.employee_email.is_none()
            && self.company_name.is_none()
            && self.manager_name.is_none()
            && self.manager_email.is_none()
            && self.output_dir.is_none()
            && self.holiday_api_url.is_none()
    }

    pub fn apply(self, config: &mut Config) {
        let header: &mut ReportHeader = &mut config.header;
        if let Some(value) = self.employee_name {
            header.employee_name = value;
        }
        if let Some(value) = self.employee_email {
            header.employee_email = value;
        }
        if let Some(value) = self.company_name {
            header.company_name = value;
        }
        if let Some(value) = self.manager_name {
            header.manager_name = value;
        }
        if let Some(value) = self.manager_email {
            header.manager_email = value;
        }
        if let Some(dir) = self.output_dir {
            config.output_dir = Some(dir);
        }
        if let Some(url) = self.holiday_api_url {
            config.holiday_api_url = url;
        }
    }
}

/// Show the configuration, saving it first when `update` changes something
pub fn configure(mut config: Config, update: ConfigUpdate) -> Result<()> {
    if !update.is_empty() {
        update.apply(&mut config);
        let path = config.save()?;
        println!("Configuration saved to {}", path.display());
    } else if let Some(path) = Config::get_config_path() {
        println!("Configuration file: {}", path.display());
    }
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::build_month_view;
    use crate::error::{CraError, ValidationError};
    use crate::holidays::HolidaySet;
    use crate::loader::tests::{holiday, GatedSource};

    #[test]
    fn test_format_month_table() {
        let mut view = build_month_view(
            Period::new(2024, 5).unwrap(),
            &HolidaySet::from_iter(["2024-05-01", "2024-05-08"]),
        );
        view.fill_all_working_days(0.5);
        let table = format_month_table(&view);

        assert!(table.starts_with("CRA - May 2024\n"));
        assert!(table.contains("2024-05-01   We   holiday"));
        assert!(table.contains("2024-05-04   Sa   weekend"));
        assert!(table.contains("2024-05-02   Th   0.5"));
        assert!(table.contains("Total: 10.5 days (21 working days)"));
    }

    #[test]
    fn test_format_holidays() {
        let out = format_holidays(2024, &[holiday("2024-05-01")]);
        assert!(out.contains("Public holidays 2024"));
        assert!(out.contains("2024-05-01"));
        assert!(out.contains("1 holidays"));
    }

    #[tokio::test]
    async fn test_apply_edits() {
        let source = Arc::new(GatedSource::default());
        let gate = source.gate(2024);
        let mut session = ReportSession::new(Period::new(2024, 5).unwrap(), source.clone());
        gate.send(Ok(vec![holiday("2024-05-01"), holiday("2024-05-08")]))
            .unwrap();
        session.wait_for_holidays().await.unwrap();

        let request = ExportRequest {
            fill: Some(0.5),
            assignments: vec!["2024-05-02=1".to_string()],
            output_dir: None,
        };
        apply_edits(&mut session, &request).unwrap();
        assert_eq!(session.total(), 11.0);

        let weekend = ExportRequest {
            assignments: vec!["2024-05-04=1".to_string()],
            ..Default::default()
        };
        assert!(apply_edits(&mut session, &weekend).is_err());
        assert_eq!(session.total(), 11.0);
    }

    #[tokio::test]
    async fn test_holidays_rejects_out_of_range_year() {
        let result = holidays(&Config::default(), 0, SourceMode::Offline).await;
        assert!(matches!(
            result,
            Err(CraError::Validation(ValidationError::InvalidYear(0)))
        ));
    }

    #[test]
    fn test_config_update() {
        let mut config = Config::default();
        let update = ConfigUpdate {
            employee_name: Some("Camille Martin".to_string()),
            output_dir: Some(PathBuf::from("reports")),
            ..Default::default()
        };
        assert!(!update.is_empty());
        update.apply(&mut config);

        assert_eq!(config.header.employee_name, "Camille Martin");
        assert_eq!(config.output_dir(), PathBuf::from("reports"));
        assert!(ConfigUpdate::default().is_empty());
    }
}
