//! Month view construction
//!
//! The view is rebuilt from scratch whenever the period or the holiday set
//! changes; entries are never patched in place.

use chrono::{Datelike, NaiveDate, Weekday};

use crate::holidays::HolidaySet;
use crate::period::Period;

/// One calendar day of the report
#[derive(Debug, Clone, PartialEq)]
pub struct DayEntry {
    pub date: NaiveDate,
    /// Two-letter weekday label, e.g. "Mo"
    pub day_name: &'static str,
    /// Zero-padded day of month, e.g. "05"
    pub day_number: String,
    pub is_weekend: bool,
    pub is_holiday: bool,
    /// Free text as typed by the user
    pub activity: Option<String>,
}

impl DayEntry {
    pub fn is_working_day(&self) -> bool {
        !self.is_weekend && !self.is_holiday
    }
}

/// Every day of a month, in ascending date order
#[derive(Debug, Clone, PartialEq)]
pub struct MonthView {
    pub(crate) period: Period,
    pub(crate) days: Vec<DayEntry>,
}

impl MonthView {
    pub fn period(&self) -> Period {
        self.period
    }

    pub fn days(&self) -> &[DayEntry] {
        &self.days
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DayEntry> {
        self.index_of(date).map(|i| &self.days[i])
    }

    pub(crate) fn index_of(&self, date: NaiveDate) -> Option<usize> {
        if !self.period.contains(date) {
            return None;
        }
        let index = (date - self.period.first_day()).num_days() as usize;
        (index < self.days.len()).then_some(index)
    }

    pub fn working_days(&self) -> impl Iterator<Item = &DayEntry> {
        self.days.iter().filter(|day| day.is_working_day())
    }

    pub fn holiday_count(&self) -> usize {
        self.days.iter().filter(|day| day.is_holiday).count()
    }
}

pub fn is_weekend(weekday: Weekday) -> bool {
    matches!(weekday, Weekday::Sat | Weekday::Sun)
}

/// Two-letter weekday label
pub fn weekday_label(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Mon => "Mo",
        Weekday::Tue => "Tu",
        Weekday::Wed => "We",
        Weekday::Thu => "Th",
        Weekday::Fri => "Fr",
        Weekday::Sat => "Sa",
        Weekday::Sun => "Su",
    }
}

/// Enumerate the days of `period`, flagging weekends and the dates of `holidays`.
///
/// An empty holiday set yields a provisional view in which no day is a holiday.
pub fn build_month_view(period: Period, holidays: &HolidaySet) -> MonthView {
    let end = period.end_exclusive();
    let mut days = Vec::with_capacity(period.days_in_month() as usize);

    let mut current = Some(period.first_day());
    while let Some(date) = current.filter(|date| *date < end) {
        let weekday = date.weekday();
        days.push(DayEntry {
            date,
            day_name: weekday_label(weekday),
            day_number: format!("{:02}", date.day()),
            is_weekend: is_weekend(weekday),
            is_holiday: holidays.contains(date),
            activity: None,
        });
        current = date.succ_opt();
    }

    tracing::debug!(
        %period,
        days = days.len(),
        holidays = holidays.len(),
        "Built month view"
    );

    MonthView { period, days }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn may_2024_holidays() -> HolidaySet {
        HolidaySet::from_iter(["2024-05-01", "2024-05-08"])
    }

    #[test]
    fn test_every_month_has_the_right_length_and_order() {
        for year in [1999, 2000, 2023, 2024, 2100] {
            for month in 1..=12 {
                let period = Period::new(year, month).unwrap();
                let view = build_month_view(period, &HolidaySet::empty());

                assert_eq!(view.len() as u32, period.days_in_month());
                assert_eq!(view.days()[0].date, period.first_day());
                assert_eq!(
                    view.days().last().unwrap().date,
                    period.end_exclusive().pred_opt().unwrap()
                );
                assert!(view.days().windows(2).all(|w| w[0].date < w[1].date));
            }
        }
    }

    #[test]
    fn test_weekend_flags_match_reference_weekdays() {
        // 2024-05-04 is a Saturday, 2024-05-05 a Sunday
        let view = build_month_view(Period::new(2024, 5).unwrap(), &HolidaySet::empty());
        for day in view.days() {
            let expected = matches!(day.date.weekday(), Weekday::Sat | Weekday::Sun);
            assert_eq!(day.is_weekend, expected, "{}", day.date);
        }
        let saturday = view.get(NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()).unwrap();
        assert!(saturday.is_weekend);
        assert_eq!(saturday.day_name, "Sa");
        assert_eq!(view.days().iter().filter(|d| d.is_weekend).count(), 8);
    }

    #[test]
    fn test_labels() {
        let view = build_month_view(Period::new(2024, 5).unwrap(), &HolidaySet::empty());
        let first = &view.days()[0];
        assert_eq!(first.day_number, "01");
        assert_eq!(first.day_name, "We");
        assert_eq!(view.days()[30].day_number, "31");
        assert!(view.days().iter().all(|d| d.activity.is_none()));
    }

    #[test]
    fn test_holidays_flagged_exactly() {
        let view = build_month_view(Period::new(2024, 5).unwrap(), &may_2024_holidays());
        let flagged: Vec<_> = view
            .days()
            .iter()
            .filter(|d| d.is_holiday)
            .map(|d| d.date.format("%Y-%m-%d").to_string())
            .collect();
        assert_eq!(flagged, vec!["2024-05-01", "2024-05-08"]);
        assert_eq!(view.holiday_count(), 2);
        assert_eq!(view.working_days().count(), 21);
    }

    #[test]
    fn test_holidays_of_other_months_are_ignored() {
        let view = build_month_view(Period::new(2024, 6).unwrap(), &may_2024_holidays());
        assert_eq!(view.holiday_count(), 0);
    }

    #[test]
    fn test_december_rolls_into_next_year() {
        let view = build_month_view(Period::new(2024, 12).unwrap(), &HolidaySet::empty());
        assert_eq!(view.len(), 31);
        assert_eq!(
            view.days().last().unwrap().date,
            NaiveDate::from_ymd_opt(2024, 12, 31).unwrap()
        );
    }

    #[test]
    fn test_get_outside_month() {
        let view = build_month_view(Period::new(2024, 2).unwrap(), &HolidaySet::empty());
        assert!(view.get(NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()).is_some());
        assert!(view.get(NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()).is_none());
    }
}
