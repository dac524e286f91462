use std::fmt::Display;

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;

use crate::{
    history::entities::{DailyRecord, History, Status},
    utils::time::{narrow_weekday, short_month_name, week_start_sunday},
};

/// Status of a chart point. Days without a record are `none`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointStatus {
    None,
    Green,
    Blue,
    Red,
}

impl From<Option<&DailyRecord>> for PointStatus {
    fn from(record: Option<&DailyRecord>) -> Self {
        match record.map(DailyRecord::status) {
            None => PointStatus::None,
            Some(Status::Green) => PointStatus::Green,
            Some(Status::Blue) => PointStatus::Blue,
            Some(Status::Red) => PointStatus::Red,
        }
    }
}

impl Display for PointStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PointStatus::None => write!(f, "none"),
            PointStatus::Green => write!(f, "green"),
            PointStatus::Blue => write!(f, "blue"),
            PointStatus::Red => write!(f, "red"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WeekdayPoint {
    pub label: &'static str,
    pub value: u32,
    pub status: PointStatus,
    pub full_date: String,
    #[serde(skip)]
    pub date: NaiveDate,
}

/// Completed task counts for the Sunday starting week that contains `reference`.
pub fn weekly_series(history: &History, reference: NaiveDate) -> Vec<WeekdayPoint> {
    let start = week_start_sunday(reference);
    start
        .iter_days()
        .take(7)
        .map(|date| {
            let record = history.get(&date);
            WeekdayPoint {
                label: narrow_weekday(date.weekday()),
                value: record.map_or(0, DailyRecord::completed),
                status: record.into(),
                full_date: date.format("%b %-d").to_string(),
                date,
            }
        })
        .collect()
}

/// Highest bar of the weekly chart, never below 1 so it can be used as a divisor.
pub fn max_week_value(series: &[WeekdayPoint]) -> u32 {
    series.iter().map(|p| p.value).max().unwrap_or(0).max(1)
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct MonthPoint {
    pub label: &'static str,
    pub green: u32,
    pub blue: u32,
    pub red: u32,
    pub total_tasks: u64,
}

impl MonthPoint {
    pub fn days(&self) -> u32 {
        self.green + self.blue + self.red
    }
}

/// Per month day counts and completed tasks of `year`. Always twelve entries.
pub fn monthly_series(history: &History, year: i32) -> Vec<MonthPoint> {
    let mut months = (0..12)
        .map(|m| MonthPoint {
            label: short_month_name(m),
            ..Default::default()
        })
        .collect::<Vec<_>>();

    let range = match (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) {
        (Some(first), Some(last)) => history.range(first..=last),
        _ => return months,
    };

    for (date, record) in range {
        let month = &mut months[date.month0() as usize];
        match record.status() {
            Status::Green => month.green += 1,
            Status::Blue => month.blue += 1,
            Status::Red => month.red += 1,
        }
        month.total_tasks += record.completed() as u64;
    }
    months
}

/// Moves `date` by whole weeks, used by the CLI to step through the weekly chart.
pub fn shift_weeks(date: NaiveDate, weeks: i64) -> NaiveDate {
    let days = Days::new(weeks.unsigned_abs() * 7);
    if weeks >= 0 {
        date.checked_add_days(days)
    } else {
        date.checked_sub_days(days)
    }
    .unwrap_or(date)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use crate::history::entities::{DailyRecord, History};

    use super::{max_week_value, monthly_series, weekly_series, PointStatus};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn weekly_series_starts_on_sunday() {
        let mut history = History::new();
        let wednesday = date(2026, 3, 4);
        history.insert(wednesday, DailyRecord::from_counts(wednesday, 5, 3));

        let series = weekly_series(&history, wednesday);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, date(2026, 3, 1));
        assert_eq!(
            series.iter().map(|p| p.label).collect::<String>(),
            "SMTWTFS"
        );
        assert_eq!(series[3].value, 3);
        assert_eq!(series[3].status, PointStatus::Blue);
        assert_eq!(series[3].full_date, "Mar 4");
        assert_eq!(series[0].status, PointStatus::None);
        assert_eq!(series[0].value, 0);
        assert_eq!(max_week_value(&series), 3);
    }

    #[test]
    fn weekly_series_on_sunday_and_across_years() {
        let sunday = date(2026, 3, 1);
        assert_eq!(weekly_series(&History::new(), sunday)[0].date, sunday);

        let series = weekly_series(&History::new(), date(2026, 1, 1));
        assert_eq!(series[0].date, date(2025, 12, 28));
        assert_eq!(series[6].date, date(2026, 1, 3));
        assert_eq!(max_week_value(&series), 1);
    }

    #[test]
    fn monthly_series_always_has_twelve_entries() {
        let mut history = History::new();
        for month in 1..=12 {
            let d = date(2026, month, 10);
            history.insert(d, DailyRecord::from_counts(d, 5, 5));
        }
        let prior = date(2025, 6, 10);
        history.insert(prior, DailyRecord::from_counts(prior, 5, 5));

        let series = monthly_series(&history, 2026);
        assert_eq!(series.len(), 12);
        assert!(series.iter().all(|m| m.total_tasks == 5 && m.green == 1));
        assert_eq!(series[0].label, "Jan");
        assert_eq!(series[11].label, "Dec");

        let empty = monthly_series(&history, 2030);
        assert_eq!(empty.len(), 12);
        assert!(empty.iter().all(|m| m.days() == 0 && m.total_tasks == 0));
    }

    #[test]
    fn monthly_totals_hold_large_counts() {
        let mut history = History::new();
        for d in [1, 2] {
            let day = date(2026, 1, d);
            history.insert(day, DailyRecord::from_counts(day, u32::MAX, u32::MAX));
        }
        let january = &monthly_series(&history, 2026)[0];
        assert_eq!(january.total_tasks, 2 * u32::MAX as u64);
        assert_eq!(january.green, 2);
    }

    #[test]
    fn monthly_series_splits_statuses() {
        let mut history = History::new();
        for (d, total, completed) in [(1, 2, 2), (2, 2, 1), (3, 2, 0), (4, 0, 0)] {
            let day = date(2026, 2, d);
            history.insert(day, DailyRecord::from_counts(day, total, completed));
        }
        let february = &monthly_series(&history, 2026)[1];
        assert_eq!((february.green, february.blue, february.red), (1, 1, 2));
        assert_eq!(february.total_tasks, 3);
    }
}
