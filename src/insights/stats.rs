use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    history::entities::{DailyRecord, History, Status},
    utils::{
        percentage::{ratio_percentage, Percentage},
        time::{days_inclusive, year_bounds},
    },
};

/// Rollup counters for one year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct YearStats {
    pub green: u32,
    pub blue: u32,
    pub red: u32,
    pub total_active: u32,
    pub active_days: u32,
    pub max_streak: u32,
}

impl YearStats {
    pub fn count(&self, status: Status) -> u32 {
        match status {
            Status::Green => self.green,
            Status::Blue => self.blue,
            Status::Red => self.red,
        }
    }

    /// Share of `status` among active days, 0 for an empty year.
    pub fn share(&self, status: Status) -> Percentage {
        ratio_percentage(self.count(status), self.total_active)
    }
}

/// Walks every day of `year` in order. A streak is a run of consecutive calendar days that have
/// any record at all, whatever their status.
pub fn compute_year_stats(history: &History, year: i32) -> YearStats {
    let (first, last) = year_bounds(year);
    let mut stats = YearStats::default();
    let mut streak = 0;

    for date in days_inclusive(first, last) {
        match history.get(&date) {
            Some(record) => {
                match record.status() {
                    Status::Green => stats.green += 1,
                    Status::Blue => stats.blue += 1,
                    Status::Red => stats.red += 1,
                }
                stats.active_days += 1;
                streak += 1;
                stats.max_streak = stats.max_streak.max(streak);
            }
            None => streak = 0,
        }
    }

    stats.total_active = stats.green + stats.blue + stats.red;
    stats
}

/// Rounded completion of one day, 0 when it has no tasks.
pub fn completion_percentage(record: &DailyRecord) -> Percentage {
    ratio_percentage(record.completed(), record.total())
}

/// Tasks completed over the whole history, regardless of year.
pub fn lifetime_completed(history: &History) -> u64 {
    history.values().map(|r| r.completed() as u64).sum()
}

/// Years offered by the year selector: every year with data plus the current one, newest first.
pub fn available_years(history: &History, today: NaiveDate) -> Vec<i32> {
    let mut years = history
        .keys()
        .map(|d| d.year())
        .collect::<BTreeSet<_>>();
    years.insert(today.year());
    years.into_iter().rev().collect()
}
