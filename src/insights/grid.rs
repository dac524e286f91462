use chrono::{Datelike, NaiveDate};
use serde::Serialize;

use crate::{
    history::entities::{DailyRecord, History, Status},
    utils::time::{days_inclusive, short_month_name, week_end_saturday, week_start_sunday, year_bounds},
};

/// One square of the contribution calendar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub record: Option<DailyRecord>,
    pub month: &'static str,
    pub day_of_month: u32,
    /// Cells outside the year only pad the first and last week and shouldn't be interactive.
    pub in_selected_year: bool,
}

pub type Week = [CalendarCell; 7];

/// Builds the Sunday aligned week grid covering `year`. The first week starts on the Sunday on or
/// before Jan 1, the last one ends on the Saturday on or after Dec 31.
pub fn build_week_grid(history: &History, year: i32) -> Vec<Week> {
    let (first, last) = year_bounds(year);
    if first > last {
        return vec![];
    }
    let cells = days_inclusive(week_start_sunday(first), week_end_saturday(last))
        .map(|date| CalendarCell {
            date,
            record: history.get(&date).cloned(),
            month: short_month_name(date.month0()),
            day_of_month: date.day(),
            in_selected_year: date.year() == year,
        })
        .collect::<Vec<_>>();

    cells
        .chunks_exact(7)
        .filter_map(|week| Week::try_from(week.to_vec()).ok())
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthLabel {
    pub week_index: usize,
    pub label: &'static str,
}

/// Month labels above the grid: one per month, placed on the first week whose Sunday cell belongs
/// to the selected year and starts that month's run.
pub fn month_labels(grid: &[Week]) -> Vec<MonthLabel> {
    let mut labels = vec![];
    let mut current: Option<&'static str> = None;
    for (week_index, week) in grid.iter().enumerate() {
        let first = &week[0];
        if first.in_selected_year && current != Some(first.month) {
            labels.push(MonthLabel {
                week_index,
                label: first.month,
            });
            current = Some(first.month);
        }
    }
    labels
}

/// Hover text of a cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayTooltip {
    pub date: String,
    pub status_text: &'static str,
    pub details: String,
}

impl DayTooltip {
    pub fn describe(date: NaiveDate, record: Option<&DailyRecord>) -> Self {
        let status_text = match record.map(DailyRecord::status) {
            Some(Status::Green) => "Perfect",
            Some(Status::Blue) => "Partial",
            Some(Status::Red) => "Incomplete",
            None => "No Activity",
        };
        let details = match record {
            Some(r) => format!("{}/{} Tasks", r.completed(), r.total()),
            None => "0 Tasks".to_string(),
        };
        Self {
            date: date.format("%a, %b %-d, %Y").to_string(),
            status_text,
            details,
        }
    }
}

impl From<&CalendarCell> for DayTooltip {
    fn from(cell: &CalendarCell) -> Self {
        DayTooltip::describe(cell.date, cell.record.as_ref())
    }
}

/// Letter grade shown in the day detail view.
pub fn day_grade(record: Option<&DailyRecord>) -> &'static str {
    match record.map(DailyRecord::status) {
        Some(Status::Green) => "A+",
        Some(_) => "B",
        None => "N/A",
    }
}
