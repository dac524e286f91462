use std::fmt::Write;

use crate::{
    history::entities::Status,
    insights::{
        pie::PieSlice,
        series::{max_week_value, MonthPoint, PointStatus, WeekdayPoint},
        stats::YearStats,
    },
};

use super::{point_status, Palette};

const BAR_WIDTH: u32 = 20;
/// A month never has more days than this, the stacked bar is scaled against it.
const MAX_MONTH_DAYS: u32 = 31;

fn bar(value: u32, max: u32, width: u32) -> String {
    let filled = if max == 0 {
        0
    } else {
        (value.min(max) as u64 * width as u64).div_ceil(max as u64)
    };
    "█".repeat(filled as usize)
}

pub fn render_weekly(series: &[WeekdayPoint], palette: Palette) -> String {
    let max = max_week_value(series);
    let mut out = String::new();
    for point in series {
        let _ = writeln!(
            out,
            "{}  {:<6}\t{:>3}  {}",
            point.label,
            point.full_date,
            point.value,
            palette.paint(point.status, &bar(point.value, max, BAR_WIDTH))
        );
    }
    out
}

pub fn render_monthly(series: &[MonthPoint], palette: Palette) -> String {
    let mut out = String::new();
    for month in series {
        let stacked = [
            (Status::Green, month.green),
            (Status::Blue, month.blue),
            (Status::Red, month.red),
        ]
        .into_iter()
        .map(|(status, days)| palette.paint_status(status, &bar(days, MAX_MONTH_DAYS, MAX_MONTH_DAYS)))
        .collect::<String>();

        let _ = writeln!(
            out,
            "{}\t{:>2}/{:>2}/{:>2}\t{:>4} tasks  {}",
            month.label, month.green, month.blue, month.red, month.total_tasks, stacked
        );
    }
    out
}

/// Cells of a `width` wide bar taken by each slice. Boundaries are rounded from the cumulative
/// offsets so the cells always add up to `width`, and a non-empty slice keeps at least one cell.
fn ring_widths(pie: &[PieSlice], width: u32) -> Vec<u32> {
    let boundary = |percent: f64| (percent / 100. * width as f64).round() as u32;
    let mut widths = pie
        .iter()
        .map(|slice| {
            let start = boundary(slice.arc_offset_percent);
            let end = boundary(slice.arc_offset_percent + slice.arc_length_percent);
            end.saturating_sub(start).max(1)
        })
        .collect::<Vec<_>>();

    let mut excess = widths.iter().sum::<u32>().saturating_sub(width);
    while excess > 0 {
        let Some(widest) = widths.iter_mut().filter(|w| **w > 1).max_by_key(|w| **w) else {
            break;
        };
        *widest -= 1;
        excess -= 1;
    }
    widths
}

pub fn render_stats(year: i32, stats: &YearStats, pie: &[PieSlice], palette: Palette) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Year {year}");
    let _ = writeln!(out, "Active days\t{}", stats.active_days);
    let _ = writeln!(out, "Longest streak\t{} days", stats.max_streak);
    for (status, name) in [
        (Status::Green, "Perfect"),
        (Status::Blue, "Partial"),
        (Status::Red, "Incomplete"),
    ] {
        let _ = writeln!(
            out,
            "{}\t{}\t{}",
            palette.paint_status(status, name),
            stats.count(status),
            stats.share(status)
        );
    }

    if pie.is_empty() {
        out.push_str(&palette.paint(PointStatus::None, &"░".repeat(BAR_WIDTH as usize)));
    } else {
        for (slice, width) in pie.iter().zip(ring_widths(pie, BAR_WIDTH)) {
            out.push_str(&palette.paint(point_status(slice.key), &"█".repeat(width as usize)));
        }
    }
    out.push('\n');
    out
}
