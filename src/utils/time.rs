use chrono::{Datelike, Days, NaiveDate, Weekday};

/// This is the standard way of converting a date to a history key in daymaker.
pub fn date_to_record_name(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Inverse of [date_to_record_name]. Returns `None` for keys that aren't ISO dates.
pub fn record_name_to_date(name: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(name, "%Y-%m-%d").ok()
}

/// First and last day of `year`. Falls back to the chrono limits for years chrono can't
/// represent, which yields an empty iteration rather than a panic.
pub fn year_bounds(year: i32) -> (NaiveDate, NaiveDate) {
    match (
        NaiveDate::from_ymd_opt(year, 1, 1),
        NaiveDate::from_ymd_opt(year, 12, 31),
    ) {
        (Some(start), Some(end)) => (start, end),
        _ => (NaiveDate::MAX, NaiveDate::MIN),
    }
}

/// Sunday on or before `date`.
pub fn week_start_sunday(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_sunday() as u64;
    date.checked_sub_days(Days::new(offset)).unwrap_or(date)
}

/// Saturday on or after `date`.
pub fn week_end_saturday(date: NaiveDate) -> NaiveDate {
    let offset = 6 - date.weekday().num_days_from_sunday() as u64;
    date.checked_add_days(Days::new(offset)).unwrap_or(date)
}

/// Inclusive ascending iterator over calendar days.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    start
        .iter_days()
        .take_while(move |day| *day <= end)
}

pub fn short_month_name(month0: u32) -> &'static str {
    const MONTHS: [&str; 12] = [
        "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
    ];
    MONTHS[month0 as usize % 12]
}

/// Single letter weekday label used by the weekly chart.
pub fn narrow_weekday(weekday: Weekday) -> &'static str {
    match weekday {
        Weekday::Sun | Weekday::Sat => "S",
        Weekday::Mon => "M",
        Weekday::Tue | Weekday::Thu => "T",
        Weekday::Wed => "W",
        Weekday::Fri => "F",
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, NaiveDate, Weekday};

    use super::{days_inclusive, record_name_to_date, week_end_saturday, week_start_sunday, year_bounds};

    #[test]
    fn week_alignment() {
        // 2026-01-01 is a Thursday
        let jan_first = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        let start = week_start_sunday(jan_first);
        assert_eq!(start, NaiveDate::from_ymd_opt(2025, 12, 28).unwrap());
        assert_eq!(start.weekday(), Weekday::Sun);

        let dec_last = NaiveDate::from_ymd_opt(2026, 12, 31).unwrap();
        let end = week_end_saturday(dec_last);
        assert_eq!(end, NaiveDate::from_ymd_opt(2027, 1, 2).unwrap());

        let sunday = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        assert_eq!(week_start_sunday(sunday), sunday);
    }

    #[test]
    fn leap_year_day_count() {
        let (start, end) = year_bounds(2028);
        assert_eq!(days_inclusive(start, end).count(), 366);
        let (start, end) = year_bounds(2026);
        assert_eq!(days_inclusive(start, end).count(), 365);
    }

    #[test]
    fn record_names() {
        assert_eq!(
            record_name_to_date("2026-03-14"),
            NaiveDate::from_ymd_opt(2026, 3, 14)
        );
        assert_eq!(record_name_to_date("not-a-date"), None);
    }
}
