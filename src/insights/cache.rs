use std::sync::{Arc, Mutex};

use serde::Serialize;
use tracing::{debug, trace};

use crate::history::entities::HistorySnapshot;

use super::{
    grid::{build_week_grid, month_labels, MonthLabel, Week},
    pie::{pie_slices, PieSlice},
    series::{monthly_series, MonthPoint},
    stats::{compute_year_stats, YearStats},
};

/// Everything the year view renders. Computed once per `(history version, year)`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YearInsights {
    pub year: i32,
    pub grid: Vec<Week>,
    pub month_labels: Vec<MonthLabel>,
    pub stats: YearStats,
    pub monthly: Vec<MonthPoint>,
    pub pie: Vec<PieSlice>,
}

impl YearInsights {
    pub fn compute(snapshot: &HistorySnapshot, year: i32) -> Self {
        let history = snapshot.records();
        let grid = build_week_grid(history, year);
        let stats = compute_year_stats(history, year);
        Self {
            year,
            month_labels: month_labels(&grid),
            grid,
            stats,
            monthly: monthly_series(history, year),
            pie: pie_slices(&stats),
        }
    }
}

type CacheKey = (u64, i32);

/// Memoizes the last computed [YearInsights]. Only the most recent key is kept: a new history
/// version or another year replaces the entry.
#[derive(Default)]
pub struct InsightsCache {
    last: Mutex<Option<(CacheKey, Arc<YearInsights>)>>,
}

impl InsightsCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, snapshot: &HistorySnapshot, year: i32) -> Arc<YearInsights> {
        let key = (snapshot.version(), year);
        let mut last = self.last.lock().unwrap_or_else(|e| e.into_inner());

        if let Some((cached_key, insights)) = last.as_ref() {
            if *cached_key == key {
                trace!("Insights cache hit {key:?}");
                return insights.clone();
            }
        }

        debug!("Computing insights for {key:?}");
        let insights = Arc::new(YearInsights::compute(snapshot, year));
        *last = Some((key, insights.clone()));
        insights
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::NaiveDate;

    use crate::history::entities::{DailyRecord, History, HistorySnapshot};

    use super::InsightsCache;

    #[test]
    fn same_key_is_memoized() {
        let cache = InsightsCache::new();
        let snapshot = HistorySnapshot::new(1, History::new());

        let first = cache.get(&snapshot, 2026);
        let second = cache.get(&snapshot, 2026);
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn new_version_or_year_recomputes() {
        let cache = InsightsCache::new();
        let snapshot = HistorySnapshot::new(1, History::new());
        let before = cache.get(&snapshot, 2026);
        assert_eq!(before.stats.active_days, 0);

        let date = NaiveDate::from_ymd_opt(2026, 3, 1).unwrap();
        let updated = snapshot.with_record(DailyRecord::from_counts(date, 4, 4));
        assert_eq!(updated.version(), 2);

        let after = cache.get(&updated, 2026);
        assert!(!Arc::ptr_eq(&before, &after));
        assert_eq!(after.stats.green, 1);
        assert_eq!(after.pie.len(), 1);

        let other_year = cache.get(&updated, 2027);
        assert_eq!(other_year.year, 2027);
        assert_eq!(other_year.stats.active_days, 0);
        assert!(other_year.pie.is_empty());
    }

    #[test]
    fn absent_history_is_empty() {
        let cache = InsightsCache::new();
        let insights = cache.get(&HistorySnapshot::from_optional(0, None), 2027);
        assert_eq!(insights.monthly.len(), 12);
        assert!(insights.grid.iter().flatten().all(|c| c.record.is_none()));
    }
}
