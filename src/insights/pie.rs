use serde::Serialize;

use crate::history::entities::Status;

use super::stats::YearStats;

/// One arc of the status ring. Percentages are of the ring circumference, the offset is where the
/// arc starts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSlice {
    pub key: Status,
    pub value: u32,
    pub color_token: &'static str,
    pub arc_length_percent: f64,
    pub arc_offset_percent: f64,
}

/// Splits the ring between the non-empty categories, in green, blue, red order, each arc starting
/// where the previous ended. A year without activity yields no slices, and the consumer draws the
/// neutral ring.
pub fn pie_slices(stats: &YearStats) -> Vec<PieSlice> {
    if stats.total_active == 0 {
        return vec![];
    }
    let whole = stats.total_active as f64;
    let mut offset = 0.;

    Status::ALL
        .into_iter()
        .map(|status| (status, stats.count(status)))
        .filter(|(_, value)| *value > 0)
        .map(|(key, value)| {
            let length = value as f64 / whole * 100.;
            let slice = PieSlice {
                key,
                value,
                color_token: key.color_token(),
                arc_length_percent: length,
                arc_offset_percent: offset,
            };
            offset += length;
            slice
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use crate::{history::entities::Status, insights::stats::YearStats};

    use super::pie_slices;

    fn stats(green: u32, blue: u32, red: u32) -> YearStats {
        YearStats {
            green,
            blue,
            red,
            total_active: green + blue + red,
            active_days: green + blue + red,
            max_streak: 0,
        }
    }

    #[test]
    fn empty_year_has_no_slices() {
        assert!(pie_slices(&YearStats::default()).is_empty());
    }

    #[test]
    fn slices_are_contiguous_and_complete() {
        let slices = pie_slices(&stats(1, 1, 1));
        assert_eq!(slices.len(), 3);
        let total: f64 = slices.iter().map(|s| s.arc_length_percent).sum();
        assert!((total - 100.).abs() < 1e-9);

        for pair in slices.windows(2) {
            let end = pair[0].arc_offset_percent + pair[0].arc_length_percent;
            assert!((pair[1].arc_offset_percent - end).abs() < 1e-9);
        }
        assert_eq!(slices[0].arc_offset_percent, 0.);
    }

    #[test]
    fn zero_categories_are_dropped() {
        let slices = pie_slices(&stats(3, 0, 1));
        assert_eq!(slices.len(), 2);
        assert_eq!(slices[0].key, Status::Green);
        assert_eq!(slices[0].arc_length_percent, 75.);
        assert_eq!(slices[1].key, Status::Red);
        assert_eq!(slices[1].arc_offset_percent, 75.);
        assert_eq!(slices[1].color_token, "#ef4444");
    }
}
