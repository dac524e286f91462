use std::fmt::Write;

use crate::insights::{
    grid::{MonthLabel, Week},
    series::PointStatus,
};

use super::{status_glyph, Palette};

const ROW_LABELS: [&str; 7] = ["Sun", "   ", "Tue", "   ", "Thu", "   ", "Sat"];
const CELL_WIDTH: usize = 2;

/// Renders the year as seven weekday rows with one column per week, GitHub style. Padding cells
/// of neighbouring years are left blank.
pub fn render_heatmap(grid: &[Week], labels: &[MonthLabel], palette: Palette) -> String {
    let mut out = String::new();

    let mut header = " ".repeat(4 + grid.len() * CELL_WIDTH);
    for label in labels {
        let start = 4 + label.week_index * CELL_WIDTH;
        let end = (start + label.label.len()).min(header.len());
        if start < end {
            header.replace_range(start..end, &label.label[..end - start]);
        }
    }
    let _ = writeln!(out, "{}", header.trim_end());

    for (row, row_label) in ROW_LABELS.iter().enumerate() {
        out.push_str(row_label);
        out.push(' ');
        for week in grid {
            let cell = &week[row];
            if !cell.in_selected_year {
                out.push_str(&" ".repeat(CELL_WIDTH));
                continue;
            }
            let status = PointStatus::from(cell.record.as_ref());
            let glyph = if palette.colored { "■" } else { status_glyph(status) };
            out.push_str(&palette.paint(status, glyph));
            out.push(' ');
        }
        out.truncate(out.trim_end_matches(' ').len());
        out.push('\n');
    }

    let _ = write!(
        out,
        "    {} none  {} perfect  {} partial  {} incomplete",
        palette.paint(PointStatus::None, status_glyph(PointStatus::None)),
        palette.paint(PointStatus::Green, status_glyph(PointStatus::Green)),
        palette.paint(PointStatus::Blue, status_glyph(PointStatus::Blue)),
        palette.paint(PointStatus::Red, status_glyph(PointStatus::Red)),
    );
    out
}
